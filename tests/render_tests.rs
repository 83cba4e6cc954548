//! Composition Renderer Tests
//!
//! Asserts on the composed scene (counts, bounds, determinism) rather than
//! on pixels, plus a smoke test that a rendered raster reaches disk as PNG.

use rand::rngs::StdRng;
use rand::SeedableRng;
use water_formula::catalog::{self, ElementId};
use water_formula::config::RenderConfig;
use water_formula::render::{CompositionRenderer, ScriptedRandom};
use water_formula::types::{ElementLevels, Formula};

fn levels(pairs: &[(ElementId, f64)]) -> ElementLevels {
    pairs.iter().copied().collect()
}

#[test]
fn magnesium_at_max_draws_55_particles() {
    let renderer = CompositionRenderer::default();
    let mut rng = StdRng::seed_from_u64(1);
    let scene = renderer.compose(
        catalog::elements(),
        &levels(&[(ElementId::Magnesium, 50.0)]),
        &mut rng,
        0.0,
    );
    assert_eq!(scene.particle_count(ElementId::Magnesium), 55);
    assert_eq!(scene.particles.len(), 55);
}

#[test]
fn zero_level_draws_nothing() {
    let renderer = CompositionRenderer::default();
    let mut rng = StdRng::seed_from_u64(1);
    let scene = renderer.compose(
        catalog::elements(),
        &levels(&[(ElementId::Magnesium, 0.0), (ElementId::Zinc, f64::NAN)]),
        &mut rng,
        0.0,
    );
    assert!(scene.particles.is_empty());
}

#[test]
fn default_formula_particle_counts() {
    let renderer = CompositionRenderer::default();
    let formula = Formula::defaults("Base");
    let mut rng = StdRng::seed_from_u64(2);
    let scene = renderer.compose(catalog::elements(), &formula.levels, &mut rng, 0.0);
    // floor(default / max * 50) + 5
    let expected = [
        (ElementId::Magnesium, 15),
        (ElementId::Calcium, 15),
        (ElementId::Potassium, 13),
        (ElementId::Sodium, 17),
        (ElementId::Zinc, 11),
        (ElementId::Selenium, 10),
        (ElementId::Electrolytes, 17),
        (ElementId::VitaminB, 12),
    ];
    for (id, count) in expected {
        assert_eq!(scene.particle_count(id), count, "{id}");
    }
}

#[test]
fn particles_stay_inside_water_body() {
    let renderer = CompositionRenderer::default();
    let all_max: ElementLevels = catalog::elements().iter().map(|e| (e.id, e.max_level)).collect();
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let scene = renderer.compose(catalog::elements(), &all_max, &mut rng, 0.0);
        assert_eq!(scene.particles.len(), 8 * 55);
        for p in &scene.particles {
            assert!(
                scene.water_body.shape.normalized_distance(p.x, p.y) < 1.0,
                "particle at ({}, {}) outside body",
                p.x,
                p.y
            );
            assert!((2.0..=6.0).contains(&p.radius));
            assert!((0.5..=1.0).contains(&p.opacity));
        }
    }
}

#[test]
fn particles_use_element_colors() {
    let renderer = CompositionRenderer::default();
    let mut rng = StdRng::seed_from_u64(4);
    let scene = renderer.compose(
        catalog::elements(),
        &levels(&[(ElementId::Selenium, 5.0), (ElementId::Calcium, 50.0)]),
        &mut rng,
        0.0,
    );
    for p in &scene.particles {
        assert_eq!(p.color, p.element.element().color);
    }
    // Catalog order: calcium layer before selenium
    assert_eq!(scene.particles[0].element, ElementId::Calcium);
}

#[test]
fn same_seed_same_scene() {
    let renderer = CompositionRenderer::default();
    let formula = Formula::defaults("Base");
    let a = renderer.compose(catalog::elements(), &formula.levels, &mut StdRng::seed_from_u64(9), 1.5);
    let b = renderer.compose(catalog::elements(), &formula.levels, &mut StdRng::seed_from_u64(9), 1.5);
    assert_eq!(a, b);
}

#[test]
fn scripted_source_gives_exact_coordinates() {
    let renderer = CompositionRenderer::default();
    // angle = 0.25 * 2pi (straight down), ry fraction = 1.0 * 0.8 + 0.1 = 0.9
    let mut rng = ScriptedRandom::new(vec![0.25, 0.0, 1.0, 0.0, 1.0]);
    let scene = renderer.compose(
        catalog::elements(),
        &levels(&[(ElementId::Sodium, 0.1)]),
        &mut rng,
        0.0,
    );
    assert_eq!(scene.particles.len(), 5);
    let p = scene.particles[0];
    assert!((p.x - 120.0).abs() < 1e-9);
    assert!((p.y - (120.0 + 0.9 * 100.0)).abs() < 1e-9);
    assert_eq!(p.radius, 2.0);
    assert_eq!(p.opacity, 1.0);
}

#[test]
fn render_does_not_mutate_levels() {
    let renderer = CompositionRenderer::default();
    let formula = Formula::defaults("Base");
    let before = formula.levels.clone();
    renderer
        .render(catalog::elements(), &formula.levels, &mut StdRng::seed_from_u64(3), 0.0)
        .unwrap();
    assert_eq!(formula.levels, before);
}

#[test]
fn rendered_raster_has_opaque_center_and_clear_corners() {
    let renderer = CompositionRenderer::default();
    let raster = renderer
        .render(catalog::elements(), &ElementLevels::new(), &mut StdRng::seed_from_u64(3), 0.0)
        .unwrap();
    assert_eq!((raster.width(), raster.height()), (240, 240));
    assert!(raster.pixel(120, 120).unwrap()[3] > 0);
    assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn custom_canvas_and_png_output() {
    let config = RenderConfig {
        width: 128,
        height: 96,
        ..RenderConfig::default()
    };
    let renderer = CompositionRenderer::new(config).unwrap();
    let raster = renderer
        .render(
            catalog::elements(),
            &Formula::defaults("Base").levels,
            &mut StdRng::seed_from_u64(5),
            0.0,
        )
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("formula.png");
    raster.save_png(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
