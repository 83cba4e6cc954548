//! Composition Renderer
//!
//! Turns element concentrations into a particle-density picture of the
//! mixture: a gradient water body, one cloud of colored dots per element
//! (denser with higher relative saturation), cosmetic ripples, an outline
//! and a specular highlight.
//!
//! Particle placement is random on every render. Composition and painting
//! are separate steps: `compose` -> [`Scene`] -> [`Scene::paint`].

mod random;
mod raster;
mod scene;

pub use random::{RandomSource, ScriptedRandom};
pub use raster::{DrawSurface, Raster};
pub use scene::{Color, Ellipse, GradientFill, Particle, RadialGradient, Scene, Stroke};

use std::f64::consts::{FRAC_PI_4, TAU};
use thiserror::Error;

use crate::catalog::TraceElement;
use crate::config::{defaults, RenderConfig};
use crate::types::ElementLevels;

/// Errors in rendering
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("Ripple count {0} exceeds the maximum {max}", max = defaults::MAX_RIPPLE_COUNT)]
    TooManyRipples(u32),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

// === Geometry (px) ===
/// Water body inset from the canvas edge
const WATER_BODY_INSET: f64 = 10.0;
/// Particle scatter inset from the canvas edge
const SCATTER_INSET: f64 = 20.0;
/// Scatter radius range as a fraction of the scatter ellipse
const SCATTER_MIN_FRACTION: f64 = 0.1;
const SCATTER_SPAN_FRACTION: f64 = 0.8;
/// Ripple `i` sits at `base * (RIPPLE_BASE_FRACTION + RIPPLE_STEP_FRACTION * i)`
const RIPPLE_BASE_FRACTION: f64 = 0.7;
const RIPPLE_STEP_FRACTION: f64 = 0.1;
/// Vertical squash of ripple ellipses
const RIPPLE_ASPECT: f64 = 0.8;
const RIPPLE_WIDTH: f64 = 1.0;
const CONTOUR_WIDTH: f64 = 2.0;
/// Highlight offset up-left of center, and its shape
const HIGHLIGHT_OFFSET: f64 = 30.0;
const HIGHLIGHT_RADII: (f64, f64) = (20.0, 15.0);
const HIGHLIGHT_GRADIENT_RADIUS: f64 = 40.0;

// === Palette ===
const WATER_INNER: Color = Color::rgba(232, 245, 254, 0.9);
const WATER_OUTER: Color = Color::rgba(224, 242, 254, 0.7);
const RIPPLE_COLOR: Color = Color::rgba(255, 255, 255, 0.4);
const CONTOUR_COLOR: Color = Color::rgba(96, 165, 250, 0.6);
const HIGHLIGHT_INNER: Color = Color::rgba(255, 255, 255, 0.4);
const HIGHLIGHT_OUTER: Color = Color::rgba(255, 255, 255, 0.0);

/// Upper bound on particles per element.
///
/// Only reachable when a formula carries levels far above `max_level`
/// (`set_current` does not clamp).
pub const MAX_PARTICLES_PER_ELEMENT: usize = 5_000;

/// Renders formulas into scenes and rasters.
#[derive(Debug, Clone)]
pub struct CompositionRenderer {
    config: RenderConfig,
}

impl CompositionRenderer {
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        let canvas = defaults::MIN_CANVAS_SIZE..=defaults::MAX_CANVAS_SIZE;
        if !canvas.contains(&config.width) || !canvas.contains(&config.height) {
            return Err(RenderError::InvalidCanvas {
                width: config.width,
                height: config.height,
            });
        }
        if config.ripple_count > defaults::MAX_RIPPLE_COUNT {
            return Err(RenderError::TooManyRipples(config.ripple_count));
        }
        Ok(Self { config })
    }

    /// Particles drawn for one element at `level`.
    ///
    /// `floor(level / max_level * particle_scale) + min_particles`, or zero
    /// when the level is absent, non-positive or not finite.
    pub fn particle_count(&self, element: &TraceElement, level: f64) -> usize {
        if !level.is_finite() || level <= 0.0 || element.max_level <= 0.0 {
            return 0;
        }
        let scaled = (level / element.max_level * self.config.particle_scale).floor();
        let count = (scaled as usize).saturating_add(self.config.min_particles as usize);
        if count > MAX_PARTICLES_PER_ELEMENT {
            tracing::warn!(element = %element.id, level, count, "Particle count capped");
            return MAX_PARTICLES_PER_ELEMENT;
        }
        count
    }

    /// Lay out one frame.
    ///
    /// `elements` selects which catalog entries take part (normally the
    /// whole catalog); `time_secs` drives the ripple phase only.
    pub fn compose<R: RandomSource + ?Sized>(
        &self,
        elements: &[TraceElement],
        levels: &ElementLevels,
        rng: &mut R,
        time_secs: f64,
    ) -> Scene {
        let w = f64::from(self.config.width);
        let h = f64::from(self.config.height);
        let (cx, cy) = (w / 2.0, h / 2.0);
        let body = Ellipse::axis_aligned(cx, cy, cx - WATER_BODY_INSET, cy - WATER_BODY_INSET);
        let (scatter_x, scatter_y) = (cx - SCATTER_INSET, cy - SCATTER_INSET);

        let water_body = GradientFill {
            shape: body,
            gradient: RadialGradient {
                cx,
                cy,
                radius: cx,
                inner: WATER_INNER,
                outer: WATER_OUTER,
            },
        };

        let mut particles = Vec::new();
        for element in elements {
            let Some(&level) = levels.get(&element.id) else {
                continue;
            };
            let count = self.particle_count(element, level);
            particles.reserve(count);
            for _ in 0..count {
                particles.push(self.scatter(element, cx, cy, scatter_x, scatter_y, rng));
            }
        }

        let ripples = (0..self.config.ripple_count)
            .map(|i| {
                let i = f64::from(i);
                let radius = (scatter_x * (RIPPLE_BASE_FRACTION + RIPPLE_STEP_FRACTION * i)
                    + self.config.ripple_amplitude * (time_secs + i).sin())
                .max(0.0);
                Stroke {
                    shape: Ellipse::axis_aligned(cx, cy, radius, radius * RIPPLE_ASPECT),
                    width: RIPPLE_WIDTH,
                    color: RIPPLE_COLOR,
                }
            })
            .collect();

        let (hx, hy) = (cx - HIGHLIGHT_OFFSET, cy - HIGHLIGHT_OFFSET);
        let highlight = GradientFill {
            shape: Ellipse {
                cx: hx,
                cy: hy,
                rx: HIGHLIGHT_RADII.0,
                ry: HIGHLIGHT_RADII.1,
                rotation: FRAC_PI_4,
            },
            gradient: RadialGradient {
                cx: hx,
                cy: hy,
                radius: HIGHLIGHT_GRADIENT_RADIUS,
                inner: HIGHLIGHT_INNER,
                outer: HIGHLIGHT_OUTER,
            },
        };

        tracing::trace!(particles = particles.len(), "Scene composed");

        Scene {
            width: self.config.width,
            height: self.config.height,
            water_body,
            particles,
            ripples,
            contour: Stroke {
                shape: body,
                width: CONTOUR_WIDTH,
                color: CONTOUR_COLOR,
            },
            highlight,
        }
    }

    /// Compose a frame and paint it onto a fresh raster.
    pub fn render<R: RandomSource + ?Sized>(
        &self,
        elements: &[TraceElement],
        levels: &ElementLevels,
        rng: &mut R,
        time_secs: f64,
    ) -> Result<Raster, RenderError> {
        let mut raster = Raster::new(self.config.width, self.config.height)?;
        self.compose(elements, levels, rng, time_secs)
            .paint(&mut raster);
        Ok(raster)
    }

    /// Draw order per particle: angle, x radius, y radius, size, opacity.
    fn scatter<R: RandomSource + ?Sized>(
        &self,
        element: &TraceElement,
        cx: f64,
        cy: f64,
        scatter_x: f64,
        scatter_y: f64,
        rng: &mut R,
    ) -> Particle {
        let c = &self.config;
        let angle = rng.next_unit() * TAU;
        let rx = (rng.next_unit() * SCATTER_SPAN_FRACTION + SCATTER_MIN_FRACTION) * scatter_x;
        let ry = (rng.next_unit() * SCATTER_SPAN_FRACTION + SCATTER_MIN_FRACTION) * scatter_y;
        let radius = rng.next_unit() * (c.max_particle_radius - c.min_particle_radius)
            + c.min_particle_radius;
        let opacity = rng.next_unit() * (c.max_particle_opacity - c.min_particle_opacity)
            + c.min_particle_opacity;
        Particle {
            element: element.id,
            x: cx + rx * angle.cos(),
            y: cy + ry * angle.sin(),
            radius,
            opacity,
            color: element.color,
        }
    }
}

impl Default for CompositionRenderer {
    fn default() -> Self {
        Self {
            config: RenderConfig::default(),
        }
    }
}

/// Wall-clock seconds for the ripple phase.
pub fn ripple_clock() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}
