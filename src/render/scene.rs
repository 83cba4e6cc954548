//! Scene description produced by the composition renderer
//!
//! A `Scene` is plain data: every shape the renderer decided to draw, in
//! paint order. Painting onto a surface is a separate step, so tests can
//! inspect particle counts and positions without touching pixels.

use serde::Serialize;

use super::raster::DrawSurface;
use crate::catalog::ElementId;

/// Straight (non-premultiplied) RGBA color with floating alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_rgb(rgb: [u8; 3], a: f64) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a,
        }
    }

    /// Linear interpolation between two colors, `t` in [0, 1].
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Ellipse with optional rotation (radians, clockwise in screen space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ellipse {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    pub rotation: f64,
}

impl Ellipse {
    pub const fn axis_aligned(cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        Self {
            cx,
            cy,
            rx,
            ry,
            rotation: 0.0,
        }
    }

    /// Normalized radial coordinate: < 1 inside, 1 on the outline.
    pub fn normalized_distance(&self, x: f64, y: f64) -> f64 {
        let (u, v) = self.to_local(x, y);
        ((u / self.rx).powi(2) + (v / self.ry).powi(2)).sqrt()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.normalized_distance(x, y) <= 1.0
    }

    /// Approximate signed distance to the outline (negative inside).
    pub fn outline_distance(&self, x: f64, y: f64) -> f64 {
        let (u, v) = self.to_local(x, y);
        let f = (u / self.rx).powi(2) + (v / self.ry).powi(2) - 1.0;
        let grad = 2.0 * ((u / (self.rx * self.rx)).powi(2) + (v / (self.ry * self.ry)).powi(2)).sqrt();
        if grad > f64::EPSILON {
            f / grad
        } else {
            // At the exact center: distance is the smaller semi-axis
            -self.rx.min(self.ry)
        }
    }

    /// Radius of a circle centered on the ellipse that covers it.
    pub fn bounding_radius(&self) -> f64 {
        self.rx.max(self.ry)
    }

    fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.cx;
        let dy = y - self.cy;
        if self.rotation == 0.0 {
            return (dx, dy);
        }
        let (sin, cos) = self.rotation.sin_cos();
        (dx * cos + dy * sin, -dx * sin + dy * cos)
    }
}

/// Two-stop radial gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadialGradient {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub inner: Color,
    pub outer: Color,
}

impl RadialGradient {
    pub fn color_at(&self, x: f64, y: f64) -> Color {
        let d = (x - self.cx).hypot(y - self.cy);
        let t = if self.radius > 0.0 { d / self.radius } else { 1.0 };
        self.inner.lerp(self.outer, t)
    }
}

/// Ellipse filled with a radial gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientFill {
    pub shape: Ellipse,
    pub gradient: RadialGradient,
}

/// Stroked ellipse outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub shape: Ellipse,
    pub width: f64,
    pub color: Color,
}

/// One scattered element dot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub element: ElementId,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub opacity: f64,
    pub color: [u8; 3],
}

/// Everything one render pass draws, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub water_body: GradientFill,
    pub particles: Vec<Particle>,
    pub ripples: Vec<Stroke>,
    pub contour: Stroke,
    pub highlight: GradientFill,
}

impl Scene {
    pub fn particles_for(&self, id: ElementId) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(move |p| p.element == id)
    }

    pub fn particle_count(&self, id: ElementId) -> usize {
        self.particles_for(id).count()
    }

    /// Paint the scene onto a surface: base disc, particles, ripples,
    /// contour, then the specular highlight.
    pub fn paint<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.fill_gradient_ellipse(&self.water_body.shape, &self.water_body.gradient);
        for p in &self.particles {
            surface.fill_circle(p.x, p.y, p.radius, Color::from_rgb(p.color, p.opacity));
        }
        for ripple in &self.ripples {
            surface.stroke_ellipse(&ripple.shape, ripple.width, ripple.color);
        }
        surface.stroke_ellipse(&self.contour.shape, self.contour.width, self.contour.color);
        surface.fill_gradient_ellipse(&self.highlight.shape, &self.highlight.gradient);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lerp_endpoints() {
        let a = Color::rgba(0, 0, 0, 0.0);
        let b = Color::rgba(200, 100, 50, 1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::rgba(100, 50, 25, 0.5));
        assert_eq!(a.lerp(b, 4.0), b);
    }

    #[test]
    fn test_ellipse_contains() {
        let e = Ellipse::axis_aligned(100.0, 100.0, 50.0, 20.0);
        assert!(e.contains(100.0, 100.0));
        assert!(e.contains(149.0, 100.0));
        assert!(!e.contains(100.0, 125.0));
    }

    #[test]
    fn test_outline_distance_sign() {
        let e = Ellipse::axis_aligned(0.0, 0.0, 10.0, 10.0);
        assert!((e.outline_distance(12.0, 0.0) - 2.0).abs() < 0.5);
        assert!(e.outline_distance(5.0, 0.0) < 0.0);
        assert_eq!(e.outline_distance(0.0, 0.0), -10.0);
    }

    #[test]
    fn test_rotated_ellipse() {
        let e = Ellipse {
            cx: 0.0,
            cy: 0.0,
            rx: 20.0,
            ry: 5.0,
            rotation: std::f64::consts::FRAC_PI_2,
        };
        // Rotated a quarter turn: long axis now vertical
        assert!(e.contains(0.0, 18.0));
        assert!(!e.contains(18.0, 0.0));
    }
}
