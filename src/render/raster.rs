//! Drawing surfaces
//!
//! `DrawSurface` is the seam between composition and pixels. `Raster` is the
//! production surface: an RGBA8 image with source-over alpha blending and
//! pixel-center sampling (no anti-aliasing).

use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;

use super::scene::{Color, Ellipse, RadialGradient};
use super::RenderError;
use crate::config::defaults::MAX_CANVAS_SIZE;

/// Largest pixel buffer a raster may allocate (bytes).
const MAX_BUFFER_BYTES: u64 = MAX_CANVAS_SIZE as u64 * MAX_CANVAS_SIZE as u64 * 4;

/// 2-D surface a [`Scene`](super::Scene) can paint onto.
pub trait DrawSurface {
    fn fill_gradient_ellipse(&mut self, shape: &Ellipse, gradient: &RadialGradient);
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color);
    fn stroke_ellipse(&mut self, shape: &Ellipse, width: f64, color: Color);
}

/// RGBA8 raster surface, initially fully transparent.
#[derive(Debug, Clone)]
pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    /// Fails with `InvalidCanvas` for empty canvases and for buffers larger
    /// than a `MAX_CANVAS_SIZE` square.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let bytes = (u64::from(width) * u64::from(height)).checked_mul(4);
        match bytes {
            Some(b) if b > 0 && b <= MAX_BUFFER_BYTES && usize::try_from(b).is_ok() => {}
            _ => return Err(RenderError::InvalidCanvas { width, height }),
        }
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width() && y < self.height()).then(|| self.image.get_pixel(x, y).0)
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Write the raster as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        tracing::debug!(path = %path.display(), "Composition written");
        Ok(())
    }

    /// Source-over blend of `color` into one pixel.
    fn blend(&mut self, x: u32, y: u32, color: Color) {
        let src_a = color.a.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        if x >= self.width() || y >= self.height() {
            return;
        }
        let px = self.image.get_pixel_mut(x, y);
        let [dr, dg, db, da] = px.0;
        let dst_a = f64::from(da) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let channel = |s: u8, d: u8| {
            let c = (f64::from(s) * src_a + f64::from(d) * dst_a * (1.0 - src_a)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        *px = Rgba([
            channel(color.r, dr),
            channel(color.g, dg),
            channel(color.b, db),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ]);
    }

    /// Pixel rows/columns whose centers may fall within `radius` of a point.
    fn bounds(&self, cx: f64, cy: f64, radius: f64) -> Option<(u32, u32, u32, u32)> {
        if !(cx.is_finite() && cy.is_finite() && radius.is_finite()) || radius <= 0.0 {
            return None;
        }
        let clamp_x = |v: f64| v.clamp(0.0, f64::from(self.width() - 1)) as u32;
        let clamp_y = |v: f64| v.clamp(0.0, f64::from(self.height() - 1)) as u32;
        let (x0, x1) = (cx - radius - 1.0, cx + radius + 1.0);
        let (y0, y1) = (cy - radius - 1.0, cy + radius + 1.0);
        if x1 < 0.0 || y1 < 0.0 || x0 > f64::from(self.width()) || y0 > f64::from(self.height()) {
            return None;
        }
        Some((clamp_x(x0), clamp_y(y0), clamp_x(x1), clamp_y(y1)))
    }
}

impl DrawSurface for Raster {
    fn fill_gradient_ellipse(&mut self, shape: &Ellipse, gradient: &RadialGradient) {
        let Some((x0, y0, x1, y1)) = self.bounds(shape.cx, shape.cy, shape.bounding_radius()) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (px, py) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
                if shape.contains(px, py) {
                    self.blend(x, y, gradient.color_at(px, py));
                }
            }
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let Some((x0, y0, x1, y1)) = self.bounds(cx, cy, radius) else {
            return;
        };
        let r2 = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = f64::from(x) + 0.5 - cx;
                let dy = f64::from(y) + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn stroke_ellipse(&mut self, shape: &Ellipse, width: f64, color: Color) {
        if shape.rx <= 0.0 || shape.ry <= 0.0 {
            return;
        }
        let half = width / 2.0;
        let Some((x0, y0, x1, y1)) = self.bounds(shape.cx, shape.cy, shape.bounding_radius() + half) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (px, py) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
                if shape.outline_distance(px, py).abs() <= half {
                    self.blend(x, y, color);
                }
            }
        }
    }
}
