//! Software canvas backed by an `image` float buffer

use std::path::Path;

use atelier_core::{Color, Vec2};
use image::{DynamicImage, Rgba, Rgba32FImage};

use crate::error::RenderError;
use crate::surface::{BlendMode, Surface};

pub struct Canvas {
    image: Rgba32FImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: Rgba32FImage::new(width.max(1), height.max(1)),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let p = self.image.get_pixel(x, y).0;
        Some(Color::new(p[0], p[1], p[2], p[3]))
    }

    pub fn image(&self) -> &Rgba32FImage {
        &self.image
    }

    /// Write the canvas as an 8-bit PNG
    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        DynamicImage::ImageRgba32F(self.image.clone())
            .into_rgba8()
            .save(path)
            .map_err(|e| RenderError::ImageWrite(format!("{}: {e}", path.display())))
    }

    fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f32, mode: BlendMode) {
        let alpha = (color.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let px = self.image.get_pixel_mut(x, y);
        let [r, g, b, a] = px.0;
        *px = match mode {
            BlendMode::Alpha if alpha >= 1.0 => Rgba([color.r, color.g, color.b, 1.0]),
            BlendMode::Alpha => Rgba([
                r + (color.r - r) * alpha,
                g + (color.g - g) * alpha,
                b + (color.b - b) * alpha,
                a + (1.0 - a) * alpha,
            ]),
            BlendMode::Additive => Rgba([
                (r + color.r * alpha).min(1.0),
                (g + color.g * alpha).min(1.0),
                (b + color.b * alpha).min(1.0),
                a,
            ]),
        };
    }

    /// Pixel bounds of a box clipped to the canvas
    fn clip(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Option<(u32, u32, u32, u32)> {
        let w = self.image.width() as f32;
        let h = self.image.height() as f32;
        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return None;
        }
        let x0 = min_x.floor().max(0.0);
        let y0 = min_y.floor().max(0.0);
        let x1 = max_x.ceil().min(w - 1.0);
        let y1 = max_y.ceil().min(h - 1.0);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

impl Surface for Canvas {
    fn resize(&mut self, width: u32, height: u32) {
        if (width.max(1), height.max(1)) != self.image.dimensions() {
            self.image = Rgba32FImage::new(width.max(1), height.max(1));
        }
    }

    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self, color: Color) {
        let fill = Rgba(color.to_array());
        for px in self.image.pixels_mut() {
            *px = fill;
        }
    }

    fn fill_triangle(&mut self, points: [Vec2; 3], color: Color, blend: BlendMode) {
        let [a, b, c] = points;
        let area = edge(a, b, c);
        if area.abs() < f32::EPSILON {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(
            a.x.min(b.x).min(c.x),
            a.y.min(b.y).min(c.y),
            a.x.max(b.x).max(c.x),
            a.y.max(b.y).max(c.y),
        ) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(b, c, p) / area;
                let w1 = edge(c, a, p) / area;
                let w2 = edge(a, b, p) / area;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.blend(x, y, color, 1.0, blend);
                }
            }
        }
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, feather: f32, color: Color, blend: BlendMode) {
        if radius <= 0.0 {
            return;
        }
        let outer = radius + feather.max(0.0);
        let Some((x0, y0, x1, y1)) =
            self.clip(center.x - outer, center.y - outer, center.x + outer, center.y + outer)
        else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(&center);
                let coverage = if d <= radius {
                    1.0
                } else if d < outer {
                    1.0 - (d - radius) / feather
                } else {
                    continue;
                };
                self.blend(x, y, color, coverage, blend);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_fills_every_pixel() {
        let mut canvas = Canvas::new(4, 3);
        canvas.clear(Color::from_hex(0x0a0a1a));
        assert_eq!(canvas.pixel(3, 2), Some(Color::from_hex(0x0a0a1a)));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn triangle_covers_inside_only() {
        let mut canvas = Canvas::new(20, 20);
        canvas.clear(Color::BLACK);
        canvas.fill_triangle(
            [Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0), Vec2::new(0.0, 20.0)],
            Color::WHITE,
            BlendMode::Alpha,
        );
        assert_eq!(canvas.pixel(2, 2), Some(Color::WHITE));
        assert_eq!(canvas.pixel(18, 18), Some(Color::BLACK));
    }

    #[test]
    fn winding_does_not_matter() {
        let mut canvas = Canvas::new(10, 10);
        canvas.clear(Color::BLACK);
        canvas.fill_triangle(
            [Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0), Vec2::new(10.0, 0.0)],
            Color::WHITE,
            BlendMode::Alpha,
        );
        assert_eq!(canvas.pixel(1, 1), Some(Color::WHITE));
    }

    #[test]
    fn additive_saturates() {
        let mut canvas = Canvas::new(10, 10);
        canvas.clear(Color::new(0.8, 0.0, 0.0, 1.0));
        canvas.fill_disc(Vec2::new(5.0, 5.0), 3.0, 1.0, Color::RED, BlendMode::Additive);
        let p = canvas.pixel(5, 5).unwrap();
        assert_eq!(p.r, 1.0);
        assert_eq!(p.g, 0.0);
    }

    #[test]
    fn offscreen_shapes_are_clipped() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_disc(Vec2::new(-50.0, -50.0), 4.0, 1.0, Color::WHITE, BlendMode::Alpha);
        canvas.fill_triangle(
            [Vec2::new(100.0, 100.0), Vec2::new(120.0, 100.0), Vec2::new(100.0, f32::NAN)],
            Color::WHITE,
            BlendMode::Alpha,
        );
        assert!(canvas.image().pixels().all(|p| p.0[3] == 0.0));
    }

    #[test]
    fn saves_png() {
        let mut canvas = Canvas::new(6, 6);
        canvas.clear(Color::from_hex(0x336699));
        let path = std::env::temp_dir().join(format!("atelier_canvas_{}.png", std::process::id()));
        canvas.save_png(&path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.width(), 6);
        let _ = std::fs::remove_file(&path);
    }
}
