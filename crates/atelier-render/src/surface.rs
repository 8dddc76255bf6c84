//! Drawing surfaces the painter targets

use atelier_core::{Color, Vec2};

/// How a fill combines with what is already there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Alpha,
    Additive,
}

/// A 2D raster target. Coordinates are device pixels, origin top-left.
pub trait Surface {
    fn resize(&mut self, width: u32, height: u32);

    fn size(&self) -> (u32, u32);

    /// Replace every pixel with `color`
    fn clear(&mut self, color: Color);

    fn fill_triangle(&mut self, points: [Vec2; 3], color: Color, blend: BlendMode);

    /// Disc with a soft edge `feather` px wide
    fn fill_disc(&mut self, center: Vec2, radius: f32, feather: f32, color: Color, blend: BlendMode);

    /// Convex quad as two triangles
    fn fill_quad(&mut self, quad: [Vec2; 4], color: Color, blend: BlendMode) {
        self.fill_triangle([quad[0], quad[1], quad[2]], color, blend);
        self.fill_triangle([quad[0], quad[2], quad[3]], color, blend);
    }

    /// Axis-aligned rectangle
    fn fill_rect(&mut self, min: Vec2, max: Vec2, color: Color, blend: BlendMode) {
        self.fill_quad(
            [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
            color,
            blend,
        );
    }
}

/// Counts calls instead of drawing
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    pub clears: usize,
    pub triangles: usize,
    pub discs: usize,
    pub additive: usize,
    pub last_clear: Option<Color>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn draw_calls(&self) -> usize {
        self.triangles + self.discs
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.width, self.height);
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.clears += 1;
        self.last_clear = Some(color);
    }

    fn fill_triangle(&mut self, _points: [Vec2; 3], _color: Color, blend: BlendMode) {
        self.triangles += 1;
        if blend == BlendMode::Additive {
            self.additive += 1;
        }
    }

    fn fill_disc(&mut self, _center: Vec2, _radius: f32, _feather: f32, _color: Color, blend: BlendMode) {
        self.discs += 1;
        if blend == BlendMode::Additive {
            self.additive += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_and_rect_are_two_triangles() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.fill_quad([Vec2::ZERO; 4], Color::WHITE, BlendMode::Alpha);
        surface.fill_rect(Vec2::ZERO, Vec2::new(5.0, 5.0), Color::WHITE, BlendMode::Additive);
        assert_eq!(surface.triangles, 4);
        assert_eq!(surface.additive, 2);
        surface.reset();
        assert_eq!(surface.draw_calls(), 0);
        assert_eq!(surface.size(), (10, 10));
    }
}
