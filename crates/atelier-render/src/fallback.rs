//! Static panel shown when no rendering capability exists

use atelier_core::{Color, Vec2};
use serde::Serialize;

use crate::surface::{BlendMode, Surface};

const GRADIENT: [u32; 3] = [0x0f172a, 0x312e81, 0x581c87];
const BANDS: u32 = 32;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackPanel {
    pub title: String,
    pub reason: String,
}

impl FallbackPanel {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            title: "Experience Unavailable".to_string(),
            reason: reason.into(),
        }
    }

    /// Gradient colour at `t` in [0, 1]
    pub fn gradient_at(t: f32) -> Color {
        let t = t.clamp(0.0, 1.0) * 2.0;
        let (from, to, k) = if t <= 1.0 {
            (GRADIENT[0], GRADIENT[1], t)
        } else {
            (GRADIENT[1], GRADIENT[2], t - 1.0)
        };
        Color::from_hex(from).lerp(&Color::from_hex(to), k)
    }

    /// Clear and paint the diagonal gradient with a translucent card
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) {
        let (w, h) = surface.size();
        let (w, h) = (w as f32, h as f32);
        surface.clear(Self::gradient_at(0.0));

        // diagonal bands, top-left to bottom-right
        let span = w + h;
        let step = span / BANDS as f32;
        for i in 0..BANDS {
            let a = i as f32 * step;
            let b = a + step + 1.0;
            let color = Self::gradient_at((i as f32 + 0.5) / BANDS as f32);
            surface.fill_quad(
                [
                    Vec2::new(a, 0.0),
                    Vec2::new(b, 0.0),
                    Vec2::new(b - h, h),
                    Vec2::new(a - h, h),
                ],
                color,
                BlendMode::Alpha,
            );
        }

        let card_w = (w * 0.4).clamp(120.0, 480.0).min(w);
        let card_h = (h * 0.2).clamp(60.0, 200.0).min(h);
        let min = Vec2::new((w - card_w) * 0.5, (h - card_h) * 0.5);
        surface.fill_rect(
            min,
            Vec2::new(min.x + card_w, min.y + card_h),
            Color::WHITE.with_alpha(0.08),
            BlendMode::Alpha,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::surface::RecordingSurface;

    #[test]
    fn panel_text() {
        let panel = FallbackPanel::new("WebGL is not supported");
        assert_eq!(panel.title, "Experience Unavailable");
        assert_eq!(panel.reason, "WebGL is not supported");
    }

    fn close(a: Color, b: Color) -> bool {
        a.to_array().iter().zip(b.to_array()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn gradient_endpoints() {
        assert!(close(FallbackPanel::gradient_at(0.0), Color::from_hex(0x0f172a)));
        assert!(close(FallbackPanel::gradient_at(0.5), Color::from_hex(0x312e81)));
        assert!(close(FallbackPanel::gradient_at(1.0), Color::from_hex(0x581c87)));
    }

    #[test]
    fn paints_with_one_clear() {
        let mut surface = RecordingSurface::new(320, 200);
        FallbackPanel::new("no adapter").paint(&mut surface);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.triangles, (BANDS as usize + 1) * 2);
    }

    #[test]
    fn corners_differ_on_canvas() {
        let mut canvas = Canvas::new(64, 64);
        FallbackPanel::new("no adapter").paint(&mut canvas);
        let top_left = canvas.pixel(0, 0).unwrap();
        let bottom_right = canvas.pixel(63, 63).unwrap();
        assert!(bottom_right.r > top_left.r);
    }
}
