//! Per-theme styling of the main cursor disc, evaluated each frame

use atelier_core::{Color, Vec2};
use serde::Serialize;

use crate::config::Theme;

/// Resolved appearance of the cursor disc for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThemeStyle {
    /// Gradient rotation in degrees
    pub gradient_angle: f32,
    /// Gradient focus inside the disc, in percent of its box
    pub focus: Vec2,
    /// Blur radius in px
    pub blur: f32,
    pub scale: f32,
    /// Extra rotation in degrees
    pub rotation: f32,
    /// Hue rotation in degrees
    pub hue_rotate: f32,
    pub glow_radius: f32,
    /// Corner radius in percent; 50 is a circle
    pub corner_radius: f32,
    /// Gradient stops, inner to outer
    pub colors: [Color; 3],
    pub glow_color: Color,
}

/// Evaluate `theme` at `time_ms` for a pointer heading `heading` degrees
pub fn theme_style(
    theme: Theme,
    time_ms: f64,
    heading: f32,
    mouse: Vec2,
    color: Color,
    accent: Color,
) -> ThemeStyle {
    let time = (time_ms * 0.001) as f32;
    let white = Color::WHITE;
    let base = ThemeStyle {
        gradient_angle: 0.0,
        focus: Vec2::new(50.0, 50.0),
        blur: 0.0,
        scale: 1.0,
        rotation: 0.0,
        hue_rotate: 0.0,
        glow_radius: 0.0,
        corner_radius: 50.0,
        colors: [color, accent, white.with_alpha(0.27)],
        glow_color: color.with_alpha(0.4),
    };

    match theme {
        Theme::Premium => ThemeStyle {
            gradient_angle: heading + time * 30.0,
            blur: 1.0,
            glow_radius: 30.0,
            colors: [color, accent.with_alpha(0.67), white.with_alpha(0.27)],
            ..base
        },
        Theme::Aurora => ThemeStyle {
            focus: Vec2::new(30.0 + time.sin() * 20.0, 40.0 + time.cos() * 15.0),
            blur: 0.5 + (time * 2.0).sin() * 0.3,
            hue_rotate: time * 20.0,
            glow_radius: 40.0 + (time * 3.0).sin() * 10.0,
            colors: [
                Color::from_hex(0x00ff88).with_alpha(0.4),
                Color::from_hex(0x0080ff).with_alpha(0.4),
                Color::from_hex(0x8000ff).with_alpha(0.4),
            ],
            glow_color: Color::from_hex(0x00ff88).with_alpha(0.27),
            ..base
        },
        Theme::Liquid => ThemeStyle {
            focus: Vec2::new(mouse.x.rem_euclid(100.0), mouse.y.rem_euclid(100.0)),
            blur: (time * 3.0).sin() * 0.5 + 1.0,
            scale: 1.0 + (time * 4.0).sin() * 0.1,
            rotation: (time * 2.0).sin() * 5.0,
            corner_radius: 50.0 + (time * 5.0).sin() * 20.0,
            colors: [color.with_alpha(0.87), accent.with_alpha(0.53), Color::TRANSPARENT],
            ..base
        },
        Theme::Ethereal => ThemeStyle {
            gradient_angle: heading + time * 10.0,
            blur: 2.0,
            glow_radius: 50.0,
            colors: [white.with_alpha(0.1), color.with_alpha(0.2), accent.with_alpha(0.33)],
            glow_color: white.with_alpha(0.3),
            ..base
        },
        Theme::Cosmic => ThemeStyle {
            gradient_angle: time * 50.0,
            glow_radius: 80.0,
            colors: [
                Color::from_hex(0x1a1a2e),
                Color::from_hex(0x0f3460),
                Color::from_hex(0x533483),
            ],
            glow_color: Color::from_hex(0x533483),
            ..base
        },
        Theme::Watercolor => ThemeStyle {
            focus: Vec2::new(40.0, 30.0),
            blur: 0.8,
            glow_radius: 25.0,
            colors: [white.with_alpha(0.8), color.with_alpha(0.67), accent.with_alpha(0.4)],
            glow_color: color.with_alpha(0.27),
            ..base
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(theme: Theme, time_ms: f64) -> ThemeStyle {
        theme_style(
            theme,
            time_ms,
            45.0,
            Vec2::new(1234.0, 567.0),
            Color::from_hex(0x3b82f6),
            Color::from_hex(0x8b5cf6),
        )
    }

    #[test]
    fn every_theme_yields_sane_values() {
        for theme in Theme::ALL {
            for step in 0..50 {
                let s = style(theme, step as f64 * 160.0);
                assert!(s.blur >= 0.0);
                assert!(s.scale > 0.0);
                assert!((0.0..=100.0).contains(&s.focus.x));
                assert!((0.0..=100.0).contains(&s.focus.y));
                assert!((0.0..=100.0).contains(&s.corner_radius));
            }
        }
    }

    #[test]
    fn premium_gradient_follows_heading() {
        let a = style(Theme::Premium, 0.0);
        assert_eq!(a.gradient_angle, 45.0);
        let b = style(Theme::Premium, 1000.0);
        assert!((b.gradient_angle - 75.0).abs() < 1e-4);
    }

    #[test]
    fn liquid_focus_wraps_pointer_position() {
        let s = style(Theme::Liquid, 0.0);
        assert!((s.focus.x - 34.0).abs() < 1e-3);
        assert!((s.focus.y - 67.0).abs() < 1e-3);
    }
}
