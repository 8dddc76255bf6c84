//! Ribbon geometry for ink strokes: each segment becomes a quad offset
//! perpendicular to its direction.

use atelier_core::noise::hash_noise;
use atelier_core::Vec2;
use serde::Serialize;

use crate::ink::StrokePoint;

/// Base half-width of a ribbon in px
const BASE_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RibbonSegment {
    /// Corners in drawing order: current+, next+, next-, current-
    pub quad: [Vec2; 4],
    pub opacity: f32,
}

/// Build the ribbon for a stroke `age_ms` after it was drawn
pub fn ribbon(points: &[StrokePoint], pressure: f32, age_ms: f64) -> Vec<RibbonSegment> {
    if points.len() < 2 {
        return Vec::new();
    }
    let t = age_ms as f32;
    let len = points.len() as f32;

    points
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let curr = pair[0].position;
            let next = pair[1].position;
            let variation = hash_noise(curr.x + t * 0.001, curr.y + t * 0.001, 0.1) * 3.0 - 1.5;
            let pressure_var = (i as f32 * 0.3 + t * 0.002).sin() * pressure * 2.0;

            let d = next - curr;
            let dist = d.length();
            if dist <= 0.0 {
                return None;
            }
            let width = BASE_WIDTH + variation + pressure_var;
            let perp = Vec2::new(-d.y / dist, d.x / dist) * width;
            Some(RibbonSegment {
                quad: [curr + perp, next + perp, next - perp, curr - perp],
                opacity: (0.7 - (i as f32 / len) * 0.6).max(0.1),
            })
        })
        .collect()
}
