//! Ink strokes recorded between pointer-down and pointer-up

use atelier_core::{Color, SeededRng, Vec2};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokePoint {
    pub position: Vec2,
    pub pressure: f32,
    pub time_ms: f64,
}

/// A finished stroke, kept until it ages out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InkStroke {
    pub id: u64,
    pub points: Vec<StrokePoint>,
    pub color: Color,
    pub birth_ms: f64,
}

impl InkStroke {
    pub fn age_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.birth_ms
    }
}

/// The in-progress stroke plus every retained one
#[derive(Debug, Clone, Default)]
pub struct InkCanvas {
    current: Vec<StrokePoint>,
    strokes: Vec<InkStroke>,
    last_point: Vec2,
    next_id: u64,
    last_prune_ms: f64,
}

impl InkCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a stroke. The first point always records, at full pressure.
    pub fn begin(&mut self, position: Vec2, time_ms: f64) {
        self.current.clear();
        self.current.push(StrokePoint {
            position,
            pressure: 1.0,
            time_ms,
        });
        self.last_point = position;
    }

    /// Append a point if it is farther than `min_distance` from the last one.
    /// Returns whether it was recorded.
    pub fn add_point(&mut self, position: Vec2, pressure: f32, time_ms: f64, min_distance: f32) -> bool {
        if self.current.is_empty() || position.distance(&self.last_point) <= min_distance {
            return false;
        }
        self.current.push(StrokePoint {
            position,
            pressure,
            time_ms,
        });
        self.last_point = position;
        true
    }

    /// Finish the in-progress stroke. Strokes of a single point are dropped.
    pub fn complete(&mut self, time_ms: f64, rng: &mut SeededRng) -> Option<u64> {
        let points = std::mem::take(&mut self.current);
        if points.len() < 2 {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        let color = Color::from_hsl(
            rng.range(220.0, 260.0) / 360.0,
            rng.range(0.7, 0.9),
            rng.range(0.5, 0.7),
        );
        log::trace!("ink stroke {id} completed with {} points", points.len());
        self.strokes.push(InkStroke {
            id,
            points,
            color,
            birth_ms: time_ms,
        });
        Some(id)
    }

    /// Run the periodic prune when `interval_ms` has passed since the last one
    pub fn maybe_prune(&mut self, now_ms: f64, interval_ms: f64, max_age_ms: f64) -> usize {
        if now_ms - self.last_prune_ms < interval_ms {
            return 0;
        }
        self.last_prune_ms = now_ms;
        self.prune(now_ms, max_age_ms)
    }

    /// Drop strokes at least `max_age_ms` old. Returns how many went.
    pub fn prune(&mut self, now_ms: f64, max_age_ms: f64) -> usize {
        let before = self.strokes.len();
        self.strokes.retain(|s| s.age_ms(now_ms) < max_age_ms);
        before - self.strokes.len()
    }

    pub fn is_drawing(&self) -> bool {
        !self.current.is_empty()
    }

    pub fn current(&self) -> &[StrokePoint] {
        &self.current
    }

    pub fn strokes(&self) -> &[InkStroke] {
        &self.strokes
    }

    pub fn clear(&mut self) {
        self.current.clear();
        self.strokes.clear();
    }
}
