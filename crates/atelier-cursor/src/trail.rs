//! Fluid trail: points dropped on pointer moves, decaying every frame

use atelier_core::{SeededRng, Vec2};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailPoint {
    pub position: Vec2,
    /// Remaining life in (0, 1]
    pub life: f32,
    pub size: f32,
    /// Hue offset in degrees, added to the 220..240 base
    pub hue: f32,
    pub birth_ms: f64,
}

/// Ordered oldest first, bounded by `capacity`
#[derive(Debug, Clone)]
pub struct Trail {
    points: Vec<TrailPoint>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Drop a point; faster pointer movement gives a longer-lived point
    pub fn push(&mut self, position: Vec2, movement: f32, time_ms: f64, rng: &mut SeededRng) {
        let life = (movement * 0.1 + 0.5).clamp(0.3, 1.0);
        self.points.push(TrailPoint {
            position,
            life,
            size: rng.range(8.0, 20.0),
            hue: rng.range(0.0, 60.0),
            birth_ms: time_ms,
        });
        self.enforce_capacity();
    }

    /// Per-frame decay with organic drift; dead points are pruned
    pub fn tick(&mut self, rng: &mut SeededRng) {
        for p in &mut self.points {
            p.life -= rng.range(0.02, 0.03);
            p.position = p.position + Vec2::new(rng.jitter(0.25), rng.jitter(0.25));
        }
        self.points.retain(|p| p.life > 0.0);
        self.enforce_capacity();
    }

    fn enforce_capacity(&mut self) {
        if self.points.len() > self.capacity {
            let excess = self.points.len() - self.capacity;
            self.points.drain(..excess);
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
