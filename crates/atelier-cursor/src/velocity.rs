//! Raw pointer velocity, heading and speed

use atelier_core::Vec2;

const SPEED_FACTOR: f32 = 0.05;
const MAX_SPEED: f32 = 12.0;

#[derive(Debug, Clone, Copy, Default)]
struct Sample {
    position: Vec2,
    time_ms: f64,
}

/// Velocity of the raw (unsmoothed) pointer in px/s
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    last: Option<Sample>,
    velocity: Vec2,
    sampled_this_frame: bool,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, position: Vec2, time_ms: f64) {
        if let Some(last) = self.last {
            let dt = (time_ms - last.time_ms) / 1000.0;
            if dt > 0.0 {
                self.velocity = (position - last.position) * (1.0 / dt as f32);
            }
        }
        self.last = Some(Sample { position, time_ms });
        self.sampled_this_frame = true;
    }

    /// Call once per frame; a frame without samples means the pointer rests
    pub fn end_frame(&mut self) {
        if !self.sampled_this_frame {
            self.velocity = Vec2::ZERO;
        }
        self.sampled_this_frame = false;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Direction of travel in degrees, `atan2(vy, vx)`
    pub fn heading(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x).to_degrees()
    }

    /// Speed scaled to the 0..12 range the styles expect
    pub fn speed(&self) -> f32 {
        (self.velocity.length() * SPEED_FACTOR).min(MAX_SPEED)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_and_speed_from_two_samples() {
        let mut tracker = VelocityTracker::new();
        tracker.sample(Vec2::new(0.0, 0.0), 0.0);
        tracker.sample(Vec2::new(0.0, 2.0), 20.0);
        // 100 px/s straight down the screen
        assert!((tracker.velocity().y - 100.0).abs() < 1e-3);
        assert!((tracker.heading() - 90.0).abs() < 1e-3);
        assert!((tracker.speed() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn speed_is_capped() {
        let mut tracker = VelocityTracker::new();
        tracker.sample(Vec2::new(0.0, 0.0), 0.0);
        tracker.sample(Vec2::new(500.0, 0.0), 10.0);
        assert_eq!(tracker.speed(), 12.0);
    }

    #[test]
    fn resting_frame_zeroes_velocity() {
        let mut tracker = VelocityTracker::new();
        tracker.sample(Vec2::new(0.0, 0.0), 0.0);
        tracker.sample(Vec2::new(10.0, 0.0), 16.0);
        tracker.end_frame();
        assert!(tracker.speed() > 0.0);
        tracker.end_frame();
        assert_eq!(tracker.speed(), 0.0);
    }
}
