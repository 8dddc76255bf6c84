//! Frame clock with a fixed per-frame step

use std::time::Instant;

/// Simulation step handed to every entity, in seconds
pub const FIXED_STEP: f32 = 0.016;

/// Tracks elapsed time and frame count.
///
/// Entities are always stepped by `fixed_step`, so a run is fully determined
/// by its frame count. `tick()` additionally measures real time for hosts
/// that want to report it.
pub struct FrameClock {
    /// Total elapsed simulation time in seconds
    pub elapsed: f64,
    /// Number of frames advanced
    pub frame: u64,
    /// Fixed step per frame in seconds
    pub fixed_step: f32,
    /// Last measured real frame time in seconds
    pub real_delta: f64,
    last_instant: Option<Instant>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            frame: 0,
            fixed_step: FIXED_STEP,
            real_delta: 0.0,
            last_instant: None,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one fixed step and return it
    pub fn advance(&mut self) -> f32 {
        self.elapsed += self.fixed_step as f64;
        self.frame += 1;
        self.fixed_step
    }

    /// Advance by a variable real delta, clamped to 250 ms
    pub fn advance_by(&mut self, dt: f64) -> f32 {
        let dt = dt.clamp(0.0, 0.25);
        self.elapsed += dt;
        self.frame += 1;
        dt as f32
    }

    /// Measure real time since the last tick. The first tick reports zero.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        self.real_delta = match self.last_instant {
            Some(last) => now.duration_since(last).as_secs_f64().min(0.25),
            None => 0.0,
        };
        self.last_instant = Some(now);
        self.real_delta
    }

    /// Elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed * 1000.0
    }

    pub fn reset(&mut self) {
        *self = Self {
            fixed_step: self.fixed_step,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = FrameClock::new();
        assert!((clock.fixed_step - 0.016).abs() < 1e-7);
        assert_eq!(clock.elapsed, 0.0);
        assert_eq!(clock.frame, 0);
    }

    #[test]
    fn test_fixed_advance() {
        let mut clock = FrameClock::new();
        for _ in 0..100 {
            clock.advance();
        }
        assert_eq!(clock.frame, 100);
        assert!((clock.elapsed - 1.6).abs() < 1e-4);
        assert!((clock.elapsed_ms() - 1600.0).abs() < 0.1);
    }

    #[test]
    fn test_advance_by_clamps() {
        let mut clock = FrameClock::new();
        let dt = clock.advance_by(3.0);
        assert!((dt - 0.25).abs() < 1e-6);
        assert!((clock.elapsed - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
    }

    #[test]
    fn test_reset_keeps_step() {
        let mut clock = FrameClock::new();
        clock.fixed_step = 0.01;
        clock.advance();
        clock.reset();
        assert_eq!(clock.frame, 0);
        assert!((clock.fixed_step - 0.01).abs() < 1e-7);
    }
}
