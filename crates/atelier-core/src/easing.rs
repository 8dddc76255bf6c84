//! Easing curves and smoothing helpers

/// Quintic ease `t³(10 − 15t + 6t²)` with `t` clamped to [0, 1]
pub fn smootherstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (10.0 + t * (-15.0 + 6.0 * t))
}

/// Linear interpolation between two floats
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Exponential smoothing step: move `current` toward `target` by `factor`
/// (usually `dt × rate`), never overshooting.
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    lerp(current, target, factor.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smootherstep_endpoints_and_midpoint() {
        assert_eq!(smootherstep(0.0), 0.0);
        assert!((smootherstep(1.0) - 1.0).abs() < 1e-6);
        assert!((smootherstep(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(smootherstep(-3.0), 0.0);
        assert!((smootherstep(7.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn smootherstep_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = smootherstep(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn approach_never_overshoots() {
        assert_eq!(approach(0.0, 1.0, 5.0), 1.0);
        assert!((approach(0.0, 1.0, 0.25) - 0.25).abs() < 1e-6);
        assert_eq!(approach(0.3, 1.0, -1.0), 0.3);
    }
}
