//! Magnetic pull toward the hovered link or button

use atelier_core::Vec2;
use atelier_runtime::TargetInfo;

/// Pull range around the element centre, in px
pub const MAGNETIC_RANGE: f32 = 140.0;
const WOBBLE: f32 = 2.0;

/// Centre of the nearest `a`/`button` with known bounds, if the target is interactive
pub fn magnetic_center(target: &TargetInfo) -> Option<Vec2> {
    if !target.is_interactive() {
        return None;
    }
    target
        .closest_clickable()
        .and_then(|t| t.bounds)
        .map(|b| b.center())
}

/// Pull `point` toward `center` by `strength × ((range − d) / range)^1.5`
pub fn pull(point: Vec2, center: Vec2, strength: f32) -> Vec2 {
    let d = point.distance(&center);
    if d >= MAGNETIC_RANGE {
        return point;
    }
    let f = ((MAGNETIC_RANGE - d) / MAGNETIC_RANGE).powf(1.5);
    point + (center - point) * (strength * f)
}

/// Pull plus the small time wobble applied while inside the range
pub fn apply(point: Vec2, center: Option<Vec2>, strength: f32, time_ms: f64) -> Vec2 {
    let Some(center) = center else {
        return point;
    };
    if point.distance(&center) >= MAGNETIC_RANGE {
        return point;
    }
    let phase = (time_ms * 0.003) as f32;
    pull(point, center, strength) + Vec2::new(phase.sin() * WOBBLE, phase.cos() * WOBBLE)
}
