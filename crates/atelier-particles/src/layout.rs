//! Ring layout for the initial crystal field

use atelier_core::{SeededRng, Vec3};
use serde::Serialize;

/// Which ring a crystal sits on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Inner,
    Middle,
    Outer,
    Far,
}

struct Ring {
    radius: f32,
    heights: &'static [f32],
    zone: Zone,
}

const RINGS: [Ring; 4] = [
    Ring {
        radius: 16.0,
        heights: &[-10.0, 0.0, 10.0],
        zone: Zone::Inner,
    },
    Ring {
        radius: 24.0,
        heights: &[-15.0, -5.0, 5.0, 15.0],
        zone: Zone::Middle,
    },
    Ring {
        radius: 32.0,
        heights: &[-8.0, 0.0, 8.0],
        zone: Zone::Outer,
    },
    Ring {
        radius: 40.0,
        heights: &[-12.0, 12.0],
        zone: Zone::Far,
    },
];

/// Number of slots across all rings
pub const MAX_CRYSTALS: usize = 12;

/// Place up to `count` crystals on the rings, inner ring first
pub fn ring_positions(count: usize, rng: &mut SeededRng) -> Vec<(Vec3, Zone)> {
    let mut out = Vec::with_capacity(count.min(MAX_CRYSTALS));
    for ring in &RINGS {
        let slots = ring.heights.len();
        for (i, height) in ring.heights.iter().enumerate() {
            if out.len() >= count {
                return out;
            }
            let angle = (i as f32 / slots as f32) * std::f32::consts::TAU + rng.range(0.0, 0.4);
            let radius = ring.radius + rng.jitter(2.5);
            let y = height + rng.jitter(2.0);
            out.push((
                Vec3::new(angle.cos() * radius, y, angle.sin() * radius),
                ring.zone,
            ));
        }
    }
    out
}
