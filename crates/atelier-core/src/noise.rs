//! Deterministic scalar fields for perturbing geometry and motion

use crate::types::Vec3;

/// Layered sin/cos field. Each octave halves amplitude and doubles frequency.
/// Output stays roughly within ±0.5 for four octaves.
pub fn organic_noise(x: f32, y: f32, z: f32, scale: f32, octaves: u32) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = scale;
    for _ in 0..octaves {
        value += (x * frequency + (y * frequency * 0.7).cos()).sin() * amplitude;
        value += (z * frequency + (x * frequency * 0.8).sin()).cos() * amplitude;
        value += ((x + z) * frequency * 0.6).sin() * amplitude * 0.5;
        amplitude *= 0.5;
        frequency *= 2.0;
    }
    value * 0.1
}

/// Product-of-sines swirl used on top of `organic_noise` when deforming meshes
pub fn flow_noise(p: Vec3, seed: f32) -> f32 {
    (p.x * 2.0 + seed).sin() * (p.y * 1.5 + seed * 1.2).cos() * (p.z * 1.8 + seed * 0.8).sin() * 0.15
}

/// Lattice hash in [0, 1]. Constant within each `1/scale` cell.
pub fn hash_noise(x: f32, y: f32, scale: f32) -> f32 {
    let cx = ((x * scale).floor() as i64 & 255) as f32;
    let cy = ((y * scale).floor() as i64 & 255) as f32;
    // `%` keeps the sign of the dividend, so the raw value is in (-1, 1)
    let raw = ((cx * 12.9898 + cy * 78.233).sin() * 43758.547) % 1.0;
    ((raw + 1.0) / 2.0).clamp(0.0, 1.0)
}
