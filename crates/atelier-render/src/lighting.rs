//! Animated lighting rig for the crystal scene
//!
//! An ambient term plus six lights that drift along slow orbits and
//! figure-eights. Shading is Lambertian per face; point and spot lights
//! fall off linearly to their cutoff distance, raised to the decay power.

use std::f32::consts::PI;

use atelier_core::{Color, Vec3};

const BASE_INTENSITIES: [f32; 6] = [1.4, 0.9, 0.7, 0.6, 0.5, 0.4];
const DECAY: f32 = 2.0;
const SPOT_ANGLE: f32 = PI / 2.8;
const SPOT_PENUMBRA: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Shines from `position` toward the origin
    Directional,
    Point { distance: f32 },
    /// Cone aimed at the origin
    Spot { distance: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    /// Irradiance factor this light contributes to a face
    fn contribution(&self, normal: Vec3, point: Vec3) -> f32 {
        let (to_light, falloff) = match self.kind {
            LightKind::Directional => (self.position.normalized(), 1.0),
            LightKind::Point { distance } => {
                let rel = self.position - point;
                (rel.normalized(), range_falloff(rel.length(), distance))
            }
            LightKind::Spot { distance } => {
                let rel = self.position - point;
                let axis = (Vec3::ZERO - self.position).normalized();
                let cos_theta = (rel.normalized() * -1.0).dot(&axis);
                let outer = SPOT_ANGLE.cos();
                let inner = (SPOT_ANGLE * (1.0 - SPOT_PENUMBRA)).cos();
                let cone = smoothstep(outer, inner, cos_theta);
                (rel.normalized(), range_falloff(rel.length(), distance) * cone)
            }
        };
        normal.dot(&to_light).max(0.0) * falloff * self.intensity
    }
}

fn range_falloff(d: f32, cutoff: f32) -> f32 {
    if cutoff <= 0.0 {
        return 1.0;
    }
    (1.0 - d / cutoff).clamp(0.0, 1.0).powf(DECAY)
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub struct LightingRig {
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    lights: [Light; 6],
}

impl LightingRig {
    pub fn new() -> Self {
        let mut rig = Self {
            ambient_color: Color::from_hex(0xf8f9fa),
            ambient_intensity: 0.35,
            lights: [
                Light {
                    kind: LightKind::Directional,
                    position: Vec3::new(18.0, 28.0, 12.0),
                    color: Color::from_hex(0xffffff),
                    intensity: BASE_INTENSITIES[0],
                },
                Light {
                    kind: LightKind::Point { distance: 60.0 },
                    position: Vec3::new(-18.0, 18.0, 22.0),
                    color: Color::from_hex(0x0066cc),
                    intensity: BASE_INTENSITIES[1],
                },
                Light {
                    kind: LightKind::Point { distance: 55.0 },
                    position: Vec3::new(22.0, 5.0, 28.0),
                    color: Color::from_hex(0xfdcb6e),
                    intensity: BASE_INTENSITIES[2],
                },
                Light {
                    kind: LightKind::Point { distance: 50.0 },
                    position: Vec3::new(0.0, 25.0, -35.0),
                    color: Color::from_hex(0x6c5ce7),
                    intensity: BASE_INTENSITIES[3],
                },
                Light {
                    kind: LightKind::Spot { distance: 70.0 },
                    position: Vec3::new(0.0, 40.0, 0.0),
                    color: Color::from_hex(0x74b9ff),
                    intensity: BASE_INTENSITIES[4],
                },
                Light {
                    kind: LightKind::Point { distance: 45.0 },
                    position: Vec3::new(-20.0, 15.0, 25.0),
                    color: Color::from_hex(0x9b59b6),
                    intensity: BASE_INTENSITIES[5],
                },
            ],
        };
        rig.update(0.0);
        rig
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Move every light to its position at `time` seconds
    pub fn update(&mut self, time: f64) {
        let t = time as f32;
        self.ambient_intensity = 0.35 + (t * 0.09).sin() * 0.08 + (t * 0.15).sin() * 0.03;

        for (i, light) in self.lights.iter_mut().enumerate() {
            let offset = i as f32 * 0.8;
            light.intensity = BASE_INTENSITIES[i]
                + (t * 0.07 + offset).sin() * 0.2
                + (t * 0.12 + offset + 1.5).sin() * 0.1;

            light.position = match i {
                0 => {
                    let f = t * 0.025;
                    Vec3::new(
                        f.sin() * 10.0 + (f * 2.0).sin() * 3.0,
                        28.0 + (t * 0.035).sin() * 4.0,
                        (f * 2.0).sin() * 8.0,
                    )
                }
                1 => {
                    let a = t * 0.018 + PI;
                    let r = 20.0 + (t * 0.05).sin() * 5.0;
                    Vec3::new(a.cos() * r, 18.0 + (t * 0.03).sin() * 6.0, a.sin() * r)
                }
                2 => {
                    let a = -t * 0.015 + PI / 2.0;
                    Vec3::new(a.cos() * 28.0, 5.0 + (t * 0.04 + PI).sin() * 8.0, a.sin() * 28.0)
                }
                3 => Vec3::new(
                    (t * 0.022).sin() * 15.0 + (t * 0.03).cos() * 5.0,
                    25.0 + (t * 0.028).sin() * 7.0,
                    -35.0 + (t * 0.02).sin() * 8.0,
                ),
                4 => {
                    let sweep = (t * 0.012).sin() * 0.8;
                    Vec3::new(sweep.sin() * 10.0, 40.0, sweep.cos() * 10.0)
                }
                _ => Vec3::new(
                    -20.0 + (t * 0.016).sin() * 8.0,
                    15.0 + (t * 0.025).cos() * 5.0,
                    25.0 + (t * 0.02).sin() * 6.0,
                ),
            };
        }
    }

    /// Lit colour of a face with `normal` at `point`. Alpha passes through.
    pub fn shade(&self, normal: Vec3, point: Vec3, base: Color) -> Color {
        let mut r = self.ambient_color.r * self.ambient_intensity;
        let mut g = self.ambient_color.g * self.ambient_intensity;
        let mut b = self.ambient_color.b * self.ambient_intensity;
        for light in &self.lights {
            let k = light.contribution(normal, point);
            r += light.color.r * k;
            g += light.color.g * k;
            b += light.color.b * k;
        }
        Color::new(
            (base.r * r).min(1.0),
            (base.g * g).min(1.0),
            (base.b * b).min(1.0),
            base.a,
        )
    }
}

impl Default for LightingRig {
    fn default() -> Self {
        Self::new()
    }
}
