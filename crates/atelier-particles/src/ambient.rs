//! Ambient background: a fixed pool of drifting shapes, recycled in place

use atelier_core::{Color, SeededRng, Vec3};
use serde::Serialize;

use crate::config::AmbientConfig;

/// Low-poly shape an ambient entity is drawn as
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientShape {
    Sphere,
    Tetrahedron,
    Octahedron,
    Icosahedron,
    Dodecahedron,
    Cone,
}

impl AmbientShape {
    pub const ALL: [AmbientShape; 6] = [
        AmbientShape::Sphere,
        AmbientShape::Tetrahedron,
        AmbientShape::Octahedron,
        AmbientShape::Icosahedron,
        AmbientShape::Dodecahedron,
        AmbientShape::Cone,
    ];

    /// Polygon corner count used when drawn as a flat silhouette
    pub fn corners(&self) -> u32 {
        match self {
            AmbientShape::Sphere => 12,
            AmbientShape::Tetrahedron => 3,
            AmbientShape::Octahedron => 4,
            AmbientShape::Icosahedron => 6,
            AmbientShape::Dodecahedron => 5,
            AmbientShape::Cone => 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AmbientParticle {
    pub position: Vec3,
    pub base_position: Vec3,
    pub velocity: Vec3,
    pub size: f32,
    pub color: Color,
    pub opacity: f32,
    pub life: f32,
    pub max_life: f32,
    pub phase: f32,
    pub pulse_phase: f32,
    pub rotation: Vec3,
    pub rotation_speed: Vec3,
    pub shape: AmbientShape,
    pub elegance: f32,
    pub glow_intensity: f32,
    /// Number of times this slot has been recycled
    pub recycled: u32,
}

/// Derived per-frame appearance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientVisual {
    pub scale: f32,
    pub opacity: f32,
    pub color: Color,
}

impl AmbientParticle {
    fn spawn(rng: &mut SeededRng, config: &AmbientConfig) -> Self {
        let position = shell_position(rng, config);
        let life = rng.range(config.life_min, config.life_max);
        Self {
            position,
            base_position: position,
            velocity: Vec3::new(rng.jitter(0.09), rng.jitter(0.075), rng.jitter(0.08)),
            size: rng.range(0.4, 1.0),
            color: random_color(rng),
            opacity: rng.range(0.04, 0.12),
            life,
            max_life: life,
            phase: rng.range(0.0, std::f32::consts::TAU),
            pulse_phase: rng.range(0.0, std::f32::consts::TAU),
            rotation: Vec3::ZERO,
            rotation_speed: Vec3::new(rng.jitter(0.002), rng.jitter(0.0015), rng.jitter(0.00125)),
            shape: AmbientShape::ALL[rng.range_usize(0, AmbientShape::ALL.len())],
            elegance: rng.range(0.9, 1.4),
            glow_intensity: rng.range(0.3, 0.7),
            recycled: 0,
        }
    }

    fn recycle(&mut self, rng: &mut SeededRng, config: &AmbientConfig) {
        self.life = self.max_life;
        self.position = shell_position(rng, config);
        self.base_position = self.position;
        self.color = random_color(rng);
        self.glow_intensity = rng.range(0.3, 0.7);
        self.recycled += 1;
    }

    pub fn life_ratio(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    /// Breathing, distance fade and remaining life applied to size and opacity
    pub fn visual(&self, time: f64, config: &AmbientConfig) -> AmbientVisual {
        let t = time as f32;
        let life_ratio = self.life_ratio();
        let breathing1 = 1.0 + (t * 0.5 + self.phase).sin() * 0.1;
        let breathing2 = 1.0 + (t * 0.8 + self.phase + 1.5).sin() * 0.06;
        let pulse = 1.0 + (t * 1.2 + self.pulse_phase).sin() * 0.04;
        let distance = self.position.length();
        let fade = (1.0 - (distance - config.exclusion_radius) / 70.0).max(0.2);
        let opacity_pulse = 1.0 + (t * 0.7 + self.pulse_phase).sin() * 0.2;
        let hue_shift = (t * 0.1 + self.phase).sin() * 0.1;

        AmbientVisual {
            scale: self.size * breathing1 * breathing2 * pulse * life_ratio * fade * self.elegance,
            opacity: self.opacity * life_ratio * fade * self.elegance * opacity_pulse * self.glow_intensity,
            color: self.color.offset_hsl(hue_shift, 0.0, 0.0),
        }
    }
}

fn random_color(rng: &mut SeededRng) -> Color {
    Color::from_hsl(rng.next_f32(), rng.range(0.3, 0.8), rng.range(0.4, 0.8))
}

/// Sample the thick spherical shell until the point clears the exclusion
/// radius in the horizontal plane.
fn shell_position(rng: &mut SeededRng, config: &AmbientConfig) -> Vec3 {
    let mut candidate = Vec3::ZERO;
    for _ in 0..64 {
        let angle = rng.range(0.0, std::f32::consts::TAU);
        let elevation = rng.jitter(std::f32::consts::PI * 0.35);
        let radius = rng.range(config.shell_min, config.shell_max);
        candidate = Vec3::new(
            radius * elevation.cos() * angle.cos(),
            radius * elevation.sin() + rng.jitter(12.5),
            radius * elevation.cos() * angle.sin(),
        );
        if horizontal_distance(candidate) >= config.exclusion_radius {
            return clamp_to_bounds(candidate, config.bounds);
        }
    }
    // Push the last sample out radially in the horizontal plane
    let horizontal = Vec3::new(candidate.x, 0.0, candidate.z).normalized();
    let horizontal = if horizontal == Vec3::ZERO {
        Vec3::new(1.0, 0.0, 0.0)
    } else {
        horizontal
    };
    let pushed = horizontal * config.exclusion_radius + Vec3::new(0.0, candidate.y, 0.0);
    clamp_to_bounds(pushed, config.bounds)
}

fn horizontal_distance(p: Vec3) -> f32 {
    (p.x * p.x + p.z * p.z).sqrt()
}

fn clamp_to_bounds(p: Vec3, bounds: Vec3) -> Vec3 {
    Vec3::new(
        p.x.clamp(-bounds.x, bounds.x),
        p.y.clamp(-bounds.y, bounds.y),
        p.z.clamp(-bounds.z, bounds.z),
    )
}

/// Wrap an axis that left `[-bound, bound]` to the opposite face and damp
/// the velocity on that axis.
fn wrap_axis(position: &mut f32, velocity: &mut f32, bound: f32, bounce: f32) {
    if *position > bound {
        *position = -bound;
        *velocity *= bounce;
    } else if *position < -bound {
        *position = bound;
        *velocity *= bounce;
    }
}

/// The fixed-size ambient pool
pub struct AmbientPool {
    particles: Vec<AmbientParticle>,
    config: AmbientConfig,
}

impl AmbientPool {
    pub fn new(config: AmbientConfig, rng: &mut SeededRng) -> Self {
        let particles = (0..config.count)
            .map(|_| AmbientParticle::spawn(rng, &config))
            .collect();
        Self { particles, config }
    }

    pub fn particles(&self) -> &[AmbientParticle] {
        &self.particles
    }

    pub fn config(&self) -> &AmbientConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn update(&mut self, time: f64, dt: f32, rng: &mut SeededRng) {
        let config = &self.config;
        let t = time as f32;
        for p in &mut self.particles {
            p.velocity *= config.damping;
            if p.position.length() < config.repel_radius {
                p.velocity += p.position.normalized() * config.repel_strength;
            }
            if rng.chance(config.impulse_chance) {
                let orbital = Vec3::new(
                    (t * 0.06 + p.phase).sin(),
                    (t * 0.04 + p.phase).cos() * 0.4,
                    (t * 0.06 + p.phase).cos(),
                );
                p.velocity += orbital * config.impulse_strength;
            }
            p.position += p.velocity * dt;

            wrap_axis(&mut p.position.x, &mut p.velocity.x, config.bounds.x, config.bounce);
            wrap_axis(&mut p.position.y, &mut p.velocity.y, config.bounds.y, config.bounce);
            wrap_axis(&mut p.position.z, &mut p.velocity.z, config.bounds.z, config.bounce);

            p.rotation += p.rotation_speed;

            p.life -= dt;
            if p.life <= 0.0 {
                p.recycle(rng, config);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn within(p: Vec3, b: Vec3) -> bool {
        p.x.abs() <= b.x && p.y.abs() <= b.y && p.z.abs() <= b.z
    }

    #[test]
    fn spawns_outside_exclusion_and_inside_bounds() {
        let mut rng = SeededRng::new(21);
        let pool = AmbientPool::new(AmbientConfig::default(), &mut rng);
        assert_eq!(pool.len(), 25);
        for p in pool.particles() {
            assert!(horizontal_distance(p.position) >= 35.0 - 1e-3);
            assert!(within(p.position, pool.config().bounds));
            assert_eq!(p.life, p.max_life);
        }
    }

    #[test]
    fn positions_stay_in_bounds() {
        let mut config = AmbientConfig::default();
        config.bounds = Vec3::new(20.0, 10.0, 15.0);
        config.shell_min = 5.0;
        config.shell_max = 25.0;
        config.exclusion_radius = 2.0;
        let mut rng = SeededRng::new(4);
        let mut pool = AmbientPool::new(config, &mut rng);
        for p in &mut pool.particles {
            p.velocity = Vec3::new(400.0, -300.0, 250.0);
        }
        let mut time = 0.0;
        for _ in 0..300 {
            time += 0.016;
            pool.update(time, 0.016, &mut rng);
            for p in pool.particles() {
                assert!(within(p.position, pool.config().bounds));
            }
        }
    }

    #[test]
    fn expired_entities_recycle_in_place() {
        let mut config = AmbientConfig::default();
        config.life_min = 0.1;
        config.life_max = 0.2;
        let mut rng = SeededRng::new(8);
        let mut pool = AmbientPool::new(config, &mut rng);
        let mut time = 0.0;
        for _ in 0..20 {
            time += 0.016;
            pool.update(time, 0.016, &mut rng);
        }
        assert_eq!(pool.len(), 25);
        for p in pool.particles() {
            assert!(p.recycled >= 1);
            assert!(p.life > 0.0);
        }
    }

    #[test]
    fn entity_inside_repel_radius_is_pushed_outward() {
        let mut config = AmbientConfig::default();
        config.impulse_chance = 0.0;
        config.count = 2;
        let mut rng = SeededRng::new(17);
        let mut pool = AmbientPool::new(config, &mut rng);
        let inside = Vec3::new(6.0, 0.0, 8.0);
        let outside = Vec3::new(30.0, 0.0, 40.0);
        for (p, at) in pool.particles.iter_mut().zip([inside, outside]) {
            p.position = at;
            p.velocity = Vec3::ZERO;
            p.life = p.max_life;
        }

        let mut time = 0.0;
        let mut last_radial = 0.0;
        for _ in 0..5 {
            time += 0.016;
            pool.update(time, 0.016, &mut rng);
            let p = &pool.particles()[0];
            let radial = p.velocity.dot(&p.position.normalized());
            assert!(radial > last_radial);
            last_radial = radial;
        }
        assert!(pool.particles()[0].position.length() > 10.0);
        assert_eq!(pool.particles()[1].velocity, Vec3::ZERO);
    }

    #[test]
    fn visual_is_non_negative() {
        let mut rng = SeededRng::new(13);
        let pool = AmbientPool::new(AmbientConfig::default(), &mut rng);
        for p in pool.particles() {
            let v = p.visual(12.5, pool.config());
            assert!(v.scale >= 0.0);
            assert!(v.opacity >= 0.0);
        }
    }
}
