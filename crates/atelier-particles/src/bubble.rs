//! Bubbles: short-lived entities released when a crystal transforms

use atelier_core::{Color, SeededRng, Vec3};

use crate::config::BubbleConfig;

/// One bubble. Owned by the crystal that spawned it through an arena slot.
#[derive(Clone, Debug)]
pub struct Bubble {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Color,
    pub base_size: f32,
    /// Visible size after life, pulse and formation factors
    pub size: f32,
    pub opacity: f32,
    pub elegance: f32,
    pub life: f32,
    pub max_life: f32,
    pub life_ratio: f32,
    pub formation_progress: f32,
    pub rotation_speed: Vec3,
    float_phase: f32,
    wobble_freq: f32,
    wobble_amp: f32,
    spiral_phase: f32,
    spiral_speed: f32,
    spiral_radius: f32,
}

impl Bubble {
    pub fn new(position: Vec3, color: Color, size: f32, rng: &mut SeededRng, config: &BubbleConfig) -> Self {
        let velocity = Vec3::new(rng.jitter(1.25), rng.range(2.5, 5.5), rng.jitter(1.25));
        let jitter = config.lifetime_jitter;
        let max_life = config.lifetime * rng.range(1.0 - jitter, 1.0 + jitter);
        Self {
            position,
            velocity,
            color,
            base_size: size,
            size: 0.0,
            opacity: 0.55,
            elegance: 1.0,
            life: max_life,
            max_life,
            life_ratio: 1.0,
            formation_progress: 0.0,
            rotation_speed: Vec3::new(rng.jitter(0.005), rng.jitter(0.004), rng.jitter(0.003)),
            float_phase: rng.range(0.0, std::f32::consts::TAU),
            wobble_freq: rng.range(0.7, 1.3),
            wobble_amp: rng.range(0.18, 0.28),
            spiral_phase: rng.range(0.0, std::f32::consts::TAU),
            spiral_speed: rng.range(0.25, 0.4),
            spiral_radius: rng.range(0.12, 0.2),
        }
    }

    /// Step physics and visuals. Returns false once the bubble has expired.
    pub fn update(&mut self, time: f64, dt: f32, config: &BubbleConfig) -> bool {
        if self.formation_progress < 1.0 {
            self.formation_progress = (self.formation_progress + dt / config.formation_time).min(1.0);
        }
        self.life -= dt;
        self.life_ratio = (self.life / self.max_life).max(0.0);

        let t = time as f32;
        self.velocity.y += config.buoyancy;
        self.velocity *= config.viscosity;

        let wobble = Vec3::new(
            (t * self.wobble_freq + self.float_phase).sin() * self.wobble_amp,
            (t * self.wobble_freq * 0.6 + self.float_phase).cos() * self.wobble_amp * 0.4,
            (t * self.wobble_freq * 0.8 + self.float_phase).sin() * self.wobble_amp * 0.5,
        );
        let spiral = Vec3::new(
            (t * self.spiral_speed + self.spiral_phase).cos() * self.spiral_radius,
            (t * self.spiral_speed * 0.5 + self.spiral_phase).sin() * self.spiral_radius * 0.3,
            (t * self.spiral_speed + self.spiral_phase).sin() * self.spiral_radius,
        );
        self.velocity += (wobble + spiral) * dt;
        self.position += self.velocity * dt;

        let pulse_a = 1.0 + (t * 0.9 + self.float_phase).sin() * 0.04;
        let pulse_b = 1.0 + (t * 1.4 + self.float_phase + 1.0).sin() * 0.02;
        // Below 15% life the size fades out quadratically
        let life_effect = if self.life_ratio > 0.15 {
            self.life_ratio
        } else {
            self.life_ratio * self.life_ratio / 0.15
        };
        self.size = self.base_size * life_effect * pulse_a * pulse_b * self.formation_progress;
        self.opacity = self.life_ratio * 0.8 * self.formation_progress * self.elegance;

        self.life > 0.0
    }

    /// Whether the bubble should be dropped by its owner
    pub fn is_expired(&self, anchor: Vec3, config: &BubbleConfig) -> bool {
        self.life <= 0.0 || self.position.distance(&anchor) >= config.max_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bubble(seed: u32) -> (Bubble, BubbleConfig) {
        let config = BubbleConfig::default();
        let mut rng = SeededRng::new(seed);
        (Bubble::new(Vec3::ZERO, Color::WHITE, 1.0, &mut rng, &config), config)
    }

    #[test]
    fn lifetime_within_jitter() {
        for seed in 1..50 {
            let (b, config) = bubble(seed);
            assert!(b.max_life >= config.lifetime * 0.8 && b.max_life <= config.lifetime * 1.2);
            assert!(b.life > 0.0);
        }
    }

    #[test]
    fn rises_and_forms() {
        let (mut b, config) = bubble(5);
        let mut time = 0.0;
        for _ in 0..200 {
            time += 0.016;
            assert!(b.update(time, 0.016, &config));
            assert!(b.size >= 0.0);
        }
        assert!(b.position.y > 0.0);
        assert!(b.formation_progress > 0.99);
    }

    #[test]
    fn expires_by_life_or_distance() {
        let (mut b, config) = bubble(8);
        assert!(!b.is_expired(Vec3::ZERO, &config));
        assert!(b.is_expired(Vec3::new(0.0, 0.0, 150.0), &config));

        b.life = 0.01;
        assert!(!b.update(0.0, 0.016, &config));
        assert!(b.is_expired(Vec3::ZERO, &config));
        assert_eq!(b.life_ratio, 0.0);
    }
}
