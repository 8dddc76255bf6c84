//! Damped springs driving the follower position and the cursor scale

use atelier_core::Vec2;

use crate::config::SpringConfig;

/// Sub-steps per frame; keeps stiff springs stable at a 16 ms step
const SUBSTEPS: u32 = 4;

/// One-dimensional damped spring (Hooke's law plus linear damping)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
    config: SpringConfig,
}

impl Spring {
    pub fn new(value: f32, config: SpringConfig) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            config,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to `value` with no motion
    pub fn snap(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn step(&mut self, dt: f32) -> f32 {
        let h = dt / SUBSTEPS as f32;
        for _ in 0..SUBSTEPS {
            let spring_force = (self.target - self.value) * self.config.stiffness;
            let damping_force = -self.velocity * self.config.damping;
            self.velocity += (spring_force + damping_force) / self.config.mass * h;
            self.value += self.velocity * h;
        }
        self.value
    }

    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.target - self.value).abs() < epsilon && self.velocity.abs() < epsilon
    }
}

/// Two independent springs for a screen position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring2 {
    pub x: Spring,
    pub y: Spring,
}

impl Spring2 {
    pub fn new(position: Vec2, config: SpringConfig) -> Self {
        Self {
            x: Spring::new(position.x, config),
            y: Spring::new(position.y, config),
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.x.set_target(target.x);
        self.y.set_target(target.y);
    }

    pub fn snap(&mut self, position: Vec2) {
        self.x.snap(position.x);
        self.y.snap(position.y);
    }

    pub fn step(&mut self, dt: f32) -> Vec2 {
        Vec2::new(self.x.step(dt), self.y.step(dt))
    }

    pub fn value(&self) -> Vec2 {
        Vec2::new(self.x.value, self.y.value)
    }

    pub fn target(&self) -> Vec2 {
        Vec2::new(self.x.target, self.y.target)
    }
}
