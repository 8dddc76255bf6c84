//! Crystal particles and their lifecycle:
//! `Forming -> Active -> Transforming -> Dormant -> Forming`.

use atelier_core::easing::{approach, smootherstep};
use atelier_core::{Color, SeededRng, SlotId, Vec3};
use serde::Serialize;

use crate::arena::Arena;
use crate::bubble::Bubble;
use crate::config::{BubbleConfig, CrystalConfig};
use crate::geometry::{
    build_crystal_geometry, build_glow_geometry, GeometryHandle, GeometryStore, ShapeKind,
};
use crate::layout::Zone;
use crate::palette;

const BASE_ENERGY: f32 = 0.4;
const BASE_INTENSITY: f32 = 0.3;
const BASE_GLOW: f32 = 0.3;

/// Lifecycle state. Exactly one holds at a time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CrystalPhase {
    Forming { elapsed: f32 },
    Active,
    Transforming { progress: f32 },
    Dormant { respawn_timer: f32 },
}

impl CrystalPhase {
    pub fn is_visible(&self) -> bool {
        !matches!(self, CrystalPhase::Dormant { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            CrystalPhase::Forming { .. } => "forming",
            CrystalPhase::Active => "active",
            CrystalPhase::Transforming { .. } => "transforming",
            CrystalPhase::Dormant { .. } => "dormant",
        }
    }
}

/// What a click did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The crystal was not Active
    Ignored,
    /// Energized; `count` clicks so far in the current run
    Energized { count: u32 },
    /// The click completed a run and the crystal burst into bubbles
    Transformed { bubbles: usize },
}

/// Lifecycle transitions reported by `Crystal::update`
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PhaseEvent {
    None,
    Formed,
    BecameDormant,
    /// The respawn delay has elapsed; carries the time past the deadline
    RespawnDue { overflow: f32 },
}

/// Per-crystal idle motion parameters, rolled at spawn
#[derive(Clone, Debug)]
struct IdleMotion {
    float_amplitude: f32,
    float_speed: f32,
    phase: f32,
    orbital_radius: f32,
    orbital_speed: f32,
    orbital_phase: f32,
    pulse_phase: f32,
    harmonic_phase: f32,
}

impl IdleMotion {
    fn roll(rng: &mut SeededRng) -> Self {
        let tau = std::f32::consts::TAU;
        Self {
            float_amplitude: rng.range(0.4, 0.7),
            float_speed: rng.range(0.006, 0.014),
            phase: rng.range(0.0, tau),
            orbital_radius: rng.range(0.5, 0.8),
            orbital_speed: rng.range(0.02, 0.03),
            orbital_phase: rng.range(0.0, tau),
            pulse_phase: rng.range(0.0, tau),
            harmonic_phase: rng.range(0.0, tau),
        }
    }
}

/// A crystal in the scene
#[derive(Clone, Debug)]
pub struct Crystal {
    pub index: usize,
    pub zone: Zone,
    pub position: Vec3,
    pub base_position: Vec3,
    pub color_index: usize,
    pub base_color: Color,
    pub base_scale: f32,
    pub current_scale: f32,
    pub shape: ShapeKind,
    pub geometry: GeometryHandle,
    pub glow_geometry: GeometryHandle,
    pub rotation_speed: Vec3,
    pub phase: CrystalPhase,
    pub formation_progress: f32,

    pub energy: f32,
    pub intensity: f32,
    pub elegance: f32,
    pub glow_intensity: f32,
    pub color_shift: f32,

    pub hovered: bool,
    pub hover_progress: f32,
    pub face_spread: f32,
    pub click_feedback: f32,
    target_hover: f32,
    target_glow: f32,
    target_face_spread: f32,
    spread_reset: Option<f32>,

    click_count: u32,
    last_click: Option<f64>,

    /// Bubbles this crystal owns, as slots in the shared bubble arena
    pub bubbles: Vec<SlotId>,
    /// Incremented on every respawn
    pub generation: u32,
    motion: IdleMotion,
}

impl Crystal {
    /// Spawn an Active crystal at full scale with fresh geometry and colour
    pub fn spawn(
        index: usize,
        zone: Zone,
        position: Vec3,
        rng: &mut SeededRng,
        store: &mut GeometryStore,
    ) -> Self {
        let geometry = build_crystal_geometry(index, rng);
        let shape = geometry.kind;
        let glow = build_glow_geometry(&geometry, index);
        let motion = IdleMotion::roll(rng);
        let rotation_speed = Vec3::new(rng.jitter(0.001), rng.jitter(0.0015), rng.jitter(0.00075));
        let base_scale = rng.range(1.2, 2.0);
        let color_index = palette::pick(rng);

        Self {
            index,
            zone,
            position,
            base_position: position,
            color_index,
            base_color: palette::palette_color(color_index),
            base_scale,
            current_scale: base_scale,
            shape,
            geometry: store.insert(geometry),
            glow_geometry: store.insert(glow),
            rotation_speed,
            phase: CrystalPhase::Active,
            formation_progress: 1.0,
            energy: BASE_ENERGY,
            intensity: BASE_INTENSITY,
            elegance: 1.0,
            glow_intensity: BASE_GLOW,
            color_shift: 0.0,
            hovered: false,
            hover_progress: 0.0,
            face_spread: 0.0,
            click_feedback: 0.0,
            target_hover: 0.0,
            target_glow: BASE_GLOW,
            target_face_spread: 0.0,
            spread_reset: None,
            click_count: 0,
            last_click: None,
            bubbles: Vec::new(),
            generation: 0,
            motion,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == CrystalPhase::Active
    }

    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    /// Advance one frame. Resource work (respawn) is left to the caller.
    pub fn update(&mut self, time: f64, dt: f32, config: &CrystalConfig) -> PhaseEvent {
        self.update_interactions(dt, config);

        match self.phase {
            CrystalPhase::Forming { elapsed } => {
                let elapsed = elapsed + dt;
                self.idle_motion(time);
                self.apply_formation(elapsed, config);
                if elapsed >= config.formation_duration {
                    self.phase = CrystalPhase::Active;
                    PhaseEvent::Formed
                } else {
                    self.phase = CrystalPhase::Forming { elapsed };
                    PhaseEvent::None
                }
            }
            CrystalPhase::Active => {
                self.idle_motion(time);
                self.idle_scale(time);
                self.relax(dt);
                PhaseEvent::None
            }
            CrystalPhase::Transforming { progress } => {
                let progress = progress + dt / config.transform_duration;
                if progress >= 1.0 {
                    let overflow = (progress - 1.0) * config.transform_duration;
                    self.phase = CrystalPhase::Dormant {
                        respawn_timer: overflow,
                    };
                    self.current_scale = 0.0;
                    self.formation_progress = 0.0;
                    self.glow_intensity = 0.0;
                    PhaseEvent::BecameDormant
                } else {
                    self.phase = CrystalPhase::Transforming { progress };
                    self.apply_transform(progress);
                    PhaseEvent::None
                }
            }
            CrystalPhase::Dormant { respawn_timer } => {
                let respawn_timer = respawn_timer + dt;
                self.phase = CrystalPhase::Dormant { respawn_timer };
                if respawn_timer >= config.respawn_delay {
                    PhaseEvent::RespawnDue {
                        overflow: respawn_timer - config.respawn_delay,
                    }
                } else {
                    PhaseEvent::None
                }
            }
        }
    }

    fn update_interactions(&mut self, dt: f32, config: &CrystalConfig) {
        self.hover_progress = approach(self.hover_progress, self.target_hover, dt * config.hover_rate);
        self.glow_intensity = approach(self.glow_intensity, self.target_glow, dt * config.glow_rate);
        self.face_spread = approach(self.face_spread, self.target_face_spread, dt * config.hover_rate);
        if self.click_feedback > 0.0 {
            self.click_feedback = (self.click_feedback - dt * config.click_feedback_decay).max(0.0);
        }
        if let Some(remaining) = self.spread_reset {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.spread_reset = None;
                self.target_face_spread = if self.hovered { config.face_spread } else { 0.0 };
            } else {
                self.spread_reset = Some(remaining);
            }
        }
    }

    /// Sum of float and orbital sinusoids around the anchor
    fn idle_motion(&mut self, time: f64) {
        let t = time as f32;
        let m = &self.motion;
        let float1 = (t * m.float_speed + m.phase).sin() * m.float_amplitude;
        let float2 = (t * m.float_speed * 0.7 + m.phase).cos() * m.float_amplitude * 0.6;
        let float3 = (t * m.float_speed * 0.4 + m.phase).sin() * m.float_amplitude * 0.3;
        let orbit_mul = 1.0 + self.hover_progress * 0.5;
        let orbital1 = (t * m.orbital_speed * orbit_mul + m.orbital_phase).sin() * m.orbital_radius;
        let orbital2 =
            (t * m.orbital_speed * 0.8 * orbit_mul + m.orbital_phase).cos() * m.orbital_radius * 0.5;
        self.position = self.base_position + Vec3::new(float1 + orbital1, float2 + orbital2, float3);
    }

    fn idle_scale(&mut self, time: f64) {
        let t = time as f32;
        let m = &self.motion;
        let breathing1 = (t * 0.3 + m.pulse_phase).sin() * 0.025;
        let breathing2 = (t * 0.5 + m.harmonic_phase).sin() * 0.015;
        let hover_breathing = (t * 0.8 + m.phase).sin() * 0.02 * self.hover_progress;
        self.current_scale = (self.base_scale + breathing1 + breathing2 + hover_breathing).max(0.0);
    }

    fn relax(&mut self, dt: f32) {
        if self.energy > BASE_ENERGY {
            let rate = if self.hovered { 0.05 } else { 0.15 };
            self.energy = (self.energy - dt * rate).max(BASE_ENERGY);
        }
        if !self.hovered && self.intensity > BASE_INTENSITY {
            self.intensity = (self.intensity - dt * 0.25).max(BASE_INTENSITY);
        }
        if self.color_shift > 0.0 {
            self.color_shift = (self.color_shift - dt * 0.3).max(0.0);
        }
        if self.elegance < 1.0 {
            self.elegance = (self.elegance + dt * 0.5).min(1.0);
        }
    }

    fn apply_formation(&mut self, elapsed: f32, config: &CrystalConfig) {
        let p = (elapsed / config.formation_duration).clamp(0.0, 1.0);
        let eased = smootherstep(p);
        self.formation_progress = eased;
        self.current_scale = self.base_scale * eased;
        self.energy = BASE_ENERGY + (1.0 - p) * 2.0;
        self.elegance = 0.5 + eased * 0.5;
        self.glow_intensity = BASE_GLOW + (1.0 - p) * 1.5;
    }

    fn apply_transform(&mut self, progress: f32) {
        let eased = smootherstep(progress);
        let rest = 1.0 - progress;
        self.current_scale = self.base_scale * (1.0 - eased);
        self.formation_progress = rest;
        self.energy = 2.5 * rest;
        self.intensity = 1.5 * rest;
        self.elegance = 2.0 * rest;
        self.color_shift = progress;
        self.glow_intensity = 4.0 * rest;
    }

    /// Hover on/off. Returns false when the crystal is not Active.
    pub fn on_hover(&mut self, hovered: bool, config: &CrystalConfig) -> bool {
        if !self.is_active() {
            return false;
        }
        self.hovered = hovered;
        self.target_hover = if hovered { 1.0 } else { 0.0 };
        self.target_glow = if hovered { config.hover_glow } else { BASE_GLOW };
        self.target_face_spread = if hovered { config.face_spread } else { 0.0 };
        self.intensity = if hovered { 0.8 } else { BASE_INTENSITY };
        self.elegance = if hovered { 1.4 } else { 1.0 };
        true
    }

    /// Register a click at `now` seconds. The final click of a run starts the
    /// transform and spawns bubbles into `bubbles`.
    pub fn on_click(
        &mut self,
        now: f64,
        config: &CrystalConfig,
        bubble_config: &BubbleConfig,
        rng: &mut SeededRng,
        bubbles: &mut Arena<Bubble>,
    ) -> ClickOutcome {
        if !self.is_active() {
            return ClickOutcome::Ignored;
        }

        let within_window = self
            .last_click
            .map(|last| {
                let gap = now - last;
                (0.0..=config.click_window as f64).contains(&gap)
            })
            .unwrap_or(false);
        self.click_count = if within_window { self.click_count + 1 } else { 1 };
        self.last_click = Some(now);

        self.energy = (self.energy + 1.2).min(2.5);
        self.intensity = (self.intensity + 1.0).min(1.5);
        self.elegance = (self.elegance + 0.5).min(1.8);
        self.click_feedback = 1.0;
        self.glow_intensity = (self.glow_intensity + 1.0).min(3.0);
        self.color_shift = 0.8;
        self.target_face_spread = config.face_spread * 1.5;
        self.spread_reset = Some(config.click_spread_duration);

        if self.click_count >= config.clicks_to_transform {
            let count = self.begin_transform(config, bubble_config, rng, bubbles);
            ClickOutcome::Transformed { bubbles: count }
        } else {
            ClickOutcome::Energized {
                count: self.click_count,
            }
        }
    }

    /// Enter Transforming and release the bubble spiral. Returns the number
    /// of bubbles spawned, or 0 if the crystal was already transforming or dormant.
    pub fn begin_transform(
        &mut self,
        config: &CrystalConfig,
        bubble_config: &BubbleConfig,
        rng: &mut SeededRng,
        bubbles: &mut Arena<Bubble>,
    ) -> usize {
        if matches!(
            self.phase,
            CrystalPhase::Transforming { .. } | CrystalPhase::Dormant { .. }
        ) {
            return 0;
        }
        self.phase = CrystalPhase::Transforming { progress: 0.0 };
        self.click_count = 0;

        let count = rng.range_usize(config.bubbles_min, config.bubbles_max);
        for i in 0..count {
            let t = i as f32 / count as f32;
            let angle = t * 4.0 * std::f32::consts::TAU;
            let radius = 1.0 + t * 2.5 + rng.range(0.0, 0.6);
            let height = (t - 0.5) * 3.5 + rng.range(0.0, 1.2);
            let position =
                self.position + Vec3::new(radius * angle.cos(), height, radius * angle.sin());
            let color = self.base_color.offset_hsl(
                rng.jitter(0.2),
                rng.range(-0.1, 0.1),
                rng.range(-0.1, 0.1),
            );
            let size = rng.range(bubble_config.min_size, bubble_config.max_size);

            let mut bubble = Bubble::new(position, color, size, rng, bubble_config);
            let direction = Vec3::new(angle.cos(), rng.range(0.9, 1.4), angle.sin()).normalized();
            bubble.velocity += direction * rng.range(2.5, 4.5);
            self.bubbles.push(bubbles.insert(bubble));
        }
        log::debug!("crystal {} transformed into {count} bubbles", self.index);
        count
    }

    /// Release bubbles and geometry, roll a new mesh and colour and start forming
    pub fn respawn(
        &mut self,
        overflow: f32,
        config: &CrystalConfig,
        rng: &mut SeededRng,
        store: &mut GeometryStore,
        bubbles: &mut Arena<Bubble>,
    ) {
        self.release(store, bubbles);

        let geometry = build_crystal_geometry(self.index, rng);
        self.shape = geometry.kind;
        let glow = build_glow_geometry(&geometry, self.index);
        self.geometry = store.insert(geometry);
        self.glow_geometry = store.insert(glow);
        self.color_index = palette::pick_other(rng, self.color_index);
        self.base_color = palette::palette_color(self.color_index);

        self.click_count = 0;
        self.last_click = None;
        self.color_shift = 0.0;
        self.intensity = BASE_INTENSITY;
        self.hovered = false;
        self.hover_progress = 0.0;
        self.target_hover = 0.0;
        self.target_glow = BASE_GLOW;
        self.face_spread = 0.0;
        self.target_face_spread = 0.0;
        self.spread_reset = None;
        self.click_feedback = 0.0;
        self.generation += 1;

        self.phase = CrystalPhase::Forming { elapsed: overflow };
        self.apply_formation(overflow, config);
        log::debug!(
            "crystal {} respawned as {:?} in {}",
            self.index,
            self.shape,
            palette::palette_name(self.color_index)
        );
    }

    /// Free every bubble and both meshes this crystal owns
    pub fn release(&mut self, store: &mut GeometryStore, bubbles: &mut Arena<Bubble>) {
        for id in self.bubbles.drain(..) {
            bubbles.remove(id);
        }
        store.release(self.geometry);
        store.release(self.glow_geometry);
    }
}
