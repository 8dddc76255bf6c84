//! Tunables for the crystal scene. Every field has a default, so a partial
//! TOML table only overrides what it names.

use atelier_core::{AtelierError, Result, Vec3};
use serde::{Deserialize, Serialize};

use crate::layout::MAX_CRYSTALS;

/// Crystal lifecycle and interaction tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrystalConfig {
    pub count: usize,
    pub formation_duration: f32,
    pub transform_duration: f32,
    pub respawn_delay: f32,
    /// Longest gap between clicks that still counts toward a transform, in seconds
    pub click_window: f32,
    pub clicks_to_transform: u32,
    /// Bubbles spawned per transform, lower bound inclusive
    pub bubbles_min: usize,
    /// Upper bound, exclusive
    pub bubbles_max: usize,
    pub hover_glow: f32,
    pub face_spread: f32,
    pub hover_rate: f32,
    pub glow_rate: f32,
    pub click_feedback_decay: f32,
    pub click_spread_duration: f32,
}

impl Default for CrystalConfig {
    fn default() -> Self {
        Self {
            count: MAX_CRYSTALS,
            formation_duration: 3.5,
            transform_duration: 4.0,
            respawn_delay: 6.0,
            click_window: 1.0,
            clicks_to_transform: 3,
            bubbles_min: 50,
            bubbles_max: 75,
            hover_glow: 2.5,
            face_spread: 0.8,
            hover_rate: 4.0,
            glow_rate: 3.0,
            click_feedback_decay: 5.0,
            click_spread_duration: 0.2,
        }
    }
}

impl CrystalConfig {
    pub fn validate(&self) -> Result<()> {
        AtelierError::check_range("crystals.count", self.count as f64, 0.0, MAX_CRYSTALS as f64)?;
        positive("crystals.formation_duration", self.formation_duration)?;
        positive("crystals.transform_duration", self.transform_duration)?;
        AtelierError::check_range("crystals.respawn_delay", self.respawn_delay as f64, 0.0, 3600.0)?;
        positive("crystals.click_window", self.click_window)?;
        AtelierError::check_range(
            "crystals.clicks_to_transform",
            self.clicks_to_transform as f64,
            1.0,
            100.0,
        )?;
        AtelierError::check_range("crystals.bubbles_min", self.bubbles_min as f64, 0.0, 10_000.0)?;
        AtelierError::check_range(
            "crystals.bubbles_max",
            self.bubbles_max as f64,
            self.bubbles_min as f64,
            10_000.0,
        )?;
        non_negative("crystals.hover_rate", self.hover_rate)?;
        non_negative("crystals.glow_rate", self.glow_rate)?;
        non_negative("crystals.click_feedback_decay", self.click_feedback_decay)?;
        non_negative("crystals.click_spread_duration", self.click_spread_duration)?;
        Ok(())
    }
}

/// Bubble physics tunables. Buoyancy and viscosity apply once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    pub buoyancy: f32,
    pub viscosity: f32,
    pub lifetime: f32,
    /// Lifetime is scaled by U(1 - jitter, 1 + jitter)
    pub lifetime_jitter: f32,
    pub formation_time: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub max_distance: f32,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            buoyancy: 0.012,
            viscosity: 0.98,
            lifetime: 15.0,
            lifetime_jitter: 0.2,
            formation_time: 2.5,
            min_size: 0.4,
            max_size: 1.4,
            max_distance: 100.0,
        }
    }
}

impl BubbleConfig {
    pub fn validate(&self) -> Result<()> {
        AtelierError::check_range("bubbles.viscosity", self.viscosity as f64, 0.0, 1.0)?;
        positive("bubbles.lifetime", self.lifetime)?;
        AtelierError::check_range("bubbles.lifetime_jitter", self.lifetime_jitter as f64, 0.0, 0.99)?;
        positive("bubbles.formation_time", self.formation_time)?;
        non_negative("bubbles.min_size", self.min_size)?;
        AtelierError::check_range(
            "bubbles.max_size",
            self.max_size as f64,
            self.min_size as f64,
            1000.0,
        )?;
        positive("bubbles.max_distance", self.max_distance)?;
        Ok(())
    }
}

/// Ambient background pool tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub count: usize,
    pub shell_min: f32,
    pub shell_max: f32,
    pub exclusion_radius: f32,
    pub bounds: Vec3,
    /// Velocity factor applied on the crossed axis
    pub bounce: f32,
    /// Per-frame velocity damping
    pub damping: f32,
    pub repel_radius: f32,
    pub repel_strength: f32,
    /// Per-frame probability of an orbital nudge
    pub impulse_chance: f32,
    pub impulse_strength: f32,
    pub life_min: f32,
    pub life_max: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            count: 25,
            shell_min: 40.0,
            shell_max: 90.0,
            exclusion_radius: 35.0,
            bounds: Vec3::new(70.0, 50.0, 60.0),
            bounce: -0.25,
            damping: 0.9996,
            repel_radius: 40.0,
            repel_strength: 0.025,
            impulse_chance: 0.004,
            impulse_strength: 0.012,
            life_min: 50.0,
            life_max: 120.0,
        }
    }
}

impl AmbientConfig {
    pub fn validate(&self) -> Result<()> {
        AtelierError::check_range("ambient.count", self.count as f64, 0.0, 10_000.0)?;
        non_negative("ambient.shell_min", self.shell_min)?;
        AtelierError::check_range(
            "ambient.shell_max",
            self.shell_max as f64,
            self.shell_min as f64,
            1.0e4,
        )?;
        non_negative("ambient.exclusion_radius", self.exclusion_radius)?;
        positive("ambient.bounds.x", self.bounds.x)?;
        positive("ambient.bounds.y", self.bounds.y)?;
        positive("ambient.bounds.z", self.bounds.z)?;
        AtelierError::check_range("ambient.bounce", self.bounce as f64, -1.0, 0.0)?;
        AtelierError::check_range("ambient.damping", self.damping as f64, 0.0, 1.0)?;
        AtelierError::check_range("ambient.impulse_chance", self.impulse_chance as f64, 0.0, 1.0)?;
        positive("ambient.life_min", self.life_min)?;
        AtelierError::check_range(
            "ambient.life_max",
            self.life_max as f64,
            self.life_min as f64,
            1.0e6,
        )?;
        Ok(())
    }
}

/// Everything the crystal scene needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub crystals: CrystalConfig,
    pub bubbles: BubbleConfig,
    pub ambient: AmbientConfig,
}

impl SceneConfig {
    pub fn validate(&self) -> Result<()> {
        self.crystals.validate()?;
        self.bubbles.validate()?;
        self.ambient.validate()
    }
}

fn positive(field: &str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(AtelierError::ValueOutOfRange {
            field: field.to_string(),
            min: f64::MIN_POSITIVE,
            max: f64::MAX,
            value: value as f64,
        })
    }
}

fn non_negative(field: &str, value: f32) -> Result<()> {
    AtelierError::check_range(field, value as f64, 0.0, f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        SceneConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_table_keeps_defaults() {
        let config: SceneConfig = toml::from_str(
            r#"
            [crystals]
            respawn_delay = 2.0

            [ambient]
            count = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.crystals.respawn_delay, 2.0);
        assert_eq!(config.crystals.transform_duration, 4.0);
        assert_eq!(config.ambient.count, 5);
        assert_eq!(config.bubbles, BubbleConfig::default());
    }

    #[test]
    fn inverted_ranges_rejected() {
        let mut config = SceneConfig::default();
        config.crystals.bubbles_max = 10;
        assert!(matches!(
            config.validate(),
            Err(AtelierError::ValueOutOfRange { ref field, .. }) if field == "crystals.bubbles_max"
        ));

        let mut config = SceneConfig::default();
        config.crystals.transform_duration = 0.0;
        assert!(config.validate().is_err());
    }
}
