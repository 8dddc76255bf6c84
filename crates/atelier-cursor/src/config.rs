//! Cursor configuration: the surface the embedding page supplies

use std::fmt;
use std::str::FromStr;

use atelier_core::{AtelierError, Color, Result};
use serde::{Deserialize, Serialize};

/// Named visual preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Soft radial gradient; the only theme that records ink strokes
    #[default]
    Watercolor,
    Premium,
    Aurora,
    Liquid,
    Ethereal,
    Cosmic,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Watercolor,
        Theme::Premium,
        Theme::Aurora,
        Theme::Liquid,
        Theme::Ethereal,
        Theme::Cosmic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Watercolor => "watercolor",
            Theme::Premium => "premium",
            Theme::Aurora => "aurora",
            Theme::Liquid => "liquid",
            Theme::Ethereal => "ethereal",
            Theme::Cosmic => "cosmic",
        }
    }

    pub fn records_ink(&self) -> bool {
        *self == Theme::Watercolor
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = AtelierError;

    fn from_str(s: &str) -> Result<Self> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AtelierError::InvalidEnumValue {
                value: s.to_string(),
                allowed: Theme::ALL.iter().map(|t| t.as_str().to_string()).collect(),
            })
    }
}

/// Damped spring parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 400.0,
            damping: 25.0,
            mass: 0.3,
        }
    }
}

impl SpringConfig {
    fn validate(&self, field: &str) -> Result<()> {
        AtelierError::check_range(&format!("{field}.stiffness"), self.stiffness as f64, 0.001, 1e6)?;
        AtelierError::check_range(&format!("{field}.damping"), self.damping as f64, 0.0, 1e6)?;
        AtelierError::check_range(&format!("{field}.mass"), self.mass as f64, 0.001, 1e6)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub size: f32,
    pub ring_size: f32,
    /// `#rrggbb`
    pub color: String,
    pub accent_color: String,
    pub opacity: f32,
    pub hover_scale: f32,
    pub click_scale: f32,
    pub theme: Theme,
    pub particle_count: usize,
    pub magnetic_strength: f32,
    /// Pointer moves closer together than this are dropped, in ms
    pub throttle_ms: f64,
    pub min_stroke_distance: f32,
    pub stroke_max_age_ms: f64,
    pub stroke_prune_interval_ms: f64,
    pub follower: SpringConfig,
    pub scale_spring: SpringConfig,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            size: 28.0,
            ring_size: 24.0,
            color: "#3b82f6".to_string(),
            accent_color: "#8b5cf6".to_string(),
            opacity: 0.65,
            hover_scale: 2.8,
            click_scale: 0.6,
            theme: Theme::Watercolor,
            particle_count: 16,
            magnetic_strength: 0.4,
            throttle_ms: 10.0,
            min_stroke_distance: 3.0,
            stroke_max_age_ms: 30_000.0,
            stroke_prune_interval_ms: 5_000.0,
            follower: SpringConfig::default(),
            scale_spring: SpringConfig {
                stiffness: 400.0,
                damping: 15.0,
                mass: 1.0,
            },
        }
    }
}

impl CursorConfig {
    /// Primary colour
    pub fn primary(&self) -> Result<Color> {
        parse_color("cursor.color", &self.color)
    }

    pub fn accent(&self) -> Result<Color> {
        parse_color("cursor.accent_color", &self.accent_color)
    }

    /// Most points the trail keeps
    pub fn trail_capacity(&self) -> usize {
        self.particle_count * 2
    }

    pub fn validate(&self) -> Result<()> {
        self.primary()?;
        self.accent()?;
        AtelierError::check_range("cursor.size", self.size as f64, 0.0, 512.0)?;
        AtelierError::check_range("cursor.ring_size", self.ring_size as f64, 0.0, 512.0)?;
        AtelierError::check_range("cursor.opacity", self.opacity as f64, 0.0, 1.0)?;
        AtelierError::check_range("cursor.hover_scale", self.hover_scale as f64, 0.0, 16.0)?;
        AtelierError::check_range("cursor.click_scale", self.click_scale as f64, 0.0, 16.0)?;
        AtelierError::check_range("cursor.particle_count", self.particle_count as f64, 0.0, 1024.0)?;
        AtelierError::check_range(
            "cursor.magnetic_strength",
            self.magnetic_strength as f64,
            0.0,
            1.0,
        )?;
        AtelierError::check_range("cursor.throttle_ms", self.throttle_ms, 0.0, 1000.0)?;
        AtelierError::check_range(
            "cursor.min_stroke_distance",
            self.min_stroke_distance as f64,
            0.0,
            1000.0,
        )?;
        AtelierError::check_range("cursor.stroke_max_age_ms", self.stroke_max_age_ms, 1.0, f64::MAX)?;
        AtelierError::check_range(
            "cursor.stroke_prune_interval_ms",
            self.stroke_prune_interval_ms,
            1.0,
            f64::MAX,
        )?;
        self.follower.validate("cursor.follower")?;
        self.scale_spring.validate("cursor.scale_spring")
    }
}

fn parse_color(field: &str, value: &str) -> Result<Color> {
    Color::parse_hex(value)
        .ok_or_else(|| AtelierError::Config(format!("{field}: '{value}' is not a #rrggbb colour")))
}
