//! Stage configuration file

use std::path::Path;

use atelier_core::{AtelierError, Result};
use atelier_cursor::CursorConfig;
use atelier_particles::{AmbientConfig, BubbleConfig, CrystalConfig, SceneConfig};
use atelier_render::Fog;
use atelier_runtime::Viewport;
use serde::{Deserialize, Serialize};

/// Output surface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// CSS width of the drawable area
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
    pub fog: Fog,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: 1.0,
            fog: Fog::default(),
        }
    }
}

impl RenderConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height, self.device_pixel_ratio)
    }

    fn validate(&self) -> Result<()> {
        AtelierError::check_range("render.width", self.width as f64, 1.0, 16384.0)?;
        AtelierError::check_range("render.height", self.height as f64, 1.0, 16384.0)?;
        AtelierError::check_range("render.device_pixel_ratio", self.device_pixel_ratio as f64, 0.25, 8.0)?;
        AtelierError::check_range("render.fog.near", self.fog.near as f64, 0.0, self.fog.far as f64)
    }
}

/// Root configuration. Every section is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub seed: u32,
    /// Fully suspends the decorative layer
    pub disabled: bool,
    pub crystals: CrystalConfig,
    pub bubbles: BubbleConfig,
    pub ambient: AmbientConfig,
    pub cursor: CursorConfig,
    pub render: RenderConfig,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            seed: 20_240_601,
            disabled: false,
            crystals: CrystalConfig::default(),
            bubbles: BubbleConfig::default(),
            ambient: AmbientConfig::default(),
            cursor: CursorConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl StageConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            AtelierError::TomlParse(msg) => {
                AtelierError::TomlParse(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        log::info!("Loaded stage config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StageConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.scene().validate()?;
        self.cursor.validate()?;
        self.render.validate()
    }

    pub fn scene(&self) -> SceneConfig {
        SceneConfig {
            crystals: self.crystals.clone(),
            bubbles: self.bubbles.clone(),
            ambient: self.ambient.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_cursor::Theme;

    #[test]
    fn empty_file_is_default() {
        let config = StageConfig::from_toml_str("").unwrap();
        assert_eq!(config, StageConfig::default());
    }

    #[test]
    fn partial_sections_override() {
        let config = StageConfig::from_toml_str(
            r#"
seed = 7
disabled = true

[crystals]
respawn_delay = 3.0

[cursor]
theme = "aurora"
particle_count = 8

[render]
width = 640.0
height = 360.0
"#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert!(config.disabled);
        assert_eq!(config.crystals.respawn_delay, 3.0);
        assert_eq!(config.crystals.count, CrystalConfig::default().count);
        assert_eq!(config.cursor.theme, Theme::Aurora);
        assert_eq!(config.cursor.trail_capacity(), 16);
        assert_eq!(config.render.viewport().pixel_width(), 640);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let err = StageConfig::from_toml_str("[cursor]\ntheme = \"neon\"").unwrap_err();
        assert!(matches!(err, AtelierError::TomlParse(_)));
    }

    #[test]
    fn nonsense_values_are_rejected() {
        let err = StageConfig::from_toml_str("[render]\nwidth = -5.0").unwrap_err();
        assert!(matches!(err, AtelierError::ValueOutOfRange { .. }));

        let err = StageConfig::from_toml_str("[crystals]\ntransform_duration = 0.0").unwrap_err();
        assert!(matches!(err, AtelierError::ValueOutOfRange { .. }));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("atelier_stage_{}.toml", std::process::id()));
        std::fs::write(&path, "seed = 99\n").unwrap();
        let config = StageConfig::load(&path).unwrap();
        assert_eq!(config.seed, 99);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            StageConfig::load(Path::new("/nonexistent/atelier.toml")),
            Err(AtelierError::Io(_))
        ));
    }
}
