//! Error types for Atelier

use thiserror::Error;

/// The main error type for Atelier operations
#[derive(Debug, Error)]
pub enum AtelierError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Rendering capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Invalid enum value: {value} is not one of {allowed:?}")]
    InvalidEnumValue {
        value: String,
        allowed: Vec<String>,
    },

    #[error("System '{system}' failed: {reason}")]
    SystemFailed { system: String, reason: String },
}

/// Result type alias for Atelier operations
pub type Result<T> = std::result::Result<T, AtelierError>;

impl From<toml::de::Error> for AtelierError {
    fn from(err: toml::de::Error) -> Self {
        AtelierError::TomlParse(err.to_string())
    }
}

impl AtelierError {
    /// Check that `value` lies in `[min, max]`, naming the offending field otherwise
    pub fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(AtelierError::ValueOutOfRange {
                field: field.to_string(),
                min,
                max,
                value,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check_accepts_bounds() {
        assert!(AtelierError::check_range("x", 0.0, 0.0, 1.0).is_ok());
        assert!(AtelierError::check_range("x", 1.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn range_check_rejects_nan_and_outside() {
        assert!(AtelierError::check_range("x", f64::NAN, 0.0, 1.0).is_err());
        let err = AtelierError::check_range("respawn_delay", -1.0, 0.0, 60.0).unwrap_err();
        assert!(err.to_string().contains("respawn_delay"));
    }
}
