//! Render error types

use atelier_core::AtelierError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to get adapter")]
    AdapterNotFound,
    #[error("Failed to create device: {0}")]
    DeviceCreation(String),
    #[error("Failed to write image: {0}")]
    ImageWrite(String),
}

impl From<RenderError> for AtelierError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::AdapterNotFound | RenderError::DeviceCreation(_) => {
                AtelierError::CapabilityUnavailable(err.to_string())
            }
            RenderError::ImageWrite(_) => AtelierError::Render(err.to_string()),
        }
    }
}
