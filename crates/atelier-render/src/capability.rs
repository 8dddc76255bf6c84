//! One-shot detection of a usable GPU adapter

use serde::Serialize;

use crate::error::RenderError;

/// What the host can render with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Capability {
    Gpu { name: String, backend: String },
    Unavailable { reason: String },
}

impl Capability {
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Gpu { .. })
    }

    /// A capability that always reports available, for headless runs that
    /// paint in software
    pub fn software() -> Self {
        Capability::Gpu {
            name: "software canvas".to_string(),
            backend: "cpu".to_string(),
        }
    }
}

/// Ask wgpu for an adapter and a device. Never fails: a missing adapter is
/// reported as `Capability::Unavailable`.
pub fn probe_capability() -> Capability {
    let capability = match pollster::block_on(probe_adapter()) {
        Ok((name, backend)) => Capability::Gpu { name, backend },
        Err(err) => Capability::Unavailable {
            reason: err.to_string(),
        },
    };
    match &capability {
        Capability::Gpu { name, backend } => log::info!("GPU adapter: {name} ({backend})"),
        Capability::Unavailable { reason } => log::warn!("no rendering capability: {reason}"),
    }
    capability
}

async fn probe_adapter() -> Result<(String, String), RenderError> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .ok_or(RenderError::AdapterNotFound)?;

    // listed adapters can still fail device creation
    let _device = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Atelier Probe Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .map_err(|e| RenderError::DeviceCreation(e.to_string()))?;

    let info = adapter.get_info();
    Ok((info.name, format!("{:?}", info.backend)))
}
