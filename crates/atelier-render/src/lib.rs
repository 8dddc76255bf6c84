//! Atelier Render - capability probe and software painter
//!
//! Rendering is split in two. A wgpu adapter probe decides whether the
//! scene can run at all; frames themselves are painted by a small
//! software rasteriser so they can be inspected headless and saved as PNG.

mod canvas;
mod capability;
mod error;
mod fallback;
mod lighting;
mod painter;
mod surface;

pub use canvas::Canvas;
pub use capability::{probe_capability, Capability};
pub use error::RenderError;
pub use fallback::FallbackPanel;
pub use lighting::{Light, LightKind, LightingRig};
pub use painter::{Fog, FrameInput, Painter};
pub use surface::{BlendMode, RecordingSurface, Surface};
