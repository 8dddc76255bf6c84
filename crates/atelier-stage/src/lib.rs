//! Atelier Stage - the mountable decorative layer
//!
//! Composes the crystal scene and the cursor behind error boundaries,
//! mounts them on a host and tears them down cleanly.

mod boundary;
mod config;
mod stage;

pub use boundary::SystemBoundary;
pub use config::{RenderConfig, StageConfig};
pub use stage::{PhaseCounts, Stage, StageState, StageSummary};
