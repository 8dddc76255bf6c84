//! Atelier Runtime - Frame loop infrastructure
//!
//! Provides the building blocks every decorative system is ticked by:
//! - `FrameClock` - deterministic fixed-step clock (16 ms per frame)
//! - `InputEvent` / `EventBus` - host input events and their queue
//! - `PointerState` - pointer position and button tracking
//! - `TargetInfo` - the element under the pointer, for hit testing
//! - `Host` / `HeadlessHost` - listener and frame-callback registration
//! - `RuntimeSystem` - trait for systems ticked by the frame loop

mod clock;
mod event;
mod event_bus;
mod host;
mod pointer;
mod system;
mod target;
mod viewport;

pub use clock::{FrameClock, FIXED_STEP};
pub use event::{EventKind, InputEvent, Key};
pub use event_bus::EventBus;
pub use host::{FrameHandle, HeadlessHost, Host, ListenerHandle, PresentationHints};
pub use pointer::PointerState;
pub use system::{FrameInfo, RuntimeSystem};
pub use target::TargetInfo;
pub use viewport::Viewport;
