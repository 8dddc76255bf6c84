//! Runtime system trait

use atelier_core::Result;

use crate::event::InputEvent;
use crate::viewport::Viewport;

/// Per-frame timing handed to systems
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInfo {
    /// Elapsed simulation time in seconds
    pub time: f64,
    /// Step for this frame in seconds
    pub dt: f32,
    /// Frame counter
    pub frame: u64,
    pub viewport: Viewport,
}

impl FrameInfo {
    pub fn new(time: f64, dt: f32, frame: u64, viewport: Viewport) -> Self {
        Self {
            time,
            dt,
            frame,
            viewport,
        }
    }

    /// Elapsed time in milliseconds
    pub fn time_ms(&self) -> f64 {
        self.time * 1000.0
    }
}

/// A system that can be ticked by the frame loop
///
/// Events are dispatched before `update` within a frame, in arrival order.
pub trait RuntimeSystem {
    /// Called once when the system is mounted
    fn initialize(&mut self, frame: &FrameInfo) -> Result<()>;

    /// Called for every input event the host delivers
    fn handle_event(&mut self, event: &InputEvent, frame: &FrameInfo) -> Result<()>;

    /// Called once per frame
    fn update(&mut self, frame: &FrameInfo) -> Result<()>;

    /// Called when the system is being torn down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
