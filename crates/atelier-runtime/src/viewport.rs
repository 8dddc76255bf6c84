//! Canvas sizing from CSS size and device pixel ratio

use serde::{Deserialize, Serialize};

/// Highest device pixel ratio the canvas renders at
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// The drawable area in CSS pixels plus its device pixel ratio
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub css_width: f32,
    pub css_height: f32,
    pub device_pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

impl Viewport {
    pub fn new(css_width: f32, css_height: f32, device_pixel_ratio: f32) -> Self {
        let mut viewport = Self {
            css_width: 0.0,
            css_height: 0.0,
            device_pixel_ratio: 1.0,
        };
        viewport.resize(css_width, css_height, device_pixel_ratio);
        viewport
    }

    /// Re-derive the size after a host resize
    pub fn resize(&mut self, css_width: f32, css_height: f32, device_pixel_ratio: f32) {
        self.css_width = css_width.max(1.0);
        self.css_height = css_height.max(1.0);
        self.device_pixel_ratio = if device_pixel_ratio.is_finite() {
            device_pixel_ratio.clamp(1.0, MAX_PIXEL_RATIO)
        } else {
            1.0
        };
    }

    pub fn pixel_width(&self) -> u32 {
        (self.css_width * self.device_pixel_ratio).round().max(1.0) as u32
    }

    pub fn pixel_height(&self) -> u32 {
        (self.css_height * self.device_pixel_ratio).round().max(1.0) as u32
    }

    pub fn aspect(&self) -> f32 {
        self.css_width / self.css_height
    }
}
