//! Pointer state tracking

use std::collections::HashSet;

use atelier_core::Vec2;

use crate::event::InputEvent;

/// Tracks pointer position, buttons and per-frame movement
pub struct PointerState {
    /// Current pointer position in CSS pixels
    pub position: Vec2,
    /// Whether the pointer is inside the page
    pub inside: bool,
    /// Movement accumulated this frame
    delta: Vec2,
    /// Buttons currently held
    buttons_down: HashSet<u8>,
    /// Buttons pressed this frame
    buttons_just_pressed: HashSet<u8>,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerState {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            inside: true,
            delta: Vec2::ZERO,
            buttons_down: HashSet::new(),
            buttons_just_pressed: HashSet::new(),
        }
    }

    /// Fold an input event into the state
    pub fn process(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerMove { x, y, .. } => {
                let next = Vec2::new(x, y);
                self.delta = self.delta + (next - self.position);
                self.position = next;
            }
            InputEvent::PointerDown { x, y, button, .. } => {
                self.position = Vec2::new(x, y);
                if self.buttons_down.insert(button) {
                    self.buttons_just_pressed.insert(button);
                }
            }
            InputEvent::PointerUp { x, y, button, .. } => {
                self.position = Vec2::new(x, y);
                self.buttons_down.remove(&button);
            }
            InputEvent::PointerLeave => self.inside = false,
            InputEvent::PointerEnter => self.inside = true,
            _ => {}
        }
    }

    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    pub fn is_down(&self, button: u8) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn any_down(&self) -> bool {
        !self.buttons_down.is_empty()
    }

    pub fn just_pressed(&self, button: u8) -> bool {
        self.buttons_just_pressed.contains(&button)
    }

    /// Clear per-frame state. Call at the end of every frame.
    pub fn end_frame(&mut self) {
        self.delta = Vec2::ZERO;
        self.buttons_just_pressed.clear();
    }
}
