//! Input events delivered by the host

use crate::target::TargetInfo;
use serde::{Deserialize, Serialize};

/// Keys the decorative layer reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
}

/// An input event from the host page. Coordinates are CSS pixels and
/// timestamps are milliseconds of simulation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerMove {
        x: f32,
        y: f32,
        movement_x: f32,
        movement_y: f32,
        time_ms: f64,
    },
    PointerDown {
        x: f32,
        y: f32,
        button: u8,
        time_ms: f64,
    },
    PointerUp {
        x: f32,
        y: f32,
        button: u8,
        time_ms: f64,
    },
    Click {
        x: f32,
        y: f32,
        time_ms: f64,
    },
    PointerOver {
        target: TargetInfo,
    },
    PointerLeave,
    PointerEnter,
    Scroll,
    Resize {
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
    },
    Key {
        key: Key,
    },
}

/// Listener category an event is delivered to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    PointerMove,
    PointerDown,
    PointerUp,
    Click,
    PointerOver,
    PointerLeave,
    PointerEnter,
    Scroll,
    Resize,
    Key,
}

impl EventKind {
    pub const ALL: [EventKind; 10] = [
        EventKind::PointerMove,
        EventKind::PointerDown,
        EventKind::PointerUp,
        EventKind::Click,
        EventKind::PointerOver,
        EventKind::PointerLeave,
        EventKind::PointerEnter,
        EventKind::Scroll,
        EventKind::Resize,
        EventKind::Key,
    ];
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::PointerMove { .. } => EventKind::PointerMove,
            InputEvent::PointerDown { .. } => EventKind::PointerDown,
            InputEvent::PointerUp { .. } => EventKind::PointerUp,
            InputEvent::Click { .. } => EventKind::Click,
            InputEvent::PointerOver { .. } => EventKind::PointerOver,
            InputEvent::PointerLeave => EventKind::PointerLeave,
            InputEvent::PointerEnter => EventKind::PointerEnter,
            InputEvent::Scroll => EventKind::Scroll,
            InputEvent::Resize { .. } => EventKind::Resize,
            InputEvent::Key { .. } => EventKind::Key,
        }
    }

    /// Pointer position carried by the event, if any
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            InputEvent::PointerMove { x, y, .. }
            | InputEvent::PointerDown { x, y, .. }
            | InputEvent::PointerUp { x, y, .. }
            | InputEvent::Click { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }

    /// Pointer move with no reported movement
    pub fn pointer_move(x: f32, y: f32, time_ms: f64) -> Self {
        InputEvent::PointerMove {
            x,
            y,
            movement_x: 0.0,
            movement_y: 0.0,
            time_ms,
        }
    }

    pub fn click(x: f32, y: f32, time_ms: f64) -> Self {
        InputEvent::Click { x, y, time_ms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(InputEvent::Scroll.kind(), EventKind::Scroll);
        assert_eq!(InputEvent::click(1.0, 2.0, 0.0).kind(), EventKind::Click);
        assert_eq!(InputEvent::Key { key: Key::Escape }.kind(), EventKind::Key);
    }

    #[test]
    fn test_position() {
        assert_eq!(
            InputEvent::pointer_move(3.0, 4.0, 10.0).position(),
            Some((3.0, 4.0))
        );
        assert_eq!(InputEvent::PointerLeave.position(), None);
    }

    #[test]
    fn test_all_kinds_distinct() {
        let mut kinds = EventKind::ALL.to_vec();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), EventKind::ALL.len());
    }
}
