//! FIFO queue of input events waiting for the next frame

use std::collections::VecDeque;

use crate::event::{EventKind, InputEvent};

/// Events the host has accepted but the stage has not consumed yet.
/// Delivery order is arrival order.
#[derive(Debug, Default)]
pub struct EventBus {
    events: VecDeque<InputEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<InputEvent> {
        self.events.drain(..).collect()
    }

    /// Drop queued events of `kind`. Returns how many were dropped.
    pub fn discard_kind(&mut self, kind: EventKind) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.kind() != kind);
        before - self.events.len()
    }

    /// Queued events of `kind`
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_arrival_order() {
        let mut bus = EventBus::new();
        bus.push(InputEvent::pointer_move(1.0, 1.0, 0.0));
        bus.push(InputEvent::Scroll);
        bus.push(InputEvent::click(4.0, 4.0, 16.0));

        let kinds: Vec<EventKind> = bus.drain().iter().map(InputEvent::kind).collect();
        assert_eq!(kinds, vec![EventKind::PointerMove, EventKind::Scroll, EventKind::Click]);
        assert!(bus.is_empty());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn discarding_one_kind_keeps_the_rest_in_order() {
        let mut bus = EventBus::new();
        bus.push(InputEvent::Scroll);
        bus.push(InputEvent::pointer_move(2.0, 3.0, 0.0));
        bus.push(InputEvent::Scroll);
        bus.push(InputEvent::PointerLeave);
        assert_eq!(bus.count(EventKind::Scroll), 2);

        assert_eq!(bus.discard_kind(EventKind::Scroll), 2);
        assert_eq!(bus.discard_kind(EventKind::Scroll), 0);
        assert_eq!(bus.len(), 2);
        let kinds: Vec<EventKind> = bus.drain().iter().map(InputEvent::kind).collect();
        assert_eq!(kinds, vec![EventKind::PointerMove, EventKind::PointerLeave]);
    }
}
