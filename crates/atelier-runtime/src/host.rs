//! Host page abstraction: listener and frame-callback registration

use std::collections::BTreeMap;

use crate::event::{EventKind, InputEvent};
use crate::event_bus::EventBus;

/// Handle for a registered event listener
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(pub u64);

/// Handle for a requested frame callback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Side effects the embedding page applies based on the engine's state.
/// The engine reports these and never touches page styling itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PresentationHints {
    /// The custom cursor is drawn, so the page should hide the system cursor
    pub hide_host_cursor: bool,
    /// Something clickable is under the pointer
    pub pointer_cursor: bool,
}

/// The environment that delivers events and animation frames
pub trait Host {
    fn add_listener(&mut self, kind: EventKind) -> ListenerHandle;

    /// Returns false if the handle was not registered
    fn remove_listener(&mut self, handle: ListenerHandle) -> bool;

    fn request_frame(&mut self) -> FrameHandle;

    /// Returns false if the frame was already granted or cancelled
    fn cancel_frame(&mut self, handle: FrameHandle) -> bool;

    fn active_listeners(&self) -> usize;

    fn pending_frames(&self) -> usize;
}

/// In-memory host for tests, the CLI and scripted runs
#[derive(Default)]
pub struct HeadlessHost {
    listeners: BTreeMap<ListenerHandle, EventKind>,
    frames: Vec<FrameHandle>,
    queue: EventBus,
    next_id: u64,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Whether any listener is registered for `kind`
    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    /// Queue an event. Events nobody listens for are dropped, as a page
    /// would drop them.
    pub fn emit(&mut self, event: InputEvent) -> bool {
        if self.is_listening(event.kind()) {
            self.queue.push(event);
            true
        } else {
            false
        }
    }

    /// Take every queued event
    pub fn drain_events(&mut self) -> Vec<InputEvent> {
        self.queue.drain()
    }

    /// Grant the oldest pending frame callback
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        }
    }
}

impl Host for HeadlessHost {
    fn add_listener(&mut self, kind: EventKind) -> ListenerHandle {
        let handle = ListenerHandle(self.next_id());
        self.listeners.insert(handle, kind);
        handle
    }

    /// Events already queued for a kind nobody listens to any more are
    /// never delivered.
    fn remove_listener(&mut self, handle: ListenerHandle) -> bool {
        let Some(kind) = self.listeners.remove(&handle) else {
            return false;
        };
        if !self.is_listening(kind) {
            let dropped = self.queue.discard_kind(kind);
            if dropped > 0 {
                log::debug!("dropped {dropped} queued {kind:?} events");
            }
        }
        true
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        let before = self.frames.len();
        self.frames.retain(|f| *f != handle);
        self.frames.len() != before
    }

    fn active_listeners(&self) -> usize {
        self.listeners.len()
    }

    fn pending_frames(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_requires_listener() {
        let mut host = HeadlessHost::new();
        assert!(!host.emit(InputEvent::Scroll));

        let handle = host.add_listener(EventKind::Scroll);
        assert!(host.emit(InputEvent::Scroll));
        assert_eq!(host.drain_events().len(), 1);

        assert!(host.remove_listener(handle));
        assert!(!host.remove_listener(handle));
        assert!(!host.emit(InputEvent::Scroll));
        assert_eq!(host.active_listeners(), 0);
    }

    #[test]
    fn test_removed_listener_drops_queued_events() {
        let mut host = HeadlessHost::new();
        let scroll_a = host.add_listener(EventKind::Scroll);
        let scroll_b = host.add_listener(EventKind::Scroll);
        host.add_listener(EventKind::Click);
        assert!(host.emit(InputEvent::Scroll));
        assert!(host.emit(InputEvent::click(1.0, 1.0, 0.0)));

        host.remove_listener(scroll_a);
        assert_eq!(host.queue.count(EventKind::Scroll), 1);
        host.remove_listener(scroll_b);

        let events = host.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), EventKind::Click);
    }

    #[test]
    fn test_frame_lifecycle() {
        let mut host = HeadlessHost::new();
        let a = host.request_frame();
        let b = host.request_frame();
        assert_ne!(a, b);
        assert_eq!(host.pending_frames(), 2);

        assert_eq!(host.take_frame(), Some(a));
        assert!(!host.cancel_frame(a));
        assert!(host.cancel_frame(b));
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.take_frame(), None);
    }
}
