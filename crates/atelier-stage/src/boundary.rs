//! Error boundary around a runtime system
//!
//! The first `Err` or panic from the wrapped system trips the boundary.
//! The failure is logged once and every later call is skipped. There are
//! no retries.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use atelier_core::{AtelierError, Result};
use atelier_runtime::{FrameInfo, InputEvent, RuntimeSystem};

pub struct SystemBoundary<S> {
    inner: S,
    failure: Option<AtelierError>,
}

impl<S: RuntimeSystem> SystemBoundary<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failure: None,
        }
    }

    pub fn get(&self) -> &S {
        &self.inner
    }

    /// Direct access for configuration changes. Calls made through this
    /// reference bypass the boundary.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn is_tripped(&self) -> bool {
        self.failure.is_some()
    }

    pub fn failure(&self) -> Option<&AtelierError> {
        self.failure.as_ref()
    }

    /// The wrapped system, unless the boundary has tripped
    pub fn healthy(&self) -> Option<&S> {
        if self.is_tripped() {
            None
        } else {
            Some(&self.inner)
        }
    }

    pub fn initialize(&mut self, frame: &FrameInfo) -> bool {
        self.guard("initialize", |s| s.initialize(frame))
    }

    pub fn handle_event(&mut self, event: &InputEvent, frame: &FrameInfo) -> bool {
        self.guard("handle_event", |s| s.handle_event(event, frame))
    }

    pub fn update(&mut self, frame: &FrameInfo) -> bool {
        self.guard("update", |s| s.update(frame))
    }

    /// Shut the system down and free what it holds. Runs even when the
    /// boundary has tripped, since a failed system can still own geometry.
    pub fn release(&mut self) -> bool {
        let inner = &mut self.inner;
        match catch_unwind(AssertUnwindSafe(|| inner.shutdown())) {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                self.record("shutdown", err.to_string());
                false
            }
            Err(payload) => {
                self.record("shutdown", format!("panicked: {}", panic_message(payload.as_ref())));
                false
            }
        }
    }

    /// Run `f` unless tripped. Returns whether it ran and succeeded.
    fn guard<F>(&mut self, op: &str, f: F) -> bool
    where
        F: FnOnce(&mut S) -> Result<()>,
    {
        if self.failure.is_some() {
            return false;
        }
        let inner = &mut self.inner;
        let outcome = catch_unwind(AssertUnwindSafe(|| f(inner)));
        let reason = match outcome {
            Ok(Ok(())) => return true,
            Ok(Err(err)) => err.to_string(),
            Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        };
        self.record(op, reason);
        false
    }

    /// Keep the first failure. Later ones are logged only.
    fn record(&mut self, op: &str, reason: String) {
        let system = self.inner.name().to_string();
        if self.failure.is_some() {
            log::warn!("System '{system}' also failed during {op}: {reason}");
            return;
        }
        log::error!("System '{system}' failed during {op}: {reason}. It stays off.");
        self.failure = Some(AtelierError::SystemFailed { system, reason });
    }

    #[cfg(test)]
    pub(crate) fn trip(&mut self, reason: &str) {
        self.record("test", reason.to_string());
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_runtime::Viewport;

    #[derive(Default)]
    struct Flaky {
        updates: u32,
        fail_at: Option<u32>,
        panic_at: Option<u32>,
        shutdowns: u32,
    }

    impl RuntimeSystem for Flaky {
        fn initialize(&mut self, _frame: &FrameInfo) -> Result<()> {
            Ok(())
        }

        fn handle_event(&mut self, _event: &InputEvent, _frame: &FrameInfo) -> Result<()> {
            Ok(())
        }

        fn update(&mut self, _frame: &FrameInfo) -> Result<()> {
            self.updates += 1;
            if self.fail_at == Some(self.updates) {
                return Err(AtelierError::Runtime("bad frame".into()));
            }
            if self.panic_at == Some(self.updates) {
                panic!("index out of bounds");
            }
            Ok(())
        }

        fn shutdown(&mut self) -> Result<()> {
            self.shutdowns += 1;
            Ok(())
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn info() -> FrameInfo {
        FrameInfo::new(0.0, 0.016, 0, Viewport::default())
    }

    #[test]
    fn error_trips_and_stops_calls() {
        let mut boundary = SystemBoundary::new(Flaky {
            fail_at: Some(3),
            ..Default::default()
        });
        for _ in 0..10 {
            boundary.update(&info());
        }
        assert!(boundary.is_tripped());
        assert_eq!(boundary.get().updates, 3);
        assert!(boundary.healthy().is_none());
        match boundary.failure() {
            Some(AtelierError::SystemFailed { system, reason }) => {
                assert_eq!(system, "flaky");
                assert!(reason.contains("bad frame"));
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn panic_is_contained() {
        let mut boundary = SystemBoundary::new(Flaky {
            panic_at: Some(2),
            ..Default::default()
        });
        assert!(boundary.update(&info()));
        assert!(!boundary.update(&info()));
        assert!(!boundary.update(&info()));
        assert_eq!(boundary.get().updates, 2);
        let reason = boundary.failure().map(|e| e.to_string()).unwrap_or_default();
        assert!(reason.contains("index out of bounds"));
    }

    #[test]
    fn healthy_system_passes_through() {
        let mut boundary = SystemBoundary::new(Flaky::default());
        assert!(boundary.initialize(&info()));
        assert!(boundary.handle_event(&InputEvent::Scroll, &info()));
        assert!(boundary.update(&info()));
        assert!(boundary.healthy().is_some());
    }

    #[test]
    fn release_runs_after_trip_and_keeps_first_failure() {
        let mut boundary = SystemBoundary::new(Flaky {
            fail_at: Some(1),
            ..Default::default()
        });
        assert!(!boundary.update(&info()));
        assert!(boundary.release());
        assert_eq!(boundary.get().shutdowns, 1);
        let reason = boundary.failure().map(|e| e.to_string()).unwrap_or_default();
        assert!(reason.contains("bad frame"));
    }
}
