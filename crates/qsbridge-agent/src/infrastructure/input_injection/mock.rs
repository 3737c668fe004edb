//! Mock input injector for unit and integration testing.
//!
//! # Why a mock injector?
//!
//! The real injector (`WindowsInputInjector`) calls `SendInput`, which:
//!
//! - Requires an interactive desktop session.
//! - Actually presses keys on the test machine.
//! - Cannot be observed from Rust test code.
//!
//! `MockInputInjector` replaces the OS call with in-memory recording.  Every
//! batch handed to [`InputInjector::inject`] is pushed into a
//! `Mutex<Vec<...>>` so test assertions can inspect exactly what was
//! submitted and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let injector = Arc::new(MockInputInjector::new());
//! let automation = SearchAutomation::new(injector.clone(), host, detector, settings);
//!
//! automation.run("zelda").await;
//!
//! assert_eq!(injector.batches().len(), 3);
//! ```
//!
//! # Simulating failures
//!
//! - [`MockInputInjector::rejecting_first`] – the OS accepts nothing for the
//!   first `n` batches (what `SendInput` does when UIPI blocks the caller).
//! - [`MockInputInjector::accepting_at_most`] – every batch is cut short
//!   after `n` events.
//! - [`MockInputInjector::failing`] – every call returns
//!   [`InjectionError::Platform`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use qsbridge_core::InputEvent;

use crate::application::inject_input::{InjectionError, InputInjector};

/// An injector that records batches without touching the OS.
#[derive(Default)]
pub struct MockInputInjector {
    /// Every batch submitted, in order, including rejected ones.
    submitted: Mutex<Vec<Vec<InputEvent>>>,
    /// Batches still to be rejected outright.
    rejections_left: AtomicUsize,
    /// Upper bound on accepted events per batch.
    accept_limit: Option<usize>,
    /// When `true`, every call returns `InjectionError::Platform`.
    should_fail: bool,
}

impl MockInputInjector {
    /// Creates an injector that accepts every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects the first `count` batches (zero events accepted).
    pub fn rejecting_first(self, count: usize) -> Self {
        self.rejections_left.store(count, Ordering::SeqCst);
        self
    }

    /// Accepts at most `limit` events of each batch.
    pub fn accepting_at_most(mut self, limit: usize) -> Self {
        self.accept_limit = Some(limit);
        self
    }

    /// Fails every call with a platform error.
    pub fn failing(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Snapshot of the batches submitted so far.
    pub fn batches(&self) -> Vec<Vec<InputEvent>> {
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// All submitted events flattened into one sequence.
    pub fn events(&self) -> Vec<InputEvent> {
        self.batches().into_iter().flatten().collect()
    }
}

impl InputInjector for MockInputInjector {
    fn inject(&self, events: &[InputEvent]) -> Result<usize, InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("mock failure".into()));
        }

        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(events.to_vec());

        let rejected = self
            .rejections_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Ok(0);
        }

        Ok(self
            .accept_limit
            .map_or(events.len(), |limit| limit.min(events.len())))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: [InputEvent; 2] = [InputEvent::UnicodeDown(0x61), InputEvent::UnicodeUp(0x61)];

    #[test]
    fn test_accepts_everything_by_default() {
        let injector = MockInputInjector::new();

        let accepted = injector.inject(&EVENTS).unwrap();

        assert_eq!(accepted, 2);
        assert_eq!(injector.batches(), vec![EVENTS.to_vec()]);
    }

    #[test]
    fn test_rejecting_first_recovers_after_count() {
        let injector = MockInputInjector::new().rejecting_first(1);

        assert_eq!(injector.inject(&EVENTS).unwrap(), 0);
        assert_eq!(injector.inject(&EVENTS).unwrap(), 2);
        assert_eq!(injector.batches().len(), 2);
    }

    #[test]
    fn test_accepting_at_most_truncates_count() {
        let injector = MockInputInjector::new().accepting_at_most(1);

        assert_eq!(injector.inject(&EVENTS).unwrap(), 1);
    }

    #[test]
    fn test_failing_records_nothing() {
        let injector = MockInputInjector::new().failing();

        assert!(injector.inject(&EVENTS).is_err());
        assert!(injector.batches().is_empty());
    }
}
