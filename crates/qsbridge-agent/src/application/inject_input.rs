//! Input injection capability and batch submission.
//!
//! This use case sits at the application layer and delegates to an
//! [`InputInjector`] trait object for OS-level event injection.
//! The platform-specific implementations are in the infrastructure layer.

use qsbridge_core::{InputBatch, InputEvent};
use thiserror::Error;
use tracing::trace;

/// Error type for input injection.
#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("platform error: {0}")]
    Platform(String),
    /// The facility took only part of the batch.  Events already posted are
    /// not retracted.
    #[error("input facility accepted {accepted} of {submitted} events")]
    Partial { accepted: usize, submitted: usize },
}

/// The OS input-injection facility.
///
/// Implementations hand the whole ordered event list to the OS in one call
/// and report how many events it accepted.
pub trait InputInjector: Send + Sync {
    /// Submits `events` atomically and returns the accepted count.
    fn inject(&self, events: &[InputEvent]) -> Result<usize, InjectionError>;
}

/// Submits `batch` through `injector`.
///
/// Success means every event was accepted.  An empty batch is a no-op and
/// never reaches the injector.
///
/// # Errors
///
/// Returns [`InjectionError::Partial`] when the facility accepted fewer events
/// than submitted, or the injector's own error.
pub fn submit_batch(injector: &dyn InputInjector, batch: &InputBatch) -> Result<(), InjectionError> {
    if batch.is_empty() {
        return Ok(());
    }

    let submitted = batch.len();
    let accepted = injector.inject(batch.events())?;
    trace!(submitted, accepted, "input batch submitted");
    if accepted != submitted {
        return Err(InjectionError::Partial {
            accepted,
            submitted,
        });
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use qsbridge_core::{build_select_all_batch, build_type_text_batch};
    use std::sync::Mutex;

    // ── Recording injector ────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingInjector {
        calls: Mutex<Vec<Vec<InputEvent>>>,
        accept_limit: Option<usize>,
        should_fail: bool,
    }

    impl InputInjector for RecordingInjector {
        fn inject(&self, events: &[InputEvent]) -> Result<usize, InjectionError> {
            if self.should_fail {
                return Err(InjectionError::Platform("injected failure".to_string()));
            }
            self.calls.lock().unwrap().push(events.to_vec());
            Ok(self.accept_limit.map_or(events.len(), |n| n.min(events.len())))
        }
    }

    #[test]
    fn test_submit_hands_whole_batch_in_one_call() {
        // Arrange
        let injector = RecordingInjector::default();
        let batch = build_select_all_batch();

        // Act
        submit_batch(&injector, &batch).unwrap();

        // Assert
        let calls = injector.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], batch.events());
    }

    #[test]
    fn test_submit_empty_batch_skips_injector() {
        let injector = RecordingInjector::default();

        submit_batch(&injector, &build_type_text_batch("")).unwrap();

        assert!(injector.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_submit_partial_acceptance_is_failure() {
        // Arrange
        let injector = RecordingInjector {
            accept_limit: Some(2),
            ..Default::default()
        };

        // Act
        let result = submit_batch(&injector, &build_select_all_batch());

        // Assert
        assert!(matches!(
            result,
            Err(InjectionError::Partial {
                accepted: 2,
                submitted: 4
            })
        ));
    }

    #[test]
    fn test_submit_propagates_platform_error() {
        let injector = RecordingInjector {
            should_fail: true,
            ..Default::default()
        };

        let result = submit_batch(&injector, &build_select_all_batch());

        assert!(matches!(result, Err(InjectionError::Platform(_))));
    }
}
