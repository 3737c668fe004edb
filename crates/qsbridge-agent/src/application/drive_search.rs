//! SearchAutomation: opens the search overlay and types a query into it.
//!
//! # State machine
//!
//! ```text
//! Idle → TryGlobal → (delay) → [FocusHost → TryLocal → (delay)]
//!      → ClearField → TypeQuery → [Commit] → Idle
//! ```
//!
//! - **TryGlobal** – if global-preference is enabled and a global gesture is
//!   known, press it.  The settle delay follows whether or not the OS accepted
//!   the batch: there is no way to observe whether the overlay opened.
//! - **FocusHost / TryLocal** – only when the global attempt was not made or
//!   not accepted.  The host window is brought to the front and the detected
//!   in-app gesture (or the configured fallback) is pressed.
//! - **ClearField** – Ctrl+A, always.  Selecting an empty field is harmless.
//! - **TypeQuery** – the query as Unicode events, when non-empty.
//! - **Commit** – a single Enter press, when configured.
//!
//! No step retries.  A failed step is logged and the machine moves on: a
//! failed hotkey must not prevent typing the requested text.
//!
//! # Serialisation
//!
//! A run holds `gate` for its whole duration, so two triggers arriving
//! together never interleave their key presses.

use std::sync::Arc;
use std::time::Duration;

use qsbridge_core::gesture::keymap::VK_RETURN;
use qsbridge_core::gesture::warn_if_os_modifier;
use qsbridge_core::{
    build_hotkey_batch, build_key_press_batch, build_select_all_batch, build_type_text_batch,
    DetectedHotkeys, Gesture, InputBatch,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::detect_hotkeys::HotkeyDetector;
use super::inject_input::{submit_batch, InputInjector};

// ── Host window collaborator ──────────────────────────────────────────────────

/// Error type for host window activation.
#[derive(Debug, Error)]
pub enum HostWindowError {
    #[error("host window not found: {0}")]
    NotFound(String),
    #[error("platform error: {0}")]
    Platform(String),
}

/// Brings the application hosting the overlay to the foreground.
#[cfg_attr(test, mockall::automock)]
pub trait HostWindow: Send + Sync {
    fn bring_to_foreground(&self) -> Result<(), HostWindowError>;
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// Behaviour switches for one orchestrator instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationSettings {
    /// Run the detection pipeline when the cache is empty.
    pub auto_detect_hotkey: bool,
    /// Try the global gesture before falling back to the in-app one.
    pub prefer_global_hotkey: bool,
    /// Used when no in-app gesture was detected.
    pub fallback_in_app_gesture: Gesture,
    /// Wait after each activation attempt.
    pub settle_delay: Duration,
    /// Commit the query with Enter.
    pub press_enter: bool,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            auto_detect_hotkey: true,
            prefer_global_hotkey: true,
            fallback_in_app_gesture: qsbridge_core::parse_gesture("Ctrl+F"),
            settle_delay: Duration::from_millis(150),
            press_enter: false,
        }
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// One step of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutomationStep {
    TryGlobal,
    FocusHost,
    TryLocal,
    ClearField,
    TypeQuery,
    Commit,
}

/// What happened in a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Submitted,
    Skipped,
    Failed(String),
}

/// Ordered record of the steps a run went through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomationReport {
    pub steps: Vec<(AutomationStep, StepOutcome)>,
}

impl AutomationReport {
    fn record(&mut self, step: AutomationStep, outcome: StepOutcome) {
        if let StepOutcome::Failed(reason) = &outcome {
            warn!(?step, "automation step failed: {reason}");
        } else {
            debug!(?step, ?outcome, "automation step finished");
        }
        self.steps.push((step, outcome));
    }

    /// Outcome of `step`, or `None` when the run never reached it.
    pub fn outcome(&self, step: AutomationStep) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, outcome)| outcome)
    }

    /// Steps in execution order.
    pub fn executed_steps(&self) -> Vec<AutomationStep> {
        self.steps.iter().map(|(step, _)| *step).collect()
    }

    /// Returns `true` if any step failed.
    pub fn has_failures(&self) -> bool {
        self.steps
            .iter()
            .any(|(_, outcome)| matches!(outcome, StepOutcome::Failed(_)))
    }
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Drives the search overlay through synthesized keyboard input.
pub struct SearchAutomation {
    injector: Arc<dyn InputInjector>,
    host: Arc<dyn HostWindow>,
    detector: Arc<HotkeyDetector>,
    settings: AutomationSettings,
    gate: Mutex<()>,
}

impl SearchAutomation {
    pub fn new(
        injector: Arc<dyn InputInjector>,
        host: Arc<dyn HostWindow>,
        detector: Arc<HotkeyDetector>,
        settings: AutomationSettings,
    ) -> Self {
        Self {
            injector,
            host,
            detector,
            settings,
            gate: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &AutomationSettings {
        &self.settings
    }

    /// Runs the state machine once for `query`.
    ///
    /// Never fails; the returned report says what each step did.
    pub async fn run(&self, query: &str) -> AutomationReport {
        let _guard = self.gate.lock().await;
        info!(query_len = query.chars().count(), "driving search overlay");

        let detected = if self.settings.auto_detect_hotkey {
            self.detector.ensure_detected().await
        } else {
            DetectedHotkeys::default()
        };

        let mut report = AutomationReport::default();

        let global_accepted = self.try_global(&detected, &mut report).await;
        if !global_accepted {
            self.focus_host(&mut report);
            self.try_local(&detected, &mut report).await;
        }

        let clear = self.submit(&build_select_all_batch());
        report.record(AutomationStep::ClearField, clear);

        let typed = if query.is_empty() {
            StepOutcome::Skipped
        } else {
            self.submit(&build_type_text_batch(query))
        };
        report.record(AutomationStep::TypeQuery, typed);

        if self.settings.press_enter {
            let commit = self.submit(&build_key_press_batch(VK_RETURN));
            report.record(AutomationStep::Commit, commit);
        }

        report
    }

    /// Returns `true` when the global gesture was accepted by the OS.
    async fn try_global(&self, detected: &DetectedHotkeys, report: &mut AutomationReport) -> bool {
        let global = detected.global.filter(|g| !g.is_empty());
        let Some(gesture) = global.filter(|_| self.settings.prefer_global_hotkey) else {
            report.record(AutomationStep::TryGlobal, StepOutcome::Skipped);
            return false;
        };

        warn_if_os_modifier(&gesture, "global hotkey");
        info!(%gesture, "pressing global hotkey");
        let outcome = self.submit(&build_hotkey_batch(&gesture));
        let accepted = outcome == StepOutcome::Submitted;
        report.record(AutomationStep::TryGlobal, outcome);

        tokio::time::sleep(self.settings.settle_delay).await;
        accepted
    }

    fn focus_host(&self, report: &mut AutomationReport) {
        let outcome = match self.host.bring_to_foreground() {
            Ok(()) => StepOutcome::Submitted,
            Err(e) => StepOutcome::Failed(e.to_string()),
        };
        report.record(AutomationStep::FocusHost, outcome);
    }

    async fn try_local(&self, detected: &DetectedHotkeys, report: &mut AutomationReport) {
        let gesture = detected
            .in_app
            .filter(|g| !g.is_empty())
            .unwrap_or(self.settings.fallback_in_app_gesture);

        let outcome = if gesture.is_empty() {
            StepOutcome::Skipped
        } else {
            warn_if_os_modifier(&gesture, "in-app hotkey");
            info!(%gesture, "pressing in-app hotkey");
            self.submit(&build_hotkey_batch(&gesture))
        };
        report.record(AutomationStep::TryLocal, outcome);

        tokio::time::sleep(self.settings.settle_delay).await;
    }

    fn submit(&self, batch: &InputBatch) -> StepOutcome {
        match submit_batch(self.injector.as_ref(), batch) {
            Ok(()) => StepOutcome::Submitted,
            Err(e) => StepOutcome::Failed(e.to_string()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::host_window::NoopHostWindow;
    use crate::infrastructure::input_injection::mock::MockInputInjector;
    use qsbridge_core::{parse_gesture, DetectionOptions, InputEvent};

    fn detector_with(hotkeys: DetectedHotkeys) -> Arc<HotkeyDetector> {
        Arc::new(HotkeyDetector::with_pipeline(
            DetectionOptions::new("/nonexistent/path/that/cannot/exist"),
            move |_| hotkeys,
        ))
    }

    fn fast_settings() -> AutomationSettings {
        AutomationSettings {
            settle_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    fn automation(
        injector: Arc<MockInputInjector>,
        hotkeys: DetectedHotkeys,
        settings: AutomationSettings,
    ) -> SearchAutomation {
        SearchAutomation::new(
            injector,
            Arc::new(NoopHostWindow),
            detector_with(hotkeys),
            settings,
        )
    }

    #[tokio::test]
    async fn test_global_hotkey_accepted_skips_local_attempt() {
        // Arrange
        let injector = Arc::new(MockInputInjector::new());
        let hotkeys = DetectedHotkeys {
            global: Some(parse_gesture("Ctrl+Alt+Q")),
            in_app: Some(parse_gesture("Ctrl+K")),
        };
        let sut = automation(Arc::clone(&injector), hotkeys, fast_settings());

        // Act
        let report = sut.run("zelda").await;

        // Assert
        assert_eq!(
            report.executed_steps(),
            vec![
                AutomationStep::TryGlobal,
                AutomationStep::ClearField,
                AutomationStep::TypeQuery
            ]
        );
        let batches = injector.batches();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0], build_hotkey_batch(&parse_gesture("Ctrl+Alt+Q")).events());
    }

    #[tokio::test]
    async fn test_no_global_uses_detected_in_app_gesture() {
        let injector = Arc::new(MockInputInjector::new());
        let hotkeys = DetectedHotkeys {
            global: None,
            in_app: Some(parse_gesture("Ctrl+K")),
        };
        let sut = automation(Arc::clone(&injector), hotkeys, fast_settings());

        let report = sut.run("mario").await;

        assert_eq!(report.outcome(AutomationStep::TryGlobal), Some(&StepOutcome::Skipped));
        assert_eq!(report.outcome(AutomationStep::FocusHost), Some(&StepOutcome::Submitted));
        assert_eq!(
            injector.batches()[0],
            build_hotkey_batch(&parse_gesture("Ctrl+K")).events()
        );
    }

    #[tokio::test]
    async fn test_prefer_global_disabled_goes_straight_to_local() {
        let injector = Arc::new(MockInputInjector::new());
        let hotkeys = DetectedHotkeys {
            global: Some(parse_gesture("Ctrl+Alt+Q")),
            in_app: None,
        };
        let settings = AutomationSettings {
            prefer_global_hotkey: false,
            ..fast_settings()
        };
        let sut = automation(Arc::clone(&injector), hotkeys, settings);

        sut.run("x").await;

        // Fallback Ctrl+F is pressed instead of the global gesture.
        assert_eq!(
            injector.batches()[0],
            build_hotkey_batch(&parse_gesture("Ctrl+F")).events()
        );
    }

    #[tokio::test]
    async fn test_rejected_global_falls_back_to_local() {
        // Arrange: the first batch (global hotkey) is rejected.
        let injector = Arc::new(MockInputInjector::new().rejecting_first(1));
        let hotkeys = DetectedHotkeys {
            global: Some(parse_gesture("Ctrl+Alt+Q")),
            in_app: None,
        };
        let sut = automation(Arc::clone(&injector), hotkeys, fast_settings());

        // Act
        let report = sut.run("metroid").await;

        // Assert
        assert!(matches!(
            report.outcome(AutomationStep::TryGlobal),
            Some(StepOutcome::Failed(_))
        ));
        assert_eq!(report.outcome(AutomationStep::TryLocal), Some(&StepOutcome::Submitted));
        assert_eq!(report.outcome(AutomationStep::TypeQuery), Some(&StepOutcome::Submitted));
    }

    #[tokio::test]
    async fn test_accepted_global_never_touches_host_window() {
        // Arrange
        let mut host = MockHostWindow::new();
        host.expect_bring_to_foreground().never();
        let hotkeys = DetectedHotkeys {
            global: Some(parse_gesture("Ctrl+Alt+Q")),
            in_app: None,
        };
        let sut = SearchAutomation::new(
            Arc::new(MockInputInjector::new()),
            Arc::new(host),
            detector_with(hotkeys),
            fast_settings(),
        );

        // Act
        let report = sut.run("x").await;

        // Assert
        assert_eq!(report.outcome(AutomationStep::FocusHost), None);
    }

    #[tokio::test]
    async fn test_host_window_failure_does_not_stop_typing() {
        let mut host = MockHostWindow::new();
        host.expect_bring_to_foreground()
            .times(1)
            .returning(|| Err(HostWindowError::NotFound("Playnite".to_string())));
        let injector = Arc::new(MockInputInjector::new());
        let sut = SearchAutomation::new(
            Arc::clone(&injector) as Arc<dyn InputInjector>,
            Arc::new(host),
            detector_with(DetectedHotkeys::default()),
            fast_settings(),
        );

        let report = sut.run("abc").await;

        assert!(matches!(
            report.outcome(AutomationStep::FocusHost),
            Some(StepOutcome::Failed(_))
        ));
        assert_eq!(report.outcome(AutomationStep::TypeQuery), Some(&StepOutcome::Submitted));
    }

    #[tokio::test]
    async fn test_empty_query_skips_typing_but_clears_field() {
        let injector = Arc::new(MockInputInjector::new());
        let sut = automation(Arc::clone(&injector), DetectedHotkeys::default(), fast_settings());

        let report = sut.run("").await;

        assert_eq!(report.outcome(AutomationStep::ClearField), Some(&StepOutcome::Submitted));
        assert_eq!(report.outcome(AutomationStep::TypeQuery), Some(&StepOutcome::Skipped));
    }

    #[tokio::test]
    async fn test_press_enter_appends_commit_batch() {
        let injector = Arc::new(MockInputInjector::new());
        let settings = AutomationSettings {
            press_enter: true,
            ..fast_settings()
        };
        let sut = automation(Arc::clone(&injector), DetectedHotkeys::default(), settings);

        let report = sut.run("q").await;

        assert_eq!(report.executed_steps().last(), Some(&AutomationStep::Commit));
        let batches = injector.batches();
        assert_eq!(
            batches.last().map(Vec::as_slice),
            Some(&[InputEvent::KeyDown(VK_RETURN), InputEvent::KeyUp(VK_RETURN)][..])
        );
    }

    #[tokio::test]
    async fn test_empty_fallback_gesture_skips_local_press() {
        let injector = Arc::new(MockInputInjector::new());
        let settings = AutomationSettings {
            fallback_in_app_gesture: Gesture::default(),
            ..fast_settings()
        };
        let sut = automation(Arc::clone(&injector), DetectedHotkeys::default(), settings);

        let report = sut.run("").await;

        assert_eq!(report.outcome(AutomationStep::TryLocal), Some(&StepOutcome::Skipped));
        // Only the select-all batch reached the injector.
        assert_eq!(injector.batches().len(), 1);
    }

    #[tokio::test]
    async fn test_auto_detect_disabled_never_runs_pipeline() {
        let injector = Arc::new(MockInputInjector::new());
        let hotkeys = DetectedHotkeys {
            global: Some(parse_gesture("Ctrl+Alt+Q")),
            in_app: None,
        };
        let settings = AutomationSettings {
            auto_detect_hotkey: false,
            ..fast_settings()
        };
        let sut = automation(Arc::clone(&injector), hotkeys, settings);

        let report = sut.run("x").await;

        assert_eq!(report.outcome(AutomationStep::TryGlobal), Some(&StepOutcome::Skipped));
        assert!(!report.has_failures());
    }
}
