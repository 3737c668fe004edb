//! HotkeyDetector: owns the process-wide cache of detected hotkeys.
//!
//! # Lifecycle
//!
//! The cache starts empty.  The first orchestrator run that needs it triggers
//! the detection pipeline; a non-empty result is kept for the rest of the
//! process.  An empty result leaves the cache empty, so the next run tries
//! again (the user may have configured the overlay in the meantime).  If the
//! pipeline panics, the cache is reset to empty and the failure is logged.
//!
//! The pipeline does blocking file I/O, so it runs on Tokio's blocking pool
//! via `spawn_blocking`.  Two concurrent detections are harmless: both produce
//! the same answer for the same filesystem, and the last write wins.

use std::sync::Arc;

use qsbridge_core::{detect, DetectedHotkeys, DetectionOptions};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Error type for the detection boundary.
#[derive(Debug, Error)]
pub enum DetectionError {
    /// The blocking detection task panicked or was cancelled.
    #[error("detection task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The function that actually scans the disk.
type Pipeline = dyn Fn(&DetectionOptions) -> DetectedHotkeys + Send + Sync;

/// Lazily populated cache of detected hotkeys.
pub struct HotkeyDetector {
    options: DetectionOptions,
    pipeline: Arc<Pipeline>,
    cache: RwLock<DetectedHotkeys>,
}

impl HotkeyDetector {
    /// Creates a detector that runs [`qsbridge_core::detect`].
    pub fn new(options: DetectionOptions) -> Self {
        Self::with_pipeline(options, detect)
    }

    /// Creates a detector with a custom pipeline (used by tests).
    pub fn with_pipeline<F>(options: DetectionOptions, pipeline: F) -> Self
    where
        F: Fn(&DetectionOptions) -> DetectedHotkeys + Send + Sync + 'static,
    {
        Self {
            options,
            pipeline: Arc::new(pipeline),
            cache: RwLock::new(DetectedHotkeys::default()),
        }
    }

    /// Options the pipeline runs with.
    pub fn options(&self) -> &DetectionOptions {
        &self.options
    }

    /// Returns the cached hotkeys without triggering detection.
    pub async fn cached(&self) -> DetectedHotkeys {
        *self.cache.read().await
    }

    /// Returns cached hotkeys, running detection first if the cache is empty.
    ///
    /// Never fails: a failed detection resets the cache and yields an empty
    /// result.
    pub async fn ensure_detected(&self) -> DetectedHotkeys {
        let current = self.cached().await;
        if !current.is_empty() {
            return current;
        }

        match self.run_pipeline().await {
            Ok(found) => {
                if found.is_empty() {
                    info!(root = %self.options.data_root.display(), "no hotkeys detected");
                }
                *self.cache.write().await = found;
                found
            }
            Err(e) => {
                error!("hotkey detection failed: {e}");
                self.reset().await;
                DetectedHotkeys::default()
            }
        }
    }

    /// Clears the cache so the next call re-runs detection.
    pub async fn reset(&self) {
        *self.cache.write().await = DetectedHotkeys::default();
    }

    async fn run_pipeline(&self) -> Result<DetectedHotkeys, DetectionError> {
        let options = self.options.clone();
        let pipeline = Arc::clone(&self.pipeline);
        let found = tokio::task::spawn_blocking(move || pipeline(&options)).await?;
        Ok(found)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
