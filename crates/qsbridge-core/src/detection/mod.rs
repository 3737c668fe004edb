//! Hotkey discovery from a target application's on-disk configuration.
//!
//! The overlay we drive does not publish its shortcuts anywhere except in its
//! own settings files, stored under the host application's per-extension data
//! directory.  Detection is a two-stage pipeline:
//!
//! 1. **`scanner`** ranks the extension data folders by name similarity to the
//!    target and enumerates a bounded number of plausible settings files.
//! 2. **`extractor`** pulls gesture strings out of each file, first by walking
//!    the parsed tree, then by line patterns when the file is not parseable.
//!
//! The pipeline is deliberately forgiving: unreadable files, missing
//! directories and malformed content all mean "no result from this source".
//! It runs once per process (see `HotkeyDetector` in the agent) and performs
//! blocking file I/O.

pub mod extractor;
pub mod scanner;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::gesture::{parse_gesture, Gesture};

pub use extractor::HotkeyExtractor;
pub use scanner::{
    enumerate_candidate_files, find_config_roots, scan_candidates, ConfigCandidate,
    DEFAULT_MAX_FILES_PER_CANDIDATE,
};

/// Which gesture a discovered value configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HotkeySlot {
    /// Recognised by the OS regardless of focus.
    Global,
    /// Recognised only while the target application's window has focus.
    InApp,
}

/// Raw gesture strings found during a scan.
///
/// Each slot is filled at most once: the first non-empty value offered wins
/// and later offers for the same slot are discarded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub global: Option<String>,
    pub in_app: Option<String>,
}

impl ExtractionResult {
    /// Offers `value` for `slot`.  Returns `true` if the slot was filled by it.
    pub fn offer(&mut self, slot: HotkeySlot, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        let target = match slot {
            HotkeySlot::Global => &mut self.global,
            HotkeySlot::InApp => &mut self.in_app,
        };
        if target.is_some() {
            return false;
        }
        *target = Some(value.to_string());
        true
    }

    /// Folds another result in, keeping values already present.
    pub fn merge(&mut self, other: ExtractionResult) {
        if let Some(global) = other.global {
            self.offer(HotkeySlot::Global, &global);
        }
        if let Some(in_app) = other.in_app {
            self.offer(HotkeySlot::InApp, &in_app);
        }
    }

    /// Returns `true` if neither slot is filled.
    pub fn is_empty(&self) -> bool {
        self.global.is_none() && self.in_app.is_none()
    }

    /// Scan termination rule: stop once a global value is known, or once both
    /// slots are filled.  An in-app value alone never stops the scan.
    ///
    /// "Both filled" implies "global filled", so the rule reduces to the
    /// global slot.
    pub fn satisfies_scan(&self) -> bool {
        self.global.is_some()
    }
}

/// Gestures recovered by detection, ready for the orchestrator.
///
/// Lifecycle: empty at startup, populated by one detection pass, reset to empty
/// if detection fails.  Never persisted; stale if the target's configuration
/// changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetectedHotkeys {
    pub global: Option<Gesture>,
    pub in_app: Option<Gesture>,
}

impl DetectedHotkeys {
    /// Parses the raw strings; values that parse to an empty gesture are dropped.
    pub fn from_extraction(result: &ExtractionResult) -> Self {
        let usable = |raw: &Option<String>| {
            raw.as_deref()
                .map(parse_gesture)
                .filter(|gesture| !gesture.is_empty())
        };
        Self {
            global: usable(&result.global),
            in_app: usable(&result.in_app),
        }
    }

    /// Returns `true` if no usable gesture is known.
    pub fn is_empty(&self) -> bool {
        self.global.is_none() && self.in_app.is_none()
    }
}

/// Inputs to the detection pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionOptions {
    /// Directory holding one sub-folder per extension.
    pub data_root: PathBuf,
    /// Folder-ranking hint; folders whose name contains it are scanned first.
    pub target_name: String,
    /// Host application's own name, used as a key-name qualifier.
    pub host_name: String,
    /// Maximum number of relevant files inspected per candidate folder.
    pub max_files_per_candidate: usize,
}

impl DetectionOptions {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            target_name: "QuickSearch".to_string(),
            host_name: "Playnite".to_string(),
            max_files_per_candidate: DEFAULT_MAX_FILES_PER_CANDIDATE,
        }
    }
}

/// Runs the full detection pipeline.
///
/// A missing data root, unreadable files, and unparseable content all reduce
/// to "no result"; this function cannot fail.
pub fn detect(options: &DetectionOptions) -> DetectedHotkeys {
    let candidates = find_config_roots(&options.data_root, &options.target_name);
    if candidates.is_empty() {
        debug!(root = %options.data_root.display(), "no extension data folders to scan");
        return DetectedHotkeys::default();
    }

    let extractor = HotkeyExtractor::new(&options.host_name);
    let raw = scan_candidates(&candidates, &extractor, options.max_files_per_candidate);
    let detected = DetectedHotkeys::from_extraction(&raw);
    info!(
        global = ?raw.global,
        in_app = ?raw.in_app,
        usable_global = detected.global.is_some(),
        usable_in_app = detected.in_app.is_some(),
        "hotkey detection finished"
    );
    detected
}

// ── Tests ─────────────────────────────────────────────────────────────────────
