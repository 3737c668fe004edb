//! Config scanner: ranks extension data folders and enumerates settings files.
//!
//! # Scan cost
//!
//! Extension data trees can be large (caches, thumbnails, downloaded
//! metadata).  Two bounds keep the cold path predictable:
//!
//! - only `.json`, `.cfg` and `.yaml` files are considered, and a file whose
//!   text mentions neither "hotkey" nor "shortcut" is skipped without parsing;
//! - at most `max_files_per_candidate` files that pass that pre-filter are
//!   inspected per folder.  A match beyond the cap is missed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use super::extractor::HotkeyExtractor;
use super::ExtractionResult;

/// Default cap on inspected files per candidate folder.
pub const DEFAULT_MAX_FILES_PER_CANDIDATE: usize = 30;

/// File extensions considered as settings files (compared case-insensitively).
pub const CONFIG_EXTENSIONS: [&str; 3] = ["json", "cfg", "yaml"];

/// Substrings a file must contain (case-insensitively) to be inspected.
const PREFILTER_TERMS: [&str; 2] = ["hotkey", "shortcut"];

/// A directory that may hold the target's settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigCandidate {
    pub path: PathBuf,
    /// `true` if the folder name contains the target name hint.
    pub matches_hint: bool,
}

impl ConfigCandidate {
    /// Folder name, lossily converted; empty for paths without a final component.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Lists the immediate sub-directories of `data_root`, most relevant first.
///
/// Folders whose name contains `target_name_hint` (case-insensitively) rank
/// ahead of the rest.  The sort is stable, so ties keep the order in which the
/// filesystem enumerated them.  Returns an empty list if `data_root` does not
/// exist or cannot be read.
pub fn find_config_roots(data_root: &Path, target_name_hint: &str) -> Vec<ConfigCandidate> {
    let entries = match fs::read_dir(data_root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(root = %data_root.display(), "data root unavailable: {e}");
            return Vec::new();
        }
    };

    let hint = target_name_hint.to_lowercase();
    let mut candidates: Vec<ConfigCandidate> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| {
            let matches_hint = entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .contains(&hint);
            ConfigCandidate {
                path: entry.path(),
                matches_hint,
            }
        })
        .collect();

    rank_candidates(&mut candidates);
    candidates
}

/// Stable-sorts candidates so hint matches come first.
pub fn rank_candidates(candidates: &mut [ConfigCandidate]) {
    candidates.sort_by_key(|c| !c.matches_hint);
}

/// Lazily walks `candidate` recursively, yielding settings-file paths.
///
/// Entries of each directory are visited in file-name order, so the per-folder
/// cap and first-match-wins pick the same files on every filesystem.
/// Unreadable directory entries are skipped silently.
pub fn enumerate_candidate_files(candidate: &ConfigCandidate) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(&candidate.path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_config_extension(entry.path()))
        .map(walkdir::DirEntry::into_path)
}

fn has_config_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            CONFIG_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Reads `path` and returns its content if it mentions a hotkey or shortcut.
///
/// Returns `None` for unreadable or non-UTF-8 files and for files failing the
/// pre-filter.
pub fn read_relevant_file(path: &Path) -> Option<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            trace!(file = %path.display(), "skipping unreadable file: {e}");
            return None;
        }
    };
    let lowered = content.to_lowercase();
    if PREFILTER_TERMS.iter().any(|term| lowered.contains(term)) {
        Some(content)
    } else {
        trace!(file = %path.display(), "skipping file without hotkey/shortcut mentions");
        None
    }
}

/// Scans candidates in order, merging per-file extraction results.
///
/// Stops as soon as the merged result satisfies the scan rule
/// (see [`ExtractionResult::satisfies_scan`]).
pub fn scan_candidates(
    candidates: &[ConfigCandidate],
    extractor: &HotkeyExtractor,
    max_files_per_candidate: usize,
) -> ExtractionResult {
    let mut merged = ExtractionResult::default();

    for candidate in candidates {
        debug!(folder = %candidate.name(), matches_hint = candidate.matches_hint, "scanning candidate");
        let relevant_files = enumerate_candidate_files(candidate)
            .filter_map(|path| read_relevant_file(&path).map(|content| (path, content)))
            .take(max_files_per_candidate);

        for (path, content) in relevant_files {
            let found = extractor.extract(&content);
            if !found.is_empty() {
                debug!(file = %path.display(), global = ?found.global, in_app = ?found.in_app, "extracted hotkeys");
            }
            merged.merge(found);
            if merged.satisfies_scan() {
                return merged;
            }
        }
    }

    merged
}

// ── Tests ─────────────────────────────────────────────────────────────────────
