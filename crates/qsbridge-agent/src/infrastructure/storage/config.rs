//! TOML-based configuration persistence for the agent.
//!
//! Reads and writes `AgentConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\qsbridge\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/qsbridge/config.toml` or `~/.config/qsbridge/config.toml`
//! - macOS:    `~/Library/Application Support/qsbridge/config.toml`
//!
//! # Example file
//!
//! ```toml
//! log_level = "info"
//!
//! [automation]
//! auto_detect_hotkey = true
//! prefer_global_hotkey = true
//! fallback_in_app_gesture = "Ctrl+F"
//! delay_before_type_ms = 150
//! press_enter = false
//!
//! [detection]
//! target_name = "QuickSearch"
//! host_name = "Playnite"
//! max_files_per_candidate = 30
//!
//! [host]
//! window_title = "Playnite"
//! ```
//!
//! # Serde default values
//!
//! Every field has a default, so a missing file, a missing section and a
//! missing key all load.  A file written by an older agent keeps working
//! after new settings are added.

use std::path::{Path, PathBuf};
use std::time::Duration;

use qsbridge_core::detection::scanner::DEFAULT_MAX_FILES_PER_CANDIDATE;
use qsbridge_core::{parse_gesture, DetectionOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::application::drive_search::AutomationSettings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub automation: AutomationConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub host: HostConfig,
}

/// How the overlay is opened and filled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutomationConfig {
    /// Scan the overlay's settings for its hotkeys.
    #[serde(default = "default_true")]
    pub auto_detect_hotkey: bool,
    /// Try the global hotkey before the in-app one.
    #[serde(default = "default_true")]
    pub prefer_global_hotkey: bool,
    /// Pressed when no in-app hotkey was detected.
    #[serde(default = "default_fallback_gesture")]
    pub fallback_in_app_gesture: String,
    /// Settle delay after each activation attempt, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_before_type_ms: u64,
    /// Commit the query with Enter.
    #[serde(default)]
    pub press_enter: bool,
}

/// Where and how to look for the overlay's settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectionConfig {
    /// Directory holding one folder per extension.  Absent means the host
    /// application's default data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,
    /// Folder-name hint; matching folders are scanned first.
    #[serde(default = "default_target_name")]
    pub target_name: String,
    /// Name of the host application, used to classify hotkey keys.
    #[serde(default = "default_host_name")]
    pub host_name: String,
    /// Files scanned per candidate folder.
    #[serde(default = "default_max_files")]
    pub max_files_per_candidate: usize,
}

/// The host application's main window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostConfig {
    /// Exact title of the window brought to the foreground.
    #[serde(default = "default_host_name")]
    pub window_title: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_fallback_gesture() -> String {
    "Ctrl+F".to_string()
}
fn default_delay_ms() -> u64 {
    150
}
fn default_target_name() -> String {
    "QuickSearch".to_string()
}
fn default_host_name() -> String {
    "Playnite".to_string()
}
fn default_max_files() -> usize {
    DEFAULT_MAX_FILES_PER_CANDIDATE
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            automation: AutomationConfig::default(),
            detection: DetectionConfig::default(),
            host: HostConfig::default(),
        }
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            auto_detect_hotkey: default_true(),
            prefer_global_hotkey: default_true(),
            fallback_in_app_gesture: default_fallback_gesture(),
            delay_before_type_ms: default_delay_ms(),
            press_enter: false,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            data_root: None,
            target_name: default_target_name(),
            host_name: default_host_name(),
            max_files_per_candidate: default_max_files(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            window_title: default_host_name(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl AutomationConfig {
    /// Builds orchestrator settings, parsing the fallback gesture.
    ///
    /// An unparseable fallback becomes the empty gesture, which the
    /// orchestrator skips.
    pub fn to_settings(&self) -> AutomationSettings {
        let fallback = parse_gesture(&self.fallback_in_app_gesture);
        if fallback.is_empty() && !self.fallback_in_app_gesture.trim().is_empty() {
            warn!(
                gesture = %self.fallback_in_app_gesture,
                "fallback in-app gesture has no recognisable key; it will not be pressed"
            );
        }

        AutomationSettings {
            auto_detect_hotkey: self.auto_detect_hotkey,
            prefer_global_hotkey: self.prefer_global_hotkey,
            fallback_in_app_gesture: fallback,
            settle_delay: Duration::from_millis(self.delay_before_type_ms),
            press_enter: self.press_enter,
        }
    }
}

impl DetectionConfig {
    /// Builds detection options, resolving the default data root.
    pub fn to_options(&self) -> DetectionOptions {
        let data_root = self
            .data_root
            .clone()
            .or_else(default_data_root)
            .unwrap_or_else(|| {
                warn!("could not determine the application data directory; detection will find nothing");
                PathBuf::new()
            });

        DetectionOptions {
            data_root,
            target_name: self.target_name.clone(),
            host_name: self.host_name.clone(),
            max_files_per_candidate: self.max_files_per_candidate,
        }
    }
}

/// The host application's extension data directory.
pub fn default_data_root() -> Option<PathBuf> {
    platform_data_dir().map(|base| base.join("Playnite").join("ExtensionsData"))
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|base| base.join("qsbridge"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AgentConfig` from the platform config file.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AgentConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AgentConfig` from `path`, returning `AgentConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AgentConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AgentConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `config` to the platform config file.
///
/// # Errors
///
/// See [`save_config_to`].
pub fn save_config(config: &AgentConfig) -> Result<PathBuf, ConfigError> {
    let path = config_file_path()?;
    save_config_to(config, &path)?;
    Ok(path)
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &AgentConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Platform config base directory, without the `qsbridge` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(PathBuf::from)
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
    }
}

/// Platform per-user application data directory.
fn platform_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(PathBuf::from)
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("share"))
            })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
