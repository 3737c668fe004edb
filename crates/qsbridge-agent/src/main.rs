//! qsbridge agent entry point.
//!
//! Parses the command line, loads the config, initialises logging, and
//! dispatches to one subcommand.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load AgentConfig          -- --config PATH or the platform default
//!  └─ tracing_subscriber        -- RUST_LOG overrides config.log_level
//!  └─ subcommand
//!       ├─ open <URI>           -> parse_trigger_query → SearchAutomation::run
//!       ├─ detect               -> HotkeyDetector::ensure_detected
//!       ├─ parse-uri <URI>      -> parse_trigger_query
//!       └─ init-config          -> save_config_to (only if absent)
//! ```
//!
//! # Failure policy
//!
//! The agent is launched by the OS URI handler with nobody watching stdout,
//! so `open` never fails on a bad config: it logs the problem and carries on
//! with defaults.  Only `init-config` reports config I/O errors.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use qsbridge_agent::application::detect_hotkeys::HotkeyDetector;
use qsbridge_agent::application::drive_search::SearchAutomation;
use qsbridge_agent::cli::{Cli, Command};
use qsbridge_agent::infrastructure::host_window::platform_host_window;
use qsbridge_agent::infrastructure::input_injection::platform_injector;
use qsbridge_agent::infrastructure::storage::config::{
    config_file_path, load_config_from, save_config_to, AgentConfig, ConfigError,
};
use qsbridge_core::gesture::warn_if_os_modifier;
use qsbridge_core::{parse_trigger_query, Gesture};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => Ok(path.clone()),
        None => config_file_path(),
    };
    let loaded = config_path
        .as_ref()
        .map_err(|e| e.to_string())
        .and_then(|path| load_config_from(path).map_err(|e| e.to_string()));
    let (config, config_problem) = match loaded {
        Ok(config) => (config, None),
        Err(problem) => (AgentConfig::default(), Some(problem)),
    };

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if let Some(problem) = &config_problem {
        warn!("using default configuration: {problem}");
    }

    match cli.command {
        Command::Open { uri } => open(&config, &uri, cli.dry_run).await,
        Command::Detect => detect(&config).await,
        Command::ParseUri { uri } => {
            println!("{}", parse_trigger_query(&uri));
            Ok(())
        }
        Command::InitConfig => init_config(config_path),
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

async fn open(config: &AgentConfig, uri: &str, dry_run: bool) -> anyhow::Result<()> {
    let query = parse_trigger_query(uri);
    info!(uri, query = %query, "trigger received");

    let detector = Arc::new(HotkeyDetector::new(config.detection.to_options()));
    let automation = SearchAutomation::new(
        platform_injector(dry_run),
        platform_host_window(&config.host.window_title, dry_run),
        detector,
        config.automation.to_settings(),
    );

    let report = automation.run(&query).await;
    if report.has_failures() {
        warn!(steps = ?report.steps, "search automation finished with failures");
    } else {
        info!("search automation finished");
    }
    Ok(())
}

async fn detect(config: &AgentConfig) -> anyhow::Result<()> {
    let detector = HotkeyDetector::new(config.detection.to_options());
    info!(root = %detector.options().data_root.display(), "scanning for hotkeys");

    let detected = detector.ensure_detected().await;
    println!("global: {}", describe(detected.global, "global hotkey"));
    println!("in-app: {}", describe(detected.in_app, "in-app hotkey"));
    Ok(())
}

fn init_config(path: Result<PathBuf, ConfigError>) -> anyhow::Result<()> {
    let path = path.context("cannot place the config file")?;
    if path.exists() {
        println!("{} (already exists)", path.display());
        return Ok(());
    }

    save_config_to(&AgentConfig::default(), &path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn describe(gesture: Option<Gesture>, context: &str) -> String {
    match gesture {
        Some(gesture) => {
            warn_if_os_modifier(&gesture, context);
            gesture.to_string()
        }
        None => "(none)".to_string(),
    }
}
