//! Input injection adapters.
//!
//! - `windows` – native `SendInput` injector (Windows only).
//! - `dry_run` – logs batches, submits nothing.
//! - `mock` – records batches for tests.

use std::sync::Arc;

use crate::application::inject_input::InputInjector;

pub mod dry_run;
pub mod mock;
#[cfg(target_os = "windows")]
pub mod windows;

/// Returns the injector for this platform.
///
/// `dry_run` forces the logging injector.  Platforms without a native
/// injector always get it.
pub fn platform_injector(dry_run: bool) -> Arc<dyn InputInjector> {
    #[cfg(target_os = "windows")]
    if !dry_run {
        return Arc::new(windows::WindowsInputInjector::new());
    }

    #[cfg(not(target_os = "windows"))]
    if !dry_run {
        tracing::warn!("no native input injector on this platform; using dry run");
    }

    Arc::new(dry_run::DryRunInjector::new())
}
