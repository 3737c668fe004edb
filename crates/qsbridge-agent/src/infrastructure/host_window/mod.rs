//! Host window activation adapters.

use std::sync::Arc;

use tracing::debug;

use crate::application::drive_search::{HostWindow, HostWindowError};

#[cfg(target_os = "windows")]
pub mod windows;

/// Host window that does nothing.
///
/// Used for dry runs and on platforms without a native implementation.
#[derive(Debug, Default)]
pub struct NoopHostWindow;

impl HostWindow for NoopHostWindow {
    fn bring_to_foreground(&self) -> Result<(), HostWindowError> {
        debug!("host window activation skipped");
        Ok(())
    }
}

/// Returns the host window adapter for this platform.
pub fn platform_host_window(title: &str, dry_run: bool) -> Arc<dyn HostWindow> {
    #[cfg(target_os = "windows")]
    if !dry_run {
        return Arc::new(windows::WindowsHostWindow::new(title));
    }

    debug!(title, dry_run, "using no-op host window");
    Arc::new(NoopHostWindow)
}
