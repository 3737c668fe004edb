//! Brings the host application's top-level window to the foreground.

#![cfg(target_os = "windows")]

use windows::core::{HSTRING, PCWSTR};
use windows::Win32::UI::WindowsAndMessaging::{
    FindWindowW, IsIconic, SetForegroundWindow, ShowWindow, SW_RESTORE,
};

use crate::application::drive_search::{HostWindow, HostWindowError};

/// Finds the host window by exact title.
pub struct WindowsHostWindow {
    title: String,
}

impl WindowsHostWindow {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl HostWindow for WindowsHostWindow {
    fn bring_to_foreground(&self) -> Result<(), HostWindowError> {
        let title = HSTRING::from(self.title.as_str());

        // SAFETY: both string arguments are valid for the duration of the call.
        let hwnd = unsafe { FindWindowW(PCWSTR::null(), &title) }
            .map_err(|_| HostWindowError::NotFound(self.title.clone()))?;
        if hwnd.is_invalid() {
            return Err(HostWindowError::NotFound(self.title.clone()));
        }

        // SAFETY: `hwnd` was just returned by FindWindowW.
        unsafe {
            if IsIconic(hwnd).as_bool() {
                let _ = ShowWindow(hwnd, SW_RESTORE);
            }
            if !SetForegroundWindow(hwnd).as_bool() {
                return Err(HostWindowError::Platform(
                    "SetForegroundWindow refused the request".to_string(),
                ));
            }
        }
        Ok(())
    }
}
