//! Windows input injection via the SendInput API.
//!
//! The whole batch is converted to an `INPUT` array and handed to a single
//! `SendInput` call, so the OS inserts it into the input queue without other
//! input interleaving.  Key-code events carry the virtual key plus its scan
//! code; Unicode events use `KEYEVENTF_UNICODE` with the UTF-16 code unit in
//! `wScan`, which bypasses the keyboard layout entirely.

#![cfg(target_os = "windows")]

use qsbridge_core::gesture::keymap::is_extended;
use qsbridge_core::InputEvent;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    MapVirtualKeyW, SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT,
    KEYBD_EVENT_FLAGS, KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, KEYEVENTF_UNICODE,
    MAPVK_VK_TO_VSC, VIRTUAL_KEY,
};

use crate::application::inject_input::{InjectionError, InputInjector};

/// Windows implementation of [`InputInjector`] using SendInput.
pub struct WindowsInputInjector;

impl WindowsInputInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsInputInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputInjector for WindowsInputInjector {
    fn inject(&self, events: &[InputEvent]) -> Result<usize, InjectionError> {
        let inputs: Vec<INPUT> = events.iter().map(|event| to_native(*event)).collect();
        let size = i32::try_from(std::mem::size_of::<INPUT>())
            .map_err(|e| InjectionError::Platform(e.to_string()))?;

        // SAFETY: `inputs` is a contiguous slice of fully initialised INPUT
        // structures that outlives the call.
        let accepted = unsafe { SendInput(&inputs, size) };
        Ok(accepted as usize)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn to_native(event: InputEvent) -> INPUT {
    match event {
        InputEvent::KeyDown(vk) => key_input(vk, false),
        InputEvent::KeyUp(vk) => key_input(vk, true),
        InputEvent::UnicodeDown(unit) => unicode_input(unit, false),
        InputEvent::UnicodeUp(unit) => unicode_input(unit, true),
    }
}

fn key_input(vk: u16, key_up: bool) -> INPUT {
    let mut flags = KEYBD_EVENT_FLAGS(0);
    if key_up {
        flags |= KEYEVENTF_KEYUP;
    }
    if is_extended(vk) {
        flags |= KEYEVENTF_EXTENDEDKEY;
    }

    // SAFETY: MapVirtualKeyW only reads the active keyboard layout.
    let scan = unsafe { MapVirtualKeyW(u32::from(vk), MAPVK_VK_TO_VSC) };

    keyboard_input(KEYBDINPUT {
        wVk: VIRTUAL_KEY(vk),
        wScan: scan as u16,
        dwFlags: flags,
        time: 0,
        dwExtraInfo: 0,
    })
}

fn unicode_input(code_unit: u16, key_up: bool) -> INPUT {
    let mut flags = KEYEVENTF_UNICODE;
    if key_up {
        flags |= KEYEVENTF_KEYUP;
    }

    keyboard_input(KEYBDINPUT {
        wVk: VIRTUAL_KEY(0),
        wScan: code_unit,
        dwFlags: flags,
        time: 0,
        dwExtraInfo: 0,
    })
}

fn keyboard_input(ki: KEYBDINPUT) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 { ki },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsbridge_core::gesture::keymap::{VK_CONTROL, VK_LEFT};

    fn keyboard(input: &INPUT) -> KEYBDINPUT {
        assert_eq!(input.r#type, INPUT_KEYBOARD);
        // SAFETY: every INPUT built here is a keyboard input.
        unsafe { input.Anonymous.ki }
    }

    #[test]
    fn test_unicode_event_carries_code_unit_in_scan_field() {
        let ki = keyboard(&to_native(InputEvent::UnicodeDown(0x00E9)));

        assert_eq!(ki.wVk, VIRTUAL_KEY(0));
        assert_eq!(ki.wScan, 0x00E9);
        assert_eq!(ki.dwFlags, KEYEVENTF_UNICODE);
    }

    #[test]
    fn test_unicode_up_sets_keyup_flag() {
        let ki = keyboard(&to_native(InputEvent::UnicodeUp(0x61)));

        assert_eq!(ki.dwFlags, KEYEVENTF_UNICODE | KEYEVENTF_KEYUP);
    }

    #[test]
    fn test_arrow_key_is_extended() {
        let ki = keyboard(&to_native(InputEvent::KeyDown(VK_LEFT)));

        assert_eq!(ki.wVk, VIRTUAL_KEY(VK_LEFT));
        assert_eq!(ki.dwFlags, KEYEVENTF_EXTENDEDKEY);
    }

    #[test]
    fn test_control_release_is_plain_keyup() {
        let ki = keyboard(&to_native(InputEvent::KeyUp(VK_CONTROL)));

        assert_eq!(ki.dwFlags, KEYEVENTF_KEYUP);
    }
}
