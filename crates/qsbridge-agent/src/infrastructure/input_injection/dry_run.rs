//! Dry-run injector: logs every event instead of submitting it.
//!
//! Used by `--dry-run` and on platforms without a native injector.  Every
//! event is reported as accepted so the orchestrator behaves exactly as it
//! would on a live desktop.

use qsbridge_core::gesture::key_name;
use qsbridge_core::gesture::keymap::{VK_CONTROL, VK_LWIN, VK_MENU, VK_SHIFT};
use qsbridge_core::InputEvent;
use tracing::info;

use crate::application::inject_input::{InjectionError, InputInjector};

#[derive(Debug, Default)]
pub struct DryRunInjector;

impl DryRunInjector {
    pub fn new() -> Self {
        Self
    }
}

impl InputInjector for DryRunInjector {
    fn inject(&self, events: &[InputEvent]) -> Result<usize, InjectionError> {
        info!(count = events.len(), "dry run: input batch");
        for event in events {
            info!("  {}", describe(event));
        }
        Ok(events.len())
    }
}

/// Human-readable form of one event, e.g. `down Ctrl` or `up 'é'`.
pub fn describe(event: &InputEvent) -> String {
    match *event {
        InputEvent::KeyDown(vk) => format!("down {}", vk_label(vk)),
        InputEvent::KeyUp(vk) => format!("up {}", vk_label(vk)),
        InputEvent::UnicodeDown(unit) => format!("down {}", unit_label(unit)),
        InputEvent::UnicodeUp(unit) => format!("up {}", unit_label(unit)),
    }
}

fn vk_label(vk: u16) -> String {
    let modifier = match vk {
        VK_CONTROL => Some("Ctrl"),
        VK_MENU => Some("Alt"),
        VK_SHIFT => Some("Shift"),
        VK_LWIN => Some("Win"),
        _ => None,
    };
    modifier
        .or_else(|| key_name(vk))
        .map_or_else(|| format!("VK 0x{vk:02X}"), str::to_string)
}

fn unit_label(unit: u16) -> String {
    match char::from_u32(u32::from(unit)) {
        Some(c) if !c.is_control() => format!("'{c}'"),
        _ => format!("U+{unit:04X}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_every_event() {
        let events = [InputEvent::KeyDown(VK_CONTROL), InputEvent::KeyUp(VK_CONTROL)];

        assert_eq!(DryRunInjector::new().inject(&events).unwrap(), 2);
    }

    #[test]
    fn test_describe_named_key() {
        assert_eq!(describe(&InputEvent::KeyDown(VK_CONTROL)), "down Ctrl");
    }

    #[test]
    fn test_describe_unknown_vk_falls_back_to_hex() {
        assert_eq!(describe(&InputEvent::KeyUp(0xFF)), "up VK 0xFF");
    }

    #[test]
    fn test_describe_unicode_and_surrogate() {
        assert_eq!(describe(&InputEvent::UnicodeUp(0x00E9)), "up 'é'");
        // A lone surrogate half is not a char on its own.
        assert_eq!(describe(&InputEvent::UnicodeDown(0xD83C)), "down U+D83C");
    }
}
