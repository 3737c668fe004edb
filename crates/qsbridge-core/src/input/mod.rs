//! Input event plans.
//!
//! An [`InputBatch`] is an ordered list of [`InputEvent`]s that the agent
//! submits to the OS injection facility in a single call.  The builders here
//! are pure: they decide *what* to press and in which order, never *how*.
//!
//! # Why batches? (for beginners)
//!
//! Windows' `SendInput` inserts the whole array into the input stream without
//! interleaving it with events from other sources.  Submitting a hotkey as one
//! batch means nothing the user types can land between "Ctrl down" and
//! "Ctrl up" and leave the target with a half-pressed chord.

use serde::{Deserialize, Serialize};

use crate::gesture::keymap::{VK_A, VK_CONTROL, VK_LWIN, VK_MENU, VK_SHIFT};
use crate::gesture::Gesture;

/// One synthesized keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    /// Press of the key with the given virtual key code.
    KeyDown(u16),
    /// Release of the key with the given virtual key code.
    KeyUp(u16),
    /// Press carrying one raw UTF-16 code unit (layout-independent).
    UnicodeDown(u16),
    /// Release carrying one raw UTF-16 code unit.
    UnicodeUp(u16),
}

/// Ordered list of events submitted as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputBatch {
    events: Vec<InputEvent>,
}

impl InputBatch {
    /// Creates an empty (no-op) batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events in submission order.
    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Number of events in the batch.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if submitting the batch would do nothing.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }
}

impl From<Vec<InputEvent>> for InputBatch {
    fn from(events: Vec<InputEvent>) -> Self {
        Self { events }
    }
}

impl IntoIterator for InputBatch {
    type Item = InputEvent;
    type IntoIter = std::vec::IntoIter<InputEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

/// Modifier VKs in press order.  Release order is the reverse.
fn modifier_press_order(gesture: &Gesture) -> impl DoubleEndedIterator<Item = u16> {
    let m = gesture.modifiers;
    [
        (m.win(), VK_LWIN),
        (m.ctrl(), VK_CONTROL),
        (m.shift(), VK_SHIFT),
        (m.alt(), VK_MENU),
    ]
    .into_iter()
    .filter(|(active, _)| *active)
    .map(|(_, vk)| vk)
}

/// Builds the press/release sequence for a gesture.
///
/// Modifiers go down in the order Win, Ctrl, Shift, Alt; then the main key is
/// pressed and released; then the modifiers come up in reverse order
/// (Alt, Shift, Ctrl, Win).  An empty gesture yields an empty batch.
pub fn build_hotkey_batch(gesture: &Gesture) -> InputBatch {
    let mut batch = InputBatch::new();
    if gesture.is_empty() {
        return batch;
    }

    for vk in modifier_press_order(gesture) {
        batch.push(InputEvent::KeyDown(vk));
    }
    batch.push(InputEvent::KeyDown(gesture.key_code));
    batch.push(InputEvent::KeyUp(gesture.key_code));
    for vk in modifier_press_order(gesture).rev() {
        batch.push(InputEvent::KeyUp(vk));
    }
    batch
}

/// Builds a Ctrl+A press used to select the target field's existing text.
///
/// Typing over the selection clears it; the clipboard is never touched.
pub fn build_select_all_batch() -> InputBatch {
    InputBatch::from(vec![
        InputEvent::KeyDown(VK_CONTROL),
        InputEvent::KeyDown(VK_A),
        InputEvent::KeyUp(VK_A),
        InputEvent::KeyUp(VK_CONTROL),
    ])
}

/// Builds a single unmodified key press (down then up).
///
/// A key code of 0 yields an empty batch.
pub fn build_key_press_batch(key_code: u16) -> InputBatch {
    build_hotkey_batch(&Gesture::new(Default::default(), key_code))
}

/// Builds Unicode down/up pairs for every UTF-16 code unit of `text`.
///
/// Surrogate pairs become two independent code-unit pairs, which is how the
/// Windows Unicode keyboard facility consumes them.  The result always holds
/// exactly `2 * text.encode_utf16().count()` events.
pub fn build_type_text_batch(text: &str) -> InputBatch {
    text.encode_utf16()
        .flat_map(|unit| [InputEvent::UnicodeDown(unit), InputEvent::UnicodeUp(unit)])
        .collect::<Vec<_>>()
        .into()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::keymap::VK_RETURN;
    use crate::gesture::parse_gesture;
    use InputEvent::*;

    // ── build_hotkey_batch ────────────────────────────────────────────────────

    #[test]
    fn test_hotkey_batch_nests_modifiers_outer_in() {
        // Arrange
        let g = parse_gesture("Alt+Shift+Ctrl+Win+F");

        // Act
        let batch = build_hotkey_batch(&g);

        // Assert
        assert_eq!(
            batch.events(),
            &[
                KeyDown(VK_LWIN),
                KeyDown(VK_CONTROL),
                KeyDown(VK_SHIFT),
                KeyDown(VK_MENU),
                KeyDown(0x46),
                KeyUp(0x46),
                KeyUp(VK_MENU),
                KeyUp(VK_SHIFT),
                KeyUp(VK_CONTROL),
                KeyUp(VK_LWIN),
            ]
        );
    }

    #[test]
    fn test_hotkey_batch_ctrl_f() {
        let batch = build_hotkey_batch(&parse_gesture("Ctrl+F"));
        assert_eq!(
            batch.events(),
            &[KeyDown(VK_CONTROL), KeyDown(0x46), KeyUp(0x46), KeyUp(VK_CONTROL)]
        );
    }

    #[test]
    fn test_hotkey_batch_for_empty_gesture_is_empty() {
        assert!(build_hotkey_batch(&parse_gesture("Ctrl+Shift")).is_empty());
        assert!(build_hotkey_batch(&Gesture::default()).is_empty());
    }

    #[test]
    fn test_every_pressed_key_is_released() {
        let batch = build_hotkey_batch(&parse_gesture("Ctrl+Alt+Shift+Win+F5"));
        let downs = batch.events().iter().filter(|e| matches!(e, KeyDown(_))).count();
        let ups = batch.events().iter().filter(|e| matches!(e, KeyUp(_))).count();
        assert_eq!(downs, ups);
    }

    // ── build_select_all_batch / build_key_press_batch ───────────────────────

    #[test]
    fn test_select_all_is_ctrl_a() {
        assert_eq!(
            build_select_all_batch().events(),
            &[KeyDown(VK_CONTROL), KeyDown(VK_A), KeyUp(VK_A), KeyUp(VK_CONTROL)]
        );
    }

    #[test]
    fn test_key_press_batch_enter() {
        assert_eq!(
            build_key_press_batch(VK_RETURN).events(),
            &[KeyDown(VK_RETURN), KeyUp(VK_RETURN)]
        );
        assert!(build_key_press_batch(0).is_empty());
    }

    // ── build_type_text_batch ─────────────────────────────────────────────────

    #[test]
    fn test_type_text_emits_two_events_per_code_unit() {
        for text in ["", "a", "Hollow Knight", "Pokémon", "日本語", "🎮 co-op", "\u{1F600}\u{1F600}"] {
            let batch = build_type_text_batch(text);
            assert_eq!(
                batch.len(),
                2 * text.encode_utf16().count(),
                "wrong event count for {text:?}"
            );
        }
    }

    #[test]
    fn test_type_text_empty_is_no_op() {
        assert!(build_type_text_batch("").is_empty());
    }

    #[test]
    fn test_type_text_surrogate_pair_is_split_into_code_units() {
        // Arrange: U+1F3AE (video game) is D83C DFAE in UTF-16.
        let batch = build_type_text_batch("\u{1F3AE}");

        // Assert
        assert_eq!(
            batch.events(),
            &[
                UnicodeDown(0xD83C),
                UnicodeUp(0xD83C),
                UnicodeDown(0xDFAE),
                UnicodeUp(0xDFAE),
            ]
        );
    }

    #[test]
    fn test_type_text_never_uses_key_codes() {
        let batch = build_type_text_batch("Ctrl+A");
        assert!(batch
            .events()
            .iter()
            .all(|e| matches!(e, UnicodeDown(_) | UnicodeUp(_))));
    }
}
