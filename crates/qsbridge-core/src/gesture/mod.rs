//! Keyboard gesture model.
//!
//! A [`Gesture`] is a set of modifier keys plus one main key, identified by its
//! Windows virtual key code.  Gestures are parsed from the human-readable
//! strings that applications store in their settings (`"Ctrl+Shift+F"`,
//! `"alt + space"`, `"Win+Q"`) and rendered back to the same format.
//!
//! # The empty gesture
//!
//! A gesture whose key code is 0 is *empty*: it carries no actionable meaning
//! even if modifiers were recorded while parsing it.  `"Ctrl+Shift"` parses to
//! an empty gesture because a modifier chord alone cannot open anything.

pub mod keymap;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use keymap::key_name;

/// Set of active modifier keys, stored as a bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const CTRL: u8 = 1 << 0;
    pub const ALT: u8 = 1 << 1;
    pub const SHIFT: u8 = 1 << 2;
    pub const WIN: u8 = 1 << 3;

    /// No modifiers.
    pub const NONE: Self = Self(0);

    /// Returns `true` if Ctrl is active.
    pub fn ctrl(&self) -> bool {
        self.0 & Self::CTRL != 0
    }

    /// Returns `true` if Alt is active.
    pub fn alt(&self) -> bool {
        self.0 & Self::ALT != 0
    }

    /// Returns `true` if Shift is active.
    pub fn shift(&self) -> bool {
        self.0 & Self::SHIFT != 0
    }

    /// Returns `true` if the Win (meta / super) key is active.
    pub fn win(&self) -> bool {
        self.0 & Self::WIN != 0
    }

    /// Returns `true` if no modifier is active.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns a copy with the given flag bits added.
    pub fn with(self, flags: u8) -> Self {
        Self(self.0 | flags)
    }
}

/// A modifier set plus a main key.
///
/// Two gestures are equal iff both the modifier set and the key code match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Gesture {
    /// Active modifiers.
    pub modifiers: Modifiers,
    /// Windows virtual key code of the main key; 0 means unresolved.
    pub key_code: u16,
}

impl Gesture {
    /// Creates a gesture from its parts.
    pub fn new(modifiers: Modifiers, key_code: u16) -> Self {
        Self {
            modifiers,
            key_code,
        }
    }

    /// Returns `true` if the gesture has no resolved main key.
    pub fn is_empty(&self) -> bool {
        self.key_code == keymap::VK_NONE
    }
}

impl fmt::Display for Gesture {
    /// Renders as `Ctrl+Alt+Shift+Win+Key`, omitting inactive modifiers.
    ///
    /// Empty gestures render as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(key) = key_name(self.key_code) else {
            return Ok(());
        };
        let m = self.modifiers;
        for (active, name) in [
            (m.ctrl(), "Ctrl"),
            (m.alt(), "Alt"),
            (m.shift(), "Shift"),
            (m.win(), "Win"),
        ] {
            if active {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(key)
    }
}

/// Maps a modifier token to its flag bit, or `None` if it is not a modifier.
fn modifier_flag(token: &str) -> Option<u8> {
    match token.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Some(Modifiers::CTRL),
        "alt" => Some(Modifiers::ALT),
        "shift" => Some(Modifiers::SHIFT),
        "win" | "windows" | "meta" => Some(Modifiers::WIN),
        _ => None,
    }
}

/// Parses a human-readable gesture string such as `"Ctrl+Shift+F"`.
///
/// Tokens are separated by `+` and/or whitespace.  Modifier tokens are matched
/// case-insensitively (`ctrl`/`control`, `alt`, `shift`, `win`/`windows`/`meta`);
/// the first non-modifier token is the main key and later tokens are ignored.
/// An unrecognised or missing key yields key code 0 (an empty gesture) while
/// the modifiers seen are still recorded.
///
/// Because whitespace separates tokens, multi-word key names must be written
/// without spaces: `"Ctrl+PageUp"` or `"Ctrl+Page-Up"`, not `"Ctrl+Page Up"`.
pub fn parse_gesture(text: &str) -> Gesture {
    let mut modifiers = Modifiers::NONE;
    let mut key_code = keymap::VK_NONE;

    for token in text
        .split(|c: char| c == '+' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if let Some(flag) = modifier_flag(token) {
            modifiers = modifiers.with(flag);
            continue;
        }
        key_code = map_key_to_code(token);
        break;
    }

    Gesture::new(modifiers, key_code)
}

/// Maps a key name to its virtual key code; unrecognised text maps to 0.
///
/// Pure and total: see [`keymap::key_code`] for the recognised names.
pub fn map_key_to_code(text: &str) -> u16 {
    keymap::key_code(text)
}

/// Returns `true` iff the gesture uses the Win/meta modifier.
///
/// The OS reserves many Win chords, so a synthesized press may be swallowed
/// before it reaches the target.  Callers should warn, not refuse.
pub fn contains_os_modifier(gesture: &Gesture) -> bool {
    gesture.modifiers.win()
}

/// Logs a warning if `gesture` uses the Win modifier.  Returns the check result.
pub fn warn_if_os_modifier(gesture: &Gesture, context: &str) -> bool {
    let reserved = contains_os_modifier(gesture);
    if reserved {
        warn!("{context} gesture {gesture} uses the Win key; the OS may intercept it");
    }
    reserved
}

// ── Tests ─────────────────────────────────────────────────────────────────────
