//! Key name to Windows Virtual Key (VK) code translation table.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).
//!
//! # What is a Windows Virtual Key (VK) code? (for beginners)
//!
//! Windows assigns each keyboard key a number called a "Virtual Key code".
//! These are defined in `<winuser.h>` and named `VK_*` (e.g., `VK_RETURN = 0x0D`,
//! `VK_SPACE = 0x20`).  They are "virtual" because they represent *logical* keys
//! rather than physical scan codes: pressing the letter A on any keyboard layout
//! always produces `VK_A = 0x41`, regardless of whether the physical key is
//! labelled "A" (QWERTY) or "Q" (AZERTY).
//!
//! # How this table works
//!
//! Letters and digits need no table at all: `VK_A..VK_Z` equal the ASCII codes
//! of `'A'..'Z'` and `VK_0..VK_9` equal the ASCII codes of `'0'..'9'`.
//! Function keys are contiguous from `VK_F1 = 0x70` to `VK_F24 = 0x87`.
//! Everything else goes through [`NAMED_KEYS`], a small list of
//! `(normalised name, VK)` pairs that includes common aliases (`Esc`,
//! `PgDn`, ...).  Rendering a gesture back to text uses one canonical name
//! per VK from `DISPLAY_NAMES`.

/// Code 0 never names a key; it marks an unresolved key in a gesture.
pub const VK_NONE: u16 = 0x00;

pub const VK_BACK: u16 = 0x08;
pub const VK_TAB: u16 = 0x09;
pub const VK_RETURN: u16 = 0x0D;
pub const VK_SHIFT: u16 = 0x10;
pub const VK_CONTROL: u16 = 0x11;
pub const VK_MENU: u16 = 0x12;
pub const VK_ESCAPE: u16 = 0x1B;
pub const VK_SPACE: u16 = 0x20;
pub const VK_PRIOR: u16 = 0x21;
pub const VK_NEXT: u16 = 0x22;
pub const VK_END: u16 = 0x23;
pub const VK_HOME: u16 = 0x24;
pub const VK_LEFT: u16 = 0x25;
pub const VK_UP: u16 = 0x26;
pub const VK_RIGHT: u16 = 0x27;
pub const VK_DOWN: u16 = 0x28;
pub const VK_INSERT: u16 = 0x2D;
pub const VK_DELETE: u16 = 0x2E;
pub const VK_A: u16 = 0x41;
pub const VK_LWIN: u16 = 0x5B;
pub const VK_F1: u16 = 0x70;
pub const VK_F24: u16 = 0x87;

/// Named keys, keyed by their normalised spelling (lowercase, no `-`/`_`).
///
/// Aliases follow the canonical entry for the same VK.
const NAMED_KEYS: &[(&str, u16)] = &[
    ("space", VK_SPACE),
    ("spacebar", VK_SPACE),
    ("enter", VK_RETURN),
    ("return", VK_RETURN),
    ("tab", VK_TAB),
    ("escape", VK_ESCAPE),
    ("esc", VK_ESCAPE),
    ("backspace", VK_BACK),
    ("back", VK_BACK),
    ("delete", VK_DELETE),
    ("del", VK_DELETE),
    ("insert", VK_INSERT),
    ("ins", VK_INSERT),
    ("home", VK_HOME),
    ("end", VK_END),
    ("pageup", VK_PRIOR),
    ("pgup", VK_PRIOR),
    ("prior", VK_PRIOR),
    ("pagedown", VK_NEXT),
    ("pgdn", VK_NEXT),
    ("next", VK_NEXT),
    ("left", VK_LEFT),
    ("arrowleft", VK_LEFT),
    ("up", VK_UP),
    ("arrowup", VK_UP),
    ("right", VK_RIGHT),
    ("arrowright", VK_RIGHT),
    ("down", VK_DOWN),
    ("arrowdown", VK_DOWN),
];

/// Canonical display names for the named keys.
const DISPLAY_NAMES: &[(u16, &str)] = &[
    (VK_SPACE, "Space"),
    (VK_RETURN, "Enter"),
    (VK_TAB, "Tab"),
    (VK_ESCAPE, "Escape"),
    (VK_BACK, "Backspace"),
    (VK_DELETE, "Delete"),
    (VK_INSERT, "Insert"),
    (VK_HOME, "Home"),
    (VK_END, "End"),
    (VK_PRIOR, "PageUp"),
    (VK_NEXT, "PageDown"),
    (VK_LEFT, "Left"),
    (VK_UP, "Up"),
    (VK_RIGHT, "Right"),
    (VK_DOWN, "Down"),
];

/// Function key display names `F1..F24`, indexed by `vk - VK_F1`.
const FUNCTION_KEY_NAMES: [&str; 24] = [
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12", "F13", "F14",
    "F15", "F16", "F17", "F18", "F19", "F20", "F21", "F22", "F23", "F24",
];

/// Single-character display names for `VK_0..VK_9` and `VK_A..VK_Z`.
const ALNUM_NAMES: [&str; 36] = [
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "A", "B", "C", "D", "E", "F", "G", "H",
    "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
];

/// Translates a key name to a Windows Virtual Key code.
///
/// Recognises `F1..F24`, a single ASCII letter or digit, and the named keys in
/// [`NAMED_KEYS`] (case-insensitive, `-` and `_` ignored so `"Page-Down"` and
/// `"page_down"` both work).  Returns [`VK_NONE`] for anything else.
///
/// # Panics
///
/// This function never panics; every input string is handled.
pub fn key_code(text: &str) -> u16 {
    let normalised: String = text
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();

    if normalised.is_empty() {
        return VK_NONE;
    }

    let mut chars = normalised.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphanumeric() {
            return c.to_ascii_uppercase() as u16;
        }
        return VK_NONE;
    }

    if let Some(number) = normalised.strip_prefix('f') {
        if let Ok(n) = number.parse::<u16>() {
            if (1..=24).contains(&n) && !number.starts_with('0') {
                return VK_F1 + n - 1;
            }
        }
    }

    NAMED_KEYS
        .iter()
        .find(|(name, _)| *name == normalised)
        .map(|&(_, vk)| vk)
        .unwrap_or(VK_NONE)
}

/// Translates a Windows Virtual Key code back to its canonical display name.
///
/// Returns `None` for codes outside the supported key subset.
pub fn key_name(vk: u16) -> Option<&'static str> {
    match vk {
        0x30..=0x39 => Some(ALNUM_NAMES[(vk - 0x30) as usize]),
        0x41..=0x5A => Some(ALNUM_NAMES[(vk - VK_A) as usize + 10]),
        VK_F1..=VK_F24 => Some(FUNCTION_KEY_NAMES[(vk - VK_F1) as usize]),
        _ => DISPLAY_NAMES
            .iter()
            .find(|(code, _)| *code == vk)
            .map(|&(_, name)| name),
    }
}

/// Returns `true` for VKs that Windows treats as extended keys.
///
/// Injected navigation keys without `KEYEVENTF_EXTENDEDKEY` are interpreted as
/// their numeric-keypad twins when NumLock is off.
pub fn is_extended(vk: u16) -> bool {
    matches!(vk, VK_PRIOR..=VK_DOWN | VK_INSERT | VK_DELETE | VK_LWIN)
}
