//! # qsbridge-core
//!
//! Shared library for qsbridge containing the keyboard gesture model, the
//! hotkey discovery heuristics, the input batch builders, and the trigger URI
//! parser.
//!
//! This crate has zero dependencies on OS APIs.  Everything that touches the
//! real keyboard lives in `qsbridge-agent`.
//!
//! # Architecture overview (for beginners)
//!
//! qsbridge lets a custom URI (for example
//! `playnite://quicksearch?q=Hollow%20Knight`) drive a third-party search
//! overlay that lives inside another application.  The overlay has no API, so
//! the only way in is the keyboard: press the overlay's hotkey, clear its
//! text box, and type the query.
//!
//! This crate (`qsbridge-core`) is the pure part of that pipeline:
//!
//! - **`gesture`** – Turns human-readable shortcuts such as `"Ctrl+Shift+F"`
//!   into a modifier set plus a Windows virtual key code.
//!
//! - **`detection`** – Finds out which shortcut opens the overlay by scanning
//!   the overlay's configuration files on disk.  The files come in several
//!   formats, so the extraction is heuristic and best-effort.
//!
//! - **`input`** – Builds ordered batches of key-down / key-up / Unicode events
//!   that the agent hands to the OS injection facility in one call.
//!
//! - **`trigger`** – Extracts the search query from the triggering URI.

pub mod detection;
pub mod gesture;
pub mod input;
pub mod trigger;

// Re-export the most-used types at the crate root so callers can write
// `qsbridge_core::Gesture` instead of `qsbridge_core::gesture::Gesture`.
pub use detection::{detect, DetectedHotkeys, DetectionOptions, ExtractionResult, HotkeySlot};
pub use gesture::{contains_os_modifier, map_key_to_code, parse_gesture, Gesture, Modifiers};
pub use input::{
    build_hotkey_batch, build_key_press_batch, build_select_all_batch, build_type_text_batch,
    InputBatch, InputEvent,
};
pub use trigger::parse_trigger_query;
