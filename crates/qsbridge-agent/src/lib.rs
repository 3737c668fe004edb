//! qsbridge-agent library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does qsbridge-agent do? (for beginners)
//!
//! The agent is launched by the OS whenever a `playnite://quicksearch...` URI
//! is opened (from a browser bookmark, a stream deck button, a script).  It:
//!
//! 1. Extracts the query from the URI (`qsbridge_core::trigger`).
//! 2. Finds out which hotkeys open the search overlay, by scanning the
//!    overlay's settings on disk once and caching the result.
//! 3. Presses the global hotkey if one is known; otherwise brings the host
//!    window to the front and presses the in-app hotkey.
//! 4. Selects whatever is already in the overlay's text box and types the
//!    query over it, optionally pressing Enter.
//!
//! Every keystroke is synthesized through the OS input queue (`SendInput`
//! on Windows).  Nothing is pasted and no window messages are posted.

/// Application layer: use cases for the agent.
pub mod application;

/// Command-line definition.
pub mod cli;

/// Infrastructure layer: OS adapters and configuration storage.
pub mod infrastructure;
