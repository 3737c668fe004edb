//! Application layer use cases for the agent.
//!
//! # What use cases does the agent have?
//!
//! - **`inject_input`** – Defines the [`inject_input::InputInjector`]
//!   capability (the OS input-injection facility) and `submit_batch`, which
//!   turns the facility's "accepted count" into a success/failure result.
//!
//! - **`detect_hotkeys`** – Owns the process-wide cache of detected hotkeys
//!   and runs the blocking detection pipeline off the async executor.
//!
//! - **`drive_search`** – The orchestrator: opens the overlay, clears its text
//!   field, types the query, and optionally commits with Enter.

pub mod detect_hotkeys;
pub mod drive_search;
pub mod inject_input;
