//! Infrastructure layer: OS adapters and configuration storage.

pub mod host_window;
pub mod input_injection;
pub mod storage;
