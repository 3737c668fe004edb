//! Persistent agent configuration.

pub mod config;
