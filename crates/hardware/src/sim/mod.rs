//! Simulation utilities.
//!
//! Provides trace and configuration loading and in-order trace replay.

/// Trace/config file loading and replay.
pub mod trace;

pub use trace::{load_config, load_trace, parse_trace, replay};
