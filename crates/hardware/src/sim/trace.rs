//! Trace and configuration loading.
//!
//! This module provides the file-facing side of a simulation run. It performs:
//! 1. **Trace loading:** Reads a JSON array of requests from disk or from a string.
//! 2. **Config loading:** Reads a `HierarchyConfig` from a JSON file and validates it.
//! 3. **Replay:** Submits every request of a trace, in order, to a controller.
//!
//! Trace format:
//!
//! ```json
//! [
//!   { "op": "Write", "address": 16, "data": 171 },
//!   { "op": "Read",  "address": 16 }
//! ]
//! ```

use std::fs;
use std::path::Path;

use tracing::info;

use crate::common::data::{Request, Response};
use crate::common::error::CacheError;
use crate::config::HierarchyConfig;
use crate::controller::HierarchyController;
use crate::store::BackingStore;

/// Parses a trace from a JSON string.
///
/// # Errors
///
/// [`CacheError::Trace`] if the text is not an array of requests.
pub fn parse_trace(text: &str) -> Result<Vec<Request>, CacheError> {
    Ok(serde_json::from_str(text)?)
}

/// Loads a trace file from disk.
///
/// # Errors
///
/// [`CacheError::Io`] if the file cannot be read, [`CacheError::Trace`] if it is malformed.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<Request>, CacheError> {
    let path = path.as_ref();
    let requests = parse_trace(&fs::read_to_string(path)?)?;
    info!(path = %path.display(), requests = requests.len(), "trace loaded");
    Ok(requests)
}

/// Loads and validates a hierarchy configuration file.
///
/// # Errors
///
/// I/O and format errors as for [`load_trace`], plus [`CacheError::Config`].
pub fn load_config(path: impl AsRef<Path>) -> Result<HierarchyConfig, CacheError> {
    let config: HierarchyConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
    config.validate()?;
    Ok(config)
}

/// Submits every request in order and collects the responses.
///
/// Stops at the first rejected request.
///
/// # Errors
///
/// The first error returned by [`HierarchyController::submit`].
pub fn replay<S: BackingStore>(
    controller: &mut HierarchyController<S>,
    trace: &[Request],
) -> Result<Vec<Response>, CacheError> {
    trace.iter().map(|&req| controller.submit(req)).collect()
}
