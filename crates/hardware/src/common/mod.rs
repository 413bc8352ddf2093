//! Common utilities and types used throughout the cache model.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Bit Helpers:** Masking and width checks for address and payload decoding.
//! 2. **Access Types:** Requests, operations, responses, and hit levels.
//! 3. **Error Handling:** The request, configuration, and replay error taxonomy.

/// Bit masking and width helpers.
pub mod bits;

/// Request, response, and hit-level definitions.
pub mod data;

/// Error types.
pub mod error;

pub use data::{HitTier, Operation, Request, Response};
pub use error::{CacheError, ConfigError};
