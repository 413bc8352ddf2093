//! Tiered lookup cache library.
//!
//! This crate models a hierarchical lookup cache controller with the following:
//! 1. **Tiers:** Independent set-associative line stores, each with its own address
//!    decoding and LRU replacement state.
//! 2. **Controller:** A step-driven state machine that probes tiers fastest-first and
//!    falls back to a backing store when every tier misses.
//! 3. **Backing store:** A request/ready handshake trait and an in-memory model.
//! 4. **Simulation:** Configuration, statistics, and JSON trace replay.
//!
//! ```
//! use tiercache_core::{HierarchyConfig, HierarchyController, HitTier, LatencyStore};
//!
//! let mut cache = HierarchyController::new(HierarchyConfig::default(), LatencyStore::new(2)).unwrap();
//! cache.write(0x10, 0xAB).unwrap();
//! let resp = cache.read(0x10).unwrap();
//! assert_eq!(resp.data, 0xAB);
//! assert_eq!(resp.hit_tier, HitTier::Tier(0));
//! ```

/// Tier line stores, set selection, and replacement tracking.
pub mod cache;
/// Common types (requests, responses, errors, bit helpers).
pub mod common;
/// Hierarchy configuration (defaults, tier geometry, fill policy).
pub mod config;
/// The hierarchy controller state machine.
pub mod controller;
/// Trace loading and replay.
pub mod sim;
/// Cache statistics collection and reporting.
pub mod stats;
/// Backing store handshake and models.
pub mod store;

/// Request, response, and hit-level types.
pub use crate::common::{CacheError, HitTier, Operation, Request, Response};
/// Root configuration type; use `HierarchyConfig::default()` or deserialize from JSON.
pub use crate::config::HierarchyConfig;
/// Main controller type; owns every tier and the backing store.
pub use crate::controller::{ControllerState, HierarchyController};
/// Backing store trait and the fixed-latency model.
pub use crate::store::{BackingStore, LatencyStore};
