//! Cache Error definitions.
//!
//! This module defines the error taxonomy of the cache model. It provides:
//! 1. **Request Errors:** Malformed addresses and payloads, and requests issued while busy.
//! 2. **Configuration Errors:** Tier geometries rejected at construction.
//! 3. **Replay Errors:** I/O and format failures when loading traces and config files.
//!
//! Misses are not errors. A miss at every tier is resolved by the backing store.

use thiserror::Error;

/// Errors reported by the cache controller and its support code.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The address does not decode into the configured address space.
    ///
    /// Raised instead of silently dropping the high bits.
    #[error("address {address:#x} does not fit in {bits} address bits")]
    AddressOutOfRange {
        /// Offending address.
        address: u64,
        /// Configured address width.
        bits: u32,
    },

    /// A write payload is wider than the configured line payload.
    #[error("write data {data:#x} does not fit in {bits} data bits")]
    DataOutOfRange {
        /// Offending payload.
        data: u64,
        /// Configured payload width.
        bits: u32,
    },

    /// A request was submitted while another is still in flight.
    #[error("controller is busy with an outstanding request")]
    Busy,

    /// The bounded submit wrapper gave up waiting on the backing store.
    ///
    /// The controller itself never times out; it is left in `BackingStoreWait`.
    #[error("backing store did not respond within {steps} steps")]
    StoreTimeout {
        /// Step budget that was exhausted.
        steps: u64,
    },

    /// Rejected tier geometry.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Failed to read a trace or configuration file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A trace or configuration file is not valid JSON for the expected shape.
    #[error("malformed trace: {0}")]
    Trace(#[from] serde_json::Error),
}

/// Reasons a [`HierarchyConfig`](crate::config::HierarchyConfig) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The hierarchy has no tiers.
    #[error("at least one tier is required")]
    NoTiers,

    /// Slot counts must be powers of two so index bits are exact.
    #[error("tier {tier}: slot count {slots} is not a power of two")]
    SlotsNotPowerOfTwo {
        /// Tier index.
        tier: usize,
        /// Configured slot count.
        slots: usize,
    },

    /// Associativity must be non-zero, a power of two, and divide the slot count.
    #[error("tier {tier}: associativity {ways} does not evenly divide {slots} slots")]
    BadAssociativity {
        /// Tier index.
        tier: usize,
        /// Configured slot count.
        slots: usize,
        /// Configured associativity.
        ways: usize,
    },

    /// Each tier must be strictly larger than the one before it.
    ///
    /// Ownership ranges are derived from consecutive slot counts and would overlap otherwise.
    #[error("tier {tier}: slot count {slots} must exceed the previous tier's {previous}")]
    OverlappingRange {
        /// Tier index.
        tier: usize,
        /// Configured slot count.
        slots: usize,
        /// Slot count of the preceding tier.
        previous: usize,
    },

    /// The tier's owned range extends beyond the address space.
    #[error("tier {tier}: {slots} slots exceed a {address_bits}-bit address space")]
    AddressSpaceTooSmall {
        /// Tier index.
        tier: usize,
        /// Configured slot count.
        slots: usize,
        /// Configured address width.
        address_bits: u32,
    },

    /// The last tier must own every address up to the top of the address space.
    #[error("last tier has {slots} slots but a {address_bits}-bit address space needs 2^{address_bits}")]
    AddressSpaceUncovered {
        /// Slot count of the last tier.
        slots: usize,
        /// Configured address width.
        address_bits: u32,
    },

    /// Widths must lie in `1..=64`.
    #[error("{field} must be between 1 and 64 bits, got {bits}")]
    BadWidth {
        /// Which width is wrong.
        field: &'static str,
        /// Configured value.
        bits: u32,
    },
}
