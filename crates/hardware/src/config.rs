//! Configuration for the tiered cache model.
//!
//! This module defines the structures that parameterize the hierarchy. It provides:
//! 1. **Defaults:** The four-tier geometry (32, 256, 4096, 65536 slots; 1, 1, 4, 8 ways).
//! 2. **Structures:** Per-tier geometry and the hierarchy-wide widths and fill policy.
//! 3. **Validation:** Rejection of geometries that would overlap or silently truncate.
//!
//! Configuration is fixed at construction. It is deserialized from JSON or taken
//! from `HierarchyConfig::default()`.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::common::bits;
use crate::common::error::ConfigError;

/// Default configuration constants for the hierarchy.
mod defaults {
    /// Width of a request address (64K words, the capacity of the last tier).
    pub const ADDRESS_BITS: u32 = 16;

    /// Width of one line payload.
    pub const DATA_BITS: u32 = 32;

    /// Tier0: 32 direct-mapped slots, 5-bit index.
    pub const T0_SLOTS: usize = 32;
    pub const T0_WAYS: usize = 1;

    /// Tier1: 256 direct-mapped slots, 8-bit index.
    pub const T1_SLOTS: usize = 256;
    pub const T1_WAYS: usize = 1;

    /// Tier2: 4096 slots, 4-way, 10-bit index.
    pub const T2_SLOTS: usize = 4096;
    pub const T2_WAYS: usize = 4;

    /// Tier3: 65536 slots, 8-way, 13-bit index.
    pub const T3_SLOTS: usize = 65536;
    pub const T3_WAYS: usize = 8;
}

/// When a tier is populated from a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum FillPolicy {
    /// Writes that miss every tier are installed in the tier owning their address.
    /// Read misses are answered by the backing store and never installed.
    #[default]
    WriteAllocate,
    /// Read misses are installed in the owning tier as well.
    ///
    /// Classic fill-on-miss caching; opt-in only.
    ReadWriteAllocate,
    /// No tier is ever populated. Every access goes to the backing store.
    Never,
}

impl FillPolicy {
    /// Returns `true` if a completed miss of this kind enters the `Fill` state.
    pub const fn fills(self, is_write: bool) -> bool {
        match self {
            Self::WriteAllocate => is_write,
            Self::ReadWriteAllocate => true,
            Self::Never => false,
        }
    }
}

/// Geometry of a single tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Total number of line slots (power of two).
    pub slots: usize,
    /// Associativity; 1 means direct-mapped.
    #[serde(default = "TierConfig::default_ways")]
    pub ways: usize,
}

impl TierConfig {
    /// Creates a tier geometry.
    pub const fn new(slots: usize, ways: usize) -> Self {
        Self { slots, ways }
    }

    /// Direct-mapped unless stated otherwise.
    const fn default_ways() -> usize {
        1
    }

    /// Number of sets (`slots / ways`).
    pub const fn sets(&self) -> usize {
        self.slots / self.ways
    }

    /// Width of the set index field.
    pub const fn index_bits(&self) -> u32 {
        bits::log2(self.sets())
    }
}

/// Root configuration structure for the hierarchy.
///
/// # Examples
///
/// ```
/// use tiercache_core::config::{FillPolicy, HierarchyConfig};
///
/// let config = HierarchyConfig::default();
/// assert_eq!(config.tiers.len(), 4);
/// assert_eq!(config.tiers[2].index_bits(), 10);
/// assert_eq!(config.fill_policy, FillPolicy::WriteAllocate);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use tiercache_core::config::HierarchyConfig;
///
/// let json = r#"{
///     "address_bits": 12,
///     "fill_policy": "ReadWriteAllocate",
///     "tiers": [
///         { "slots": 16 },
///         { "slots": 4096, "ways": 2 }
///     ]
/// }"#;
///
/// let config: HierarchyConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.data_bits, 32);
/// assert_eq!(config.tiers[1].sets(), 2048);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Width of request addresses. Wider addresses are rejected.
    #[serde(default = "HierarchyConfig::default_address_bits")]
    pub address_bits: u32,

    /// Width of line payloads. Wider write data is rejected.
    #[serde(default = "HierarchyConfig::default_data_bits")]
    pub data_bits: u32,

    /// Which misses populate a tier.
    #[serde(default)]
    pub fill_policy: FillPolicy,

    /// Tiers in probe order, fastest first.
    #[serde(default = "HierarchyConfig::default_tiers")]
    pub tiers: Vec<TierConfig>,
}

impl HierarchyConfig {
    /// Returns the default address width.
    const fn default_address_bits() -> u32 {
        defaults::ADDRESS_BITS
    }

    /// Returns the default payload width.
    const fn default_data_bits() -> u32 {
        defaults::DATA_BITS
    }

    /// Returns the default four-tier geometry.
    fn default_tiers() -> Vec<TierConfig> {
        vec![
            TierConfig::new(defaults::T0_SLOTS, defaults::T0_WAYS),
            TierConfig::new(defaults::T1_SLOTS, defaults::T1_WAYS),
            TierConfig::new(defaults::T2_SLOTS, defaults::T2_WAYS),
            TierConfig::new(defaults::T3_SLOTS, defaults::T3_WAYS),
        ]
    }

    /// Checks every tier geometry and width.
    ///
    /// The last tier must span the whole address space, so every accepted
    /// address has an owning tier.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, in tier order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=64).contains(&self.address_bits) {
            return Err(ConfigError::BadWidth {
                field: "address_bits",
                bits: self.address_bits,
            });
        }
        if !(1..=64).contains(&self.data_bits) {
            return Err(ConfigError::BadWidth {
                field: "data_bits",
                bits: self.data_bits,
            });
        }
        if self.tiers.is_empty() {
            return Err(ConfigError::NoTiers);
        }

        let mut previous = 0usize;
        for (tier, t) in self.tiers.iter().enumerate() {
            if !t.slots.is_power_of_two() {
                return Err(ConfigError::SlotsNotPowerOfTwo {
                    tier,
                    slots: t.slots,
                });
            }
            if t.ways == 0 || t.slots % t.ways != 0 {
                return Err(ConfigError::BadAssociativity {
                    tier,
                    slots: t.slots,
                    ways: t.ways,
                });
            }
            if t.slots <= previous {
                return Err(ConfigError::OverlappingRange {
                    tier,
                    slots: t.slots,
                    previous,
                });
            }
            if !bits::fits(t.slots as u64 - 1, self.address_bits) {
                return Err(ConfigError::AddressSpaceTooSmall {
                    tier,
                    slots: t.slots,
                    address_bits: self.address_bits,
                });
            }
            previous = t.slots;
        }
        if bits::log2(previous) != self.address_bits {
            return Err(ConfigError::AddressSpaceUncovered {
                slots: previous,
                address_bits: self.address_bits,
            });
        }
        Ok(())
    }

    /// Address range owned by `tier`: from the previous tier's slot count up to its own.
    ///
    /// Writes that miss everywhere land in the owning tier.
    pub fn owned_range(&self, tier: usize) -> Range<u64> {
        let start = if tier == 0 {
            0
        } else {
            self.tiers[tier - 1].slots as u64
        };
        start..self.tiers[tier].slots as u64
    }
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            address_bits: defaults::ADDRESS_BITS,
            data_bits: defaults::DATA_BITS,
            fill_policy: FillPolicy::default(),
            tiers: Self::default_tiers(),
        }
    }
}
