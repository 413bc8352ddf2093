//! Set Selector.
//!
//! Splits a word address into a tier-local set index and tag. Each tier owns its
//! own selector; no decode logic is shared, since tier capacities differ by orders
//! of magnitude and therefore use different address slices.
//!
//! ```text
//!   address_bits-1            index_bits   0
//!  +---------------------------+------------+
//!  |           tag             | set index  |
//!  +---------------------------+------------+
//! ```

use crate::common::bits;
use crate::common::error::CacheError;

/// Decoded position of an address within one tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetIndex {
    /// Set within the tier.
    pub set: usize,
    /// Tag stored alongside the line.
    pub tag: u64,
}

/// Fixed-width address decoder for one tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetSelector {
    index_bits: u32,
    tag_bits: u32,
}

impl SetSelector {
    /// Creates a selector for a tier with `sets` sets in an `address_bits`-wide space.
    ///
    /// `sets` must be a power of two no larger than the address space; the
    /// configuration is validated before any selector is built.
    pub const fn new(sets: usize, address_bits: u32) -> Self {
        let index_bits = bits::log2(sets);
        Self {
            index_bits,
            tag_bits: address_bits.saturating_sub(index_bits),
        }
    }

    /// Width of the set index field.
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Width of the tag field.
    pub const fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Total decoded width.
    pub const fn address_bits(&self) -> u32 {
        self.index_bits + self.tag_bits
    }

    /// Decodes `address` into `(set, tag)`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::AddressOutOfRange`] if the address has bits above the
    /// decoded width. The high bits are never dropped.
    #[inline]
    pub const fn select(&self, address: u64) -> Result<SetIndex, CacheError> {
        let width = self.address_bits();
        if !bits::fits(address, width) {
            return Err(CacheError::AddressOutOfRange {
                address,
                bits: width,
            });
        }
        Ok(SetIndex {
            set: (address & bits::mask(self.index_bits)) as usize,
            tag: if self.index_bits >= 64 {
                0
            } else {
                address >> self.index_bits
            },
        })
    }

    /// Rebuilds the address held by a line at `set` with `tag`.
    #[inline]
    pub const fn address_of(&self, set: usize, tag: u64) -> u64 {
        if self.index_bits >= 64 {
            set as u64
        } else {
            (tag << self.index_bits) | set as u64
        }
    }
}
