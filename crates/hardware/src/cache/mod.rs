//! Tiered Line Store.
//!
//! This module implements one level of the lookup hierarchy: a set-associative
//! array of tagged, valid-flagged lines with its own address decoding and, for
//! associative tiers, its own LRU replacement state. Tiers share nothing; the
//! controller owns an ordered list of them and probes them one at a time.

/// Least-recently-used replacement tracker.
pub mod lru;

/// Address to `(set, tag)` decoding.
pub mod selector;

use std::ops::Range;

use tracing::{debug, trace, warn};

pub use self::lru::LruTracker;
pub use self::selector::{SetIndex, SetSelector};
use crate::config::TierConfig;

/// A single cache line: tag, validity, and payload.
///
/// Invalid lines are empty and never match a tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Line {
    /// Address-derived tag.
    pub tag: u64,
    /// Whether the line holds data.
    pub valid: bool,
    /// Stored payload.
    pub data: u64,
}

impl Line {
    /// Returns `true` if this line is valid and carries `tag`.
    #[inline(always)]
    pub const fn matches(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }
}

/// A line displaced by [`Tier::fill`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eviction {
    /// Address the evicted line was holding.
    pub address: u64,
    /// Payload that was dropped.
    pub data: u64,
}

/// One level of the hierarchy.
///
/// Direct-mapped tiers (`ways == 1`) keep no recency state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tier {
    level: usize,
    lines: Vec<Line>,
    sets: usize,
    ways: usize,
    selector: SetSelector,
    recency: Option<LruTracker>,
    owned: Range<u64>,
}

impl Tier {
    /// Creates an empty tier.
    ///
    /// # Arguments
    ///
    /// * `level` - Position in the probe order (0 is fastest).
    /// * `config` - Validated geometry for this tier.
    /// * `address_bits` - Width of the request address space.
    /// * `owned` - Address range whose write misses land in this tier.
    pub fn new(level: usize, config: &TierConfig, address_bits: u32, owned: Range<u64>) -> Self {
        let ways = config.ways.max(1);
        let sets = (config.slots / ways).max(1);
        Self {
            level,
            lines: vec![Line::default(); sets * ways],
            sets,
            ways,
            selector: SetSelector::new(sets, address_bits),
            recency: (ways > 1).then(|| LruTracker::new(sets, ways)),
            owned,
        }
    }

    /// Position in the probe order.
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// The tier's address decoder.
    pub const fn selector(&self) -> &SetSelector {
        &self.selector
    }

    /// Recency state, present only for associative tiers.
    pub const fn recency(&self) -> Option<&LruTracker> {
        self.recency.as_ref()
    }

    /// Addresses whose write misses are allocated here.
    pub const fn owned_range(&self) -> &Range<u64> {
        &self.owned
    }

    /// Returns `true` if `address` falls in this tier's owned range.
    pub fn owns(&self, address: u64) -> bool {
        self.owned.contains(&address)
    }

    /// The lines of `set`, in way order.
    pub fn set(&self, set: usize) -> &[Line] {
        &self.lines[set * self.ways..(set + 1) * self.ways]
    }

    /// Number of valid lines in the whole tier.
    pub fn occupancy(&self) -> usize {
        self.lines.iter().filter(|l| l.valid).count()
    }

    /// Finds the way holding `tag` in `set` without touching recency.
    pub fn probe(&self, set: usize, tag: u64) -> Option<usize> {
        self.set(set).iter().position(|l| l.matches(tag))
    }

    /// Looks up `tag` in `set`.
    ///
    /// On a hit the matched way becomes most recently used.
    pub fn lookup(&mut self, set: usize, tag: u64) -> Option<u64> {
        let way = self.probe(set, tag)?;
        self.touch(set, way);
        let data = self.lines[set * self.ways + way].data;
        trace!(tier = self.level, set, way, "lookup hit");
        Some(data)
    }

    /// Overwrites the payload of the line holding `tag` in `set`.
    ///
    /// Returns `false` and changes nothing on a miss. A hit becomes most recently used.
    pub fn write(&mut self, set: usize, tag: u64, data: u64) -> bool {
        let Some(way) = self.probe(set, tag) else {
            return false;
        };
        self.lines[set * self.ways + way].data = data;
        self.touch(set, way);
        trace!(tier = self.level, set, way, data, "write hit");
        true
    }

    /// Installs `(tag, data)` into `set`.
    ///
    /// Reuses the way already holding `tag`, otherwise the first invalid way,
    /// otherwise the LRU victim. Returns the displaced line, if a valid one was evicted.
    pub fn fill(&mut self, set: usize, tag: u64, data: u64) -> Option<Eviction> {
        let lines = self.set(set);
        let way = lines
            .iter()
            .position(|l| l.matches(tag))
            .or_else(|| lines.iter().position(|l| !l.valid))
            .unwrap_or_else(|| self.recency.as_ref().map_or(0, |r| r.victim(set)));

        let idx = set * self.ways + way;
        let old = self.lines[idx];
        let evicted = (old.valid && old.tag != tag).then(|| Eviction {
            address: self.selector.address_of(set, old.tag),
            data: old.data,
        });
        if let Some(e) = &evicted {
            warn!(tier = self.level, set, way, address = e.address, "evicting line");
        }

        self.lines[idx] = Line {
            tag,
            valid: true,
            data,
        };
        self.touch(set, way);
        debug!(tier = self.level, set, way, tag, "line filled");
        evicted
    }

    /// Invalidates every line and restores the initial recency order.
    pub fn invalidate_all(&mut self) {
        self.lines.fill(Line::default());
        if let Some(r) = &mut self.recency {
            r.reset();
        }
    }

    #[inline]
    fn touch(&mut self, set: usize, way: usize) {
        if let Some(r) = &mut self.recency {
            r.touch(set, way);
        }
    }
}
