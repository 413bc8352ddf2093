//! Least Recently Used (LRU) Replacement Tracker.
//!
//! Keeps, for every set of a tier, a permutation of way indices ordered from most
//! to least recently used. An access moves its way to the front and keeps the
//! relative order of the others. The back of the permutation is the victim.
//!
//! # Performance
//!
//! - `touch()`: O(W) where W is the associativity
//! - `victim()`: O(1)
//! - Space: O(S × W), stored flat with stride W

/// Per-set recency state for one tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LruTracker {
    /// `sets * ways` entries; set `s` occupies `[s * ways, (s + 1) * ways)`.
    /// Within a set, index 0 is MRU and the last index is LRU.
    order: Vec<usize>,
    ways: usize,
}

impl LruTracker {
    /// Creates a tracker with every set in the initial order `[0, 1, .., ways-1]`.
    ///
    /// # Arguments
    ///
    /// * `sets` - Number of sets in the tier.
    /// * `ways` - Associativity; must be at least 1.
    pub fn new(sets: usize, ways: usize) -> Self {
        let ways = ways.max(1);
        let order = (0..sets).flat_map(|_| 0..ways).collect();
        Self { order, ways }
    }

    /// Number of ways per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// The recency order of `set`, most recent first.
    pub fn order(&self, set: usize) -> &[usize] {
        &self.order[set * self.ways..(set + 1) * self.ways]
    }

    /// Marks `way` in `set` as most recently used.
    pub fn touch(&mut self, set: usize, way: usize) {
        let base = set * self.ways;
        let stack = &mut self.order[base..base + self.ways];
        if let Some(pos) = stack.iter().position(|&w| w == way) {
            stack[..=pos].rotate_right(1);
        }
    }

    /// Returns the least recently used way of `set`.
    pub fn victim(&self, set: usize) -> usize {
        self.order[set * self.ways + self.ways - 1]
    }

    /// Restores every set to the initial order.
    pub fn reset(&mut self) {
        let ways = self.ways;
        for (i, slot) in self.order.iter_mut().enumerate() {
            *slot = i % ways;
        }
    }
}
