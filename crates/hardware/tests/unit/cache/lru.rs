//! LRU Replacement Tracker Tests.
//!
//! Exercises `LruTracker` in isolation. The controller never evicts with the
//! default geometry, so victim selection is verified here directly.

use proptest::prelude::*;
use tiercache_core::cache::LruTracker;

/// Initial order is [0, 1, 2, 3]: way 0 is MRU, way 3 is the first victim.
#[test]
fn initial_victim_is_last_way() {
    let lru = LruTracker::new(1, 4);
    assert_eq!(lru.order(0), &[0, 1, 2, 3]);
    assert_eq!(lru.victim(0), 3);
}

/// Touching 0,1,2,3 in order leaves 0 as LRU.
#[test]
fn sequential_touch_reorders() {
    let mut lru = LruTracker::new(1, 4);
    for way in 0..4 {
        lru.touch(0, way);
    }
    assert_eq!(lru.order(0), &[3, 2, 1, 0]);
    assert_eq!(lru.victim(0), 0);
}

/// Re-touching the LRU way promotes it; the next-oldest becomes the victim.
#[test]
fn retouch_promotes_to_mru() {
    let mut lru = LruTracker::new(1, 4);
    for way in 0..4 {
        lru.touch(0, way);
    }
    lru.touch(0, 0);
    assert_eq!(lru.victim(0), 1);
    lru.touch(0, 1);
    assert_eq!(lru.victim(0), 2);
    assert_eq!(lru.order(0), &[1, 0, 3, 2]);
}

/// Touching the MRU way changes nothing.
#[test]
fn touching_mru_is_stable() {
    let mut lru = LruTracker::new(1, 8);
    lru.touch(0, 5);
    let before = lru.order(0).to_vec();
    lru.touch(0, 5);
    assert_eq!(lru.order(0), before.as_slice());
}

/// Sets are tracked independently.
#[test]
fn sets_are_independent() {
    let mut lru = LruTracker::new(2, 4);
    for way in 0..4 {
        lru.touch(0, way);
    }
    assert_eq!(lru.victim(0), 0);
    assert_eq!(lru.victim(1), 3);

    for way in (0..4).rev() {
        lru.touch(1, way);
    }
    assert_eq!(lru.victim(1), 3);
    assert_eq!(lru.victim(0), 0);
}

/// Single-way sets always evict way 0.
#[test]
fn direct_mapped_victim() {
    let mut lru = LruTracker::new(4, 1);
    lru.touch(2, 0);
    assert_eq!(lru.victim(2), 0);
}

#[test]
fn reset_restores_every_set() {
    let mut lru = LruTracker::new(3, 8);
    lru.touch(0, 7);
    lru.touch(2, 4);
    lru.reset();
    assert_eq!(lru, LruTracker::new(3, 8));
}

proptest! {
    /// After any access sequence the victim is the way whose latest access is oldest.
    ///
    /// Untouched ways keep their initial age: way `w` starts `w + 1` ticks in the past.
    #[test]
    fn victim_is_least_recently_touched(
        ways in 2usize..=8,
        raw in prop::collection::vec(0usize..8, 0..64),
    ) {
        let mut lru = LruTracker::new(1, ways);
        let mut last_touch: Vec<i64> = (0..ways).map(|w| -(w as i64) - 1).collect();

        for (t, way) in raw.into_iter().map(|w| w % ways).enumerate() {
            lru.touch(0, way);
            last_touch[way] = t as i64;

            let oldest = (0..ways).min_by_key(|&w| last_touch[w]).unwrap();
            prop_assert_eq!(lru.victim(0), oldest);
        }

        let mut order = lru.order(0).to_vec();
        order.sort_unstable();
        prop_assert_eq!(order, (0..ways).collect::<Vec<_>>());
    }
}
