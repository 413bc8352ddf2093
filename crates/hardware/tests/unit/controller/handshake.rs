//! Backing Store Handshake Tests.
//!
//! The store request is asserted for exactly one step; the ready line is then
//! sampled once per step. Every write is forwarded regardless of hit level.

use mockall::Sequence;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use tiercache_core::store::{StoreRequest, StoreStatus};
use tiercache_core::{CacheError, ControllerState, HitTier, Operation, Request};

use crate::common::harness::{cache_with, default_cache};
use crate::common::mocks::store::{MockStore, StalledStore};
use tiercache_core::config::HierarchyConfig;

/// A write that misses everywhere is forwarded once.
#[test]
fn write_miss_forwards_exactly_once() {
    let mut store = MockStore::new();
    let _ = store
        .expect_request()
        .with(eq(StoreRequest {
            address: 0x20,
            op: Operation::Write,
            data: 0x5A,
        }))
        .times(1)
        .return_const(());
    let _ = store.expect_poll().return_const(StoreStatus::ready(0));

    let mut cache = cache_with(HierarchyConfig::default(), store);
    let resp = cache.write(0x20, 0x5A).unwrap();
    assert_eq!(resp.hit_tier, HitTier::Miss);
    assert_eq!(resp.data, 0x5A);
}

/// A write that hits Tier1 is still forwarded once (write-through).
#[test]
fn write_hit_still_forwards() {
    let mut store = MockStore::new();
    let _ = store.expect_request().times(2).return_const(());
    let _ = store.expect_poll().return_const(StoreStatus::ready(0));

    let mut cache = cache_with(HierarchyConfig::default(), store);
    let _ = cache.write(0x40, 1).unwrap();
    let hit = cache.write(0x40, 2).unwrap();
    assert_eq!(hit.hit_tier, HitTier::Tier(1));
    assert_eq!(cache.read(0x40).unwrap().data, 2);
}

/// Read hits never touch the store.
#[test]
fn read_hit_skips_store() {
    let mut store = MockStore::new();
    let mut seq = Sequence::new();
    let _ = store
        .expect_request()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    let _ = store
        .expect_poll()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(StoreStatus::ready(0));

    let mut cache = cache_with(HierarchyConfig::default(), store);
    let _ = cache.write(0x1000, 9).unwrap();
    for _ in 0..3 {
        assert_eq!(cache.read(0x1000).unwrap().hit_tier, HitTier::Tier(3));
    }
}

/// Read misses return whatever the store drives on its data lines.
#[test]
fn read_miss_returns_store_data() {
    let mut store = MockStore::new();
    let _ = store
        .expect_request()
        .with(eq(StoreRequest {
            address: 0x2000,
            op: Operation::Read,
            data: 0,
        }))
        .times(1)
        .return_const(());
    let mut polls = 0;
    let _ = store.expect_poll().times(4).returning(move || {
        polls += 1;
        if polls < 4 {
            StoreStatus::PENDING
        } else {
            StoreStatus::ready(0xBEEF)
        }
    });

    let mut cache = cache_with(HierarchyConfig::default(), store);
    let resp = cache.read(0x2000).unwrap();
    assert_eq!(resp.data, 0xBEEF);
    assert_eq!(resp.hit_tier, HitTier::Miss);
    assert_eq!(cache.stats.store_wait_steps, 3);
}

/// Every write produces one store request; reads produce one only on a miss.
#[test]
fn request_count_matches_writes_and_read_misses() {
    let mut cache = default_cache(1);
    let _ = cache.write(0x10, 1).unwrap(); // miss, forwarded
    let _ = cache.write(0x10, 2).unwrap(); // T0 hit, forwarded
    let _ = cache.read(0x10).unwrap(); // T0 hit
    let _ = cache.read(0x11).unwrap(); // miss, forwarded
    let _ = cache.write(0x500, 3).unwrap(); // miss, forwarded

    let ops: Vec<Operation> = cache.store().log.iter().map(|r| r.op).collect();
    assert_eq!(
        ops,
        vec![
            Operation::Write,
            Operation::Write,
            Operation::Read,
            Operation::Write
        ]
    );
    assert_eq!(cache.stats.store_requests, 4);
}

/// `store_request` is visible only on the step that enters the wait.
#[test]
fn request_asserted_for_one_step() {
    let mut cache = default_cache(2);
    cache.begin(Request::write(0x30, 7)).unwrap();

    let mut asserted = Vec::new();
    while !cache.is_idle() {
        let _ = cache.step();
        asserted.push(cache.store_request().is_some());
    }
    assert_eq!(asserted.iter().filter(|&&a| a).count(), 1);
    assert_eq!(cache.store().log.len(), 1);
    assert_eq!(
        cache.store().log[0],
        StoreRequest {
            address: 0x30,
            op: Operation::Write,
            data: 7
        }
    );
}

/// Wait is sampled once per step until ready is seen.
#[test]
fn ready_is_sampled_every_wait_step() {
    let latency = 5;
    let mut cache = default_cache(latency);
    let _ = cache.read(0x7000).unwrap();
    assert_eq!(cache.store().polls, latency + 1);
    assert_eq!(cache.stats.store_wait_steps, latency);
}

/// A silent store stalls the controller; the bounded wrapper reports it.
#[test]
fn stalled_store_times_out_in_wrapper() {
    let mut cache = cache_with(HierarchyConfig::default(), StalledStore::default());
    let err = cache.submit_within(Request::read(0x100), 50).unwrap_err();
    assert!(matches!(err, CacheError::StoreTimeout { steps: 50 }));

    assert_eq!(cache.state(), ControllerState::BackingStoreWait);
    assert_eq!(cache.store().requests, 1);
    assert!(cache.store().polls > 40);

    // Still waiting: further steps keep polling and stay put.
    assert_eq!(cache.step(), ControllerState::BackingStoreWait);
    assert!(matches!(
        cache.begin(Request::read(0)),
        Err(CacheError::Busy)
    ));

    cache.reset();
    assert!(cache.is_idle());
    assert_eq!(cache.store().requests, 1);
}

/// The wrapper succeeds when the budget covers the store latency.
#[test]
fn bounded_submit_within_budget() {
    let mut cache = default_cache(3);
    // Idle + 4 probes + request + 4 polls.
    let resp = cache.submit_within(Request::read(0x100), 10).unwrap();
    assert_eq!(resp.hit_tier, HitTier::Miss);

    let mut slow = default_cache(3);
    assert!(slow.submit_within(Request::read(0x100), 9).is_err());
}
