//! Backing store handshake.
//!
//! This module defines the contract between the hierarchy controller and the
//! external store consulted on a total miss. It provides:
//! 1. **Request:** `request` is asserted for exactly one controller step on entry to
//!    `BackingStoreRequest`, carrying the address, operation, and write data.
//! 2. **Response:** `poll` is sampled once per step while the controller sits in
//!    `BackingStoreWait`; it advances only on the step where `ready` is observed.
//! 3. **Models:** `LatencyStore`, an in-memory store that answers after a fixed delay.
//!
//! The controller never times out on the store. A store that never becomes ready
//! stalls the controller indefinitely.

/// Fixed-latency in-memory store.
pub mod latency;

pub use latency::LatencyStore;

use crate::common::data::Operation;

/// A request driven to the backing store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreRequest {
    /// Word address.
    pub address: u64,
    /// Read or write.
    pub op: Operation,
    /// Payload for writes; zero for reads.
    pub data: u64,
}

/// The store's response lines, sampled each wait step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStatus {
    /// Response valid this step.
    pub ready: bool,
    /// Read data; meaningful only when `ready` is set.
    pub data: u64,
}

impl StoreStatus {
    /// Not ready yet.
    pub const PENDING: Self = Self {
        ready: false,
        data: 0,
    };

    /// Ready with `data`.
    pub const fn ready(data: u64) -> Self {
        Self { ready: true, data }
    }
}

/// External store reached on a miss at every tier, and on every write.
pub trait BackingStore {
    /// Latches a new request. Called once per store transaction.
    fn request(&mut self, req: StoreRequest);

    /// Samples the ready/data lines. Called once per step while waiting.
    fn poll(&mut self) -> StoreStatus;
}

impl<S: BackingStore + ?Sized> BackingStore for Box<S> {
    fn request(&mut self, req: StoreRequest) {
        (**self).request(req);
    }

    fn poll(&mut self) -> StoreStatus {
        (**self).poll()
    }
}
