//! Fixed-latency backing store.
//!
//! Word-addressed memory held in a hash map; unwritten words read as zero. Every
//! request becomes ready a fixed number of polls after it is latched.

use std::collections::HashMap;

use tracing::trace;

use super::{BackingStore, StoreRequest, StoreStatus};
use crate::common::data::Operation;

/// In-memory store that answers `latency` polls after each request.
///
/// A latency of 0 is ready on the first poll.
#[derive(Debug, Default, Clone)]
pub struct LatencyStore {
    words: HashMap<u64, u64>,
    latency: u64,
    countdown: u64,
    inflight: Option<StoreRequest>,
    requests: u64,
}

impl LatencyStore {
    /// Creates an empty store.
    ///
    /// # Arguments
    ///
    /// * `latency` - Polls that report not-ready before each response.
    pub fn new(latency: u64) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Reads a word directly, bypassing the handshake.
    pub fn peek(&self, address: u64) -> u64 {
        self.words.get(&address).copied().unwrap_or(0)
    }

    /// Writes a word directly, bypassing the handshake.
    pub fn preload(&mut self, address: u64, data: u64) {
        let _ = self.words.insert(address, data);
    }

    /// Number of requests latched so far.
    pub const fn requests(&self) -> u64 {
        self.requests
    }

    /// Returns `true` while a request is outstanding.
    pub const fn busy(&self) -> bool {
        self.inflight.is_some()
    }
}

impl BackingStore for LatencyStore {
    fn request(&mut self, req: StoreRequest) {
        trace!(address = req.address, op = ?req.op, "store request");
        self.requests += 1;
        self.countdown = self.latency;
        self.inflight = Some(req);
    }

    fn poll(&mut self) -> StoreStatus {
        let Some(req) = self.inflight else {
            return StoreStatus::PENDING;
        };
        if self.countdown > 0 {
            self.countdown -= 1;
            return StoreStatus::PENDING;
        }
        self.inflight = None;
        match req.op {
            Operation::Read => StoreStatus::ready(self.peek(req.address)),
            Operation::Write => {
                self.preload(req.address, req.data);
                StoreStatus::ready(req.data)
            }
        }
    }
}
