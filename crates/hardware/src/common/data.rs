//! Request and Response Types.
//!
//! This module defines the values exchanged between the requester and the cache controller.
//! They are used for the following:
//! 1. **Requests:** Classifying an access as a read or a write and carrying its payload.
//! 2. **Responses:** Reporting the returned data and the tier that satisfied the access.
//! 3. **Trace Replay:** Requests deserialize directly from JSON traces.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of cache access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Data read access.
    ///
    /// Hits short-circuit the cascade; a total miss is answered by the backing store.
    Read,

    /// Data write access.
    ///
    /// Always forwarded to the backing store (write-through), regardless of hit level.
    Write,
}

/// A single access submitted to the hierarchy controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Word address being accessed.
    pub address: u64,
    /// Read or write.
    pub op: Operation,
    /// Payload for writes; ignored for reads.
    #[serde(default)]
    pub data: u64,
}

impl Request {
    /// Creates a read request for `address`.
    #[inline]
    pub const fn read(address: u64) -> Self {
        Self {
            address,
            op: Operation::Read,
            data: 0,
        }
    }

    /// Creates a write request storing `data` at `address`.
    #[inline]
    pub const fn write(address: u64, data: u64) -> Self {
        Self {
            address,
            op: Operation::Write,
            data,
        }
    }

    /// Returns `true` for write requests.
    #[inline]
    pub const fn is_write(&self) -> bool {
        matches!(self.op, Operation::Write)
    }
}

/// The level that satisfied an access.
///
/// This value is load-bearing for telemetry: it exposes the latency class of every
/// response, since tiers are always probed in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitTier {
    /// The access hit the tier with this index (0 is the fastest).
    Tier(usize),
    /// Every tier missed; the backing store answered.
    Miss,
}

impl HitTier {
    /// Returns the tier index on a hit, `None` on a miss.
    pub const fn level(self) -> Option<usize> {
        match self {
            Self::Tier(level) => Some(level),
            Self::Miss => None,
        }
    }

    /// Returns `true` if some tier satisfied the access.
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Tier(_))
    }
}

impl fmt::Display for HitTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tier(level) => write!(f, "T{level}"),
            Self::Miss => write!(f, "MISS"),
        }
    }
}

/// Completed access returned to the requester.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Read data, or the written payload for writes.
    pub data: u64,
    /// Where the access was satisfied.
    pub hit_tier: HitTier,
}
