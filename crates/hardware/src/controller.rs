//! Hierarchy Controller.
//!
//! This module implements the step-driven state machine that serves one request at
//! a time against the ordered tier list. It performs:
//! 1. **Cascade:** One tier is probed per step, fastest first, with no skipping; the
//!    first read hit completes the request.
//! 2. **Write-through:** Writes update the tier they hit and are always forwarded to
//!    the backing store.
//! 3. **Handshake:** The store request is asserted for exactly one step, then the
//!    ready line is sampled every step until it is observed.
//! 4. **Fill:** Misses selected by the [`FillPolicy`](crate::config::FillPolicy) are installed in the tier that
//!    owns their address once the store has answered.
//!
//! ```text
//!  Idle -> CheckTier(0) -> .. -> CheckTier(N-1) -> BackingStoreRequest
//!    ^        |  read hit             |  write hit        |
//!    +--------+                       +------------------>v
//!    +<------------------ [Fill] <------------------ BackingStoreWait (blocks)
//! ```

use std::fmt;

use tracing::{debug, trace, warn};

use crate::cache::{SetIndex, Tier};
use crate::common::bits;
use crate::common::data::{HitTier, Request, Response};
use crate::common::error::CacheError;
use crate::config::HierarchyConfig;
use crate::stats::HierarchyStats;
use crate::store::{BackingStore, StoreRequest};

/// Controller state. There is no terminal state; it cycles once per request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControllerState {
    /// Waiting for a request.
    Idle,
    /// Probing the tier with this index.
    CheckTier(usize),
    /// Driving the request to the backing store (one step).
    BackingStoreRequest,
    /// Sampling the store's ready line; the only suspension point.
    BackingStoreWait,
    /// Installing the store result in the owning tier.
    Fill,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::CheckTier(n) => write!(f, "CheckTier{n}"),
            Self::BackingStoreRequest => write!(f, "BackingStoreRequest"),
            Self::BackingStoreWait => write!(f, "BackingStoreWait"),
            Self::Fill => write!(f, "Fill"),
        }
    }
}

/// Per-request state latched on `begin`.
#[derive(Clone, Debug)]
struct Inflight {
    req: Request,
    /// `(set, tag)` for every tier, decoded once up front.
    decoded: Vec<SetIndex>,
    /// Tier a write hit, or `Miss`.
    hit: HitTier,
    /// Data to install in `Fill`.
    fill_data: u64,
}

/// Four-tier (by default) lookup cache controller in front of a backing store.
///
/// All tier state is owned here; independent instances share nothing.
#[derive(Debug)]
pub struct HierarchyController<S: BackingStore> {
    config: HierarchyConfig,
    tiers: Vec<Tier>,
    state: ControllerState,
    inflight: Option<Inflight>,
    completed: Option<Response>,
    store: S,
    asserted: Option<StoreRequest>,
    /// Telemetry for every completed request.
    pub stats: HierarchyStats,
}

impl<S: BackingStore> HierarchyController<S> {
    /// Builds a controller with every line invalid.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Config`] if the geometry fails validation.
    pub fn new(config: HierarchyConfig, store: S) -> Result<Self, CacheError> {
        config.validate()?;
        let tiers: Vec<Tier> = config
            .tiers
            .iter()
            .enumerate()
            .map(|(level, t)| Tier::new(level, t, config.address_bits, config.owned_range(level)))
            .collect();
        for t in &tiers {
            debug!(
                tier = t.level(),
                sets = t.sets(),
                ways = t.ways(),
                index_bits = t.selector().index_bits(),
                tag_bits = t.selector().tag_bits(),
                "tier configured"
            );
        }
        Ok(Self {
            stats: HierarchyStats::new(tiers.len()),
            config,
            tiers,
            state: ControllerState::Idle,
            inflight: None,
            completed: None,
            store,
            asserted: None,
        })
    }

    /// Current state.
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// Returns `true` when no request is in flight.
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, ControllerState::Idle) && self.inflight.is_none()
    }

    /// The configuration this controller was built with.
    pub const fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// Tiers in probe order.
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the controller and returns its backing store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// The store request asserted during the last step, if any.
    pub const fn store_request(&self) -> Option<StoreRequest> {
        self.asserted
    }

    /// Latches a request. The next `step` leaves `Idle`.
    ///
    /// # Errors
    ///
    /// - [`CacheError::Busy`] if a request is already in flight.
    /// - [`CacheError::AddressOutOfRange`] if the address is wider than the address space.
    /// - [`CacheError::DataOutOfRange`] if write data is wider than a line payload.
    pub fn begin(&mut self, req: Request) -> Result<(), CacheError> {
        if !self.is_idle() {
            return Err(CacheError::Busy);
        }
        if req.is_write() && !bits::fits(req.data, self.config.data_bits) {
            return Err(CacheError::DataOutOfRange {
                data: req.data,
                bits: self.config.data_bits,
            });
        }
        let decoded = self
            .tiers
            .iter()
            .map(|t| t.selector().select(req.address))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(address = req.address, op = ?req.op, "request accepted");
        self.completed = None;
        self.inflight = Some(Inflight {
            req,
            decoded,
            hit: HitTier::Miss,
            fill_data: 0,
        });
        Ok(())
    }

    /// Performs one state's work and returns the next state.
    ///
    /// In `Idle` with nothing latched this is a no-op.
    pub fn step(&mut self) -> ControllerState {
        self.asserted = None;
        let Some(mut inflight) = self.inflight.take() else {
            return self.state;
        };
        self.stats.steps += 1;
        let req = inflight.req;
        let mut done = None;

        let next = match self.state {
            ControllerState::Idle => ControllerState::CheckTier(0),

            ControllerState::CheckTier(n) => {
                let SetIndex { set, tag } = inflight.decoded[n];
                let tier = &mut self.tiers[n];
                self.stats.tier_probes[n] += 1;
                trace!(tier = n, set, tag, "probe");

                if req.is_write() {
                    if tier.write(set, tag, req.data) {
                        inflight.hit = HitTier::Tier(n);
                        ControllerState::BackingStoreRequest
                    } else {
                        self.after_miss(n)
                    }
                } else if let Some(data) = tier.lookup(set, tag) {
                    done = Some(Response {
                        data,
                        hit_tier: HitTier::Tier(n),
                    });
                    ControllerState::Idle
                } else {
                    self.after_miss(n)
                }
            }

            ControllerState::BackingStoreRequest => {
                let sr = StoreRequest {
                    address: req.address,
                    op: req.op,
                    data: if req.is_write() { req.data } else { 0 },
                };
                self.store.request(sr);
                self.asserted = Some(sr);
                self.stats.store_requests += 1;
                ControllerState::BackingStoreWait
            }

            ControllerState::BackingStoreWait => {
                let status = self.store.poll();
                if status.ready {
                    let data = if req.is_write() { req.data } else { status.data };
                    let fits = bits::fits(data, self.config.data_bits);
                    if !fits {
                        warn!(address = req.address, data, "store data wider than a line; not filled");
                    }
                    let fill = inflight.hit == HitTier::Miss
                        && fits
                        && self.config.fill_policy.fills(req.is_write())
                        && self.owner(req.address).is_some();
                    if fill {
                        inflight.fill_data = data;
                        ControllerState::Fill
                    } else {
                        done = Some(Response {
                            data,
                            hit_tier: inflight.hit,
                        });
                        ControllerState::Idle
                    }
                } else {
                    self.stats.store_wait_steps += 1;
                    ControllerState::BackingStoreWait
                }
            }

            ControllerState::Fill => {
                let data = inflight.fill_data;
                if let Some(level) = self.owner(req.address) {
                    let SetIndex { set, tag } = inflight.decoded[level];
                    self.stats.fills += 1;
                    if self.tiers[level].fill(set, tag, data).is_some() {
                        self.stats.evictions += 1;
                    }
                }
                done = Some(Response {
                    data,
                    hit_tier: HitTier::Miss,
                });
                ControllerState::Idle
            }
        };

        match done {
            Some(resp) => self.complete(&req, resp),
            None => self.inflight = Some(inflight),
        }
        trace!(from = %self.state, to = %next, "step");
        self.state = next;
        next
    }

    /// Returns the response completed by the last step, if any.
    pub const fn take_response(&mut self) -> Option<Response> {
        self.completed.take()
    }

    /// Submits a request and steps until it completes.
    ///
    /// Blocks for as long as the backing store stays not-ready; wrap with
    /// [`submit_within`](Self::submit_within) for a bounded wait.
    ///
    /// # Errors
    ///
    /// Propagates the validation errors of [`begin`](Self::begin).
    pub fn submit(&mut self, req: Request) -> Result<Response, CacheError> {
        self.begin(req)?;
        loop {
            let _ = self.step();
            if let Some(resp) = self.take_response() {
                return Ok(resp);
            }
        }
    }

    /// Submits a request and steps at most `max_steps` times.
    ///
    /// On timeout the request stays in flight: keep calling [`step`](Self::step)
    /// or call [`reset`](Self::reset) to abandon it.
    ///
    /// # Errors
    ///
    /// [`CacheError::StoreTimeout`] when the budget runs out, plus the errors of
    /// [`begin`](Self::begin).
    pub fn submit_within(&mut self, req: Request, max_steps: u64) -> Result<Response, CacheError> {
        self.begin(req)?;
        for _ in 0..max_steps {
            let _ = self.step();
            if let Some(resp) = self.take_response() {
                return Ok(resp);
            }
        }
        warn!(address = req.address, max_steps, state = %self.state, "request timed out");
        Err(CacheError::StoreTimeout { steps: max_steps })
    }

    /// Reads `address` through the hierarchy.
    ///
    /// # Errors
    ///
    /// See [`submit`](Self::submit).
    pub fn read(&mut self, address: u64) -> Result<Response, CacheError> {
        self.submit(Request::read(address))
    }

    /// Writes `data` to `address` through the hierarchy.
    ///
    /// # Errors
    ///
    /// See [`submit`](Self::submit).
    pub fn write(&mut self, address: u64, data: u64) -> Result<Response, CacheError> {
        self.submit(Request::write(address, data))
    }

    /// First tier holding a valid line for `address`, without side effects.
    ///
    /// # Errors
    ///
    /// [`CacheError::AddressOutOfRange`] for addresses outside the address space.
    pub fn resident_tier(&self, address: u64) -> Result<Option<usize>, CacheError> {
        for t in &self.tiers {
            let SetIndex { set, tag } = t.selector().select(address)?;
            if t.probe(set, tag).is_some() {
                return Ok(Some(t.level()));
            }
        }
        Ok(None)
    }

    /// Invalidates every line in every tier and returns to `Idle`.
    ///
    /// Any in-flight request is dropped. The backing store and the
    /// statistics are left untouched.
    pub fn reset(&mut self) {
        for t in &mut self.tiers {
            t.invalidate_all();
        }
        self.state = ControllerState::Idle;
        self.inflight = None;
        self.completed = None;
        self.asserted = None;
        debug!("controller reset");
    }

    fn after_miss(&self, n: usize) -> ControllerState {
        if n + 1 < self.tiers.len() {
            ControllerState::CheckTier(n + 1)
        } else {
            ControllerState::BackingStoreRequest
        }
    }

    fn owner(&self, address: u64) -> Option<usize> {
        self.tiers.iter().position(|t| t.owns(address))
    }

    fn complete(&mut self, req: &Request, resp: Response) {
        self.stats.record_response(req.is_write(), resp.hit_tier);
        debug!(address = req.address, hit = %resp.hit_tier, data = resp.data, "request complete");
        self.completed = Some(resp);
    }
}
