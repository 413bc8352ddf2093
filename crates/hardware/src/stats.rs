//! Cache statistics collection and reporting.
//!
//! This module tracks the observable behaviour of the hierarchy. It provides:
//! 1. **Requests:** Totals by operation and the number of controller steps.
//! 2. **Cascade:** Per-tier probe and hit counters, which expose the strict probe order.
//! 3. **Backing store:** Requests issued, steps spent waiting, fills, and evictions.

use std::time::Instant;

use serde::Serialize;

use crate::common::data::HitTier;

/// Statistics gathered by a [`HierarchyController`](crate::controller::HierarchyController).
#[derive(Clone, Debug, Serialize)]
pub struct HierarchyStats {
    #[serde(skip)]
    start_time: Instant,
    /// Controller steps executed.
    pub steps: u64,
    /// Requests completed.
    pub requests: u64,
    /// Read requests completed.
    pub reads: u64,
    /// Write requests completed.
    pub writes: u64,
    /// Lookups performed at each tier, in probe order.
    pub tier_probes: Vec<u64>,
    /// Hits at each tier.
    pub tier_hits: Vec<u64>,
    /// Requests that missed every tier.
    pub misses: u64,
    /// Requests driven to the backing store.
    pub store_requests: u64,
    /// Steps spent in `BackingStoreWait` with the store not ready.
    pub store_wait_steps: u64,
    /// Lines installed by the fill state.
    pub fills: u64,
    /// Valid lines displaced by fills.
    pub evictions: u64,
}

/// Section names for selective stats output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "tiers", "store"];

impl HierarchyStats {
    /// Creates zeroed statistics for a hierarchy with `tiers` levels.
    pub fn new(tiers: usize) -> Self {
        Self {
            start_time: Instant::now(),
            steps: 0,
            requests: 0,
            reads: 0,
            writes: 0,
            tier_probes: vec![0; tiers],
            tier_hits: vec![0; tiers],
            misses: 0,
            store_requests: 0,
            store_wait_steps: 0,
            fills: 0,
            evictions: 0,
        }
    }

    /// Records a completed request.
    pub(crate) fn record_response(&mut self, is_write: bool, hit: HitTier) {
        self.requests += 1;
        if is_write {
            self.writes += 1;
        } else {
            self.reads += 1;
        }
        match hit {
            HitTier::Tier(level) => self.tier_hits[level] += 1,
            HitTier::Miss => self.misses += 1,
        }
    }

    /// Fraction of probes at `tier` that hit, in percent. Zero when never probed.
    pub fn hit_rate(&self, tier: usize) -> f64 {
        let probes = self.tier_probes.get(tier).copied().unwrap_or(0);
        let hits = self.tier_hits.get(tier).copied().unwrap_or(0);
        if probes == 0 {
            0.0
        } else {
            (hits as f64 / probes as f64) * 100.0
        }
    }

    /// Average steps per completed request.
    pub fn steps_per_request(&self) -> f64 {
        let req = self.requests.max(1);
        self.steps as f64 / req as f64
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of `"summary"`, `"tiers"`, or `"store"`.
    /// Pass an empty slice to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();

        if want("summary") {
            println!("\n==========================================================");
            println!("TIERED CACHE STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_steps                {}", self.steps);
            println!("sim_requests             {}", self.requests);
            println!("  op.read                {}", self.reads);
            println!("  op.write               {}", self.writes);
            println!("sim_steps_per_request    {:.4}", self.steps_per_request());
            println!("----------------------------------------------------------");
        }
        if want("tiers") {
            println!("HIT CASCADE");
            for (tier, (&probes, &hits)) in
                self.tier_probes.iter().zip(&self.tier_hits).enumerate()
            {
                println!(
                    "  T{:<5} probes: {:<10} | hits: {:<10} | hit_rate: {:.2}%",
                    tier,
                    probes,
                    hits,
                    self.hit_rate(tier)
                );
            }
            println!("  miss   {}", self.misses);
            println!("----------------------------------------------------------");
        }
        if want("store") {
            println!("BACKING STORE");
            println!("  store.requests         {}", self.store_requests);
            println!("  store.wait_steps       {}", self.store_wait_steps);
            println!("  fill.lines             {}", self.fills);
            println!("  fill.evictions         {}", self.evictions);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

impl Default for HierarchyStats {
    fn default() -> Self {
        Self::new(0)
    }
}
