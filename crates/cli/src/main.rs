//! Tiered cache simulator CLI.
//!
//! This binary drives the hierarchy controller from the command line. It performs:
//! 1. **Trace replay:** Runs a JSON request trace against an in-memory backing store
//!    and prints per-request hit levels and the statistics table.
//! 2. **Demo:** Runs the built-in write/read/miss scenario on the default geometry.
//!
//! Logging goes through `tracing`; set `RUST_LOG=tiercache_core=debug` to see state
//! transitions and fills.

use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use tiercache_core::sim::{load_config, load_trace};
use tiercache_core::stats::HierarchyStats;
use tiercache_core::{
    CacheError, HierarchyConfig, HierarchyController, LatencyStore, Request, Response,
};

#[derive(Parser, Debug)]
#[command(
    name = "tiercache",
    author,
    version,
    about = "Four-tier lookup cache model",
    long_about = "Replay a request trace through the tiered cache, or run the built-in demo.\n\nExamples:\n  tiercache run -t trace.json\n  tiercache run -t trace.json -c hierarchy.json --latency 20 --json\n  tiercache demo"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON trace of requests.
    Run {
        /// Trace file: a JSON array of `{ "op", "address", "data" }` objects.
        #[arg(short, long)]
        trace: String,

        /// Hierarchy configuration (JSON). Defaults to the four-tier geometry.
        #[arg(short, long)]
        config: Option<String>,

        /// Backing store latency in controller steps.
        #[arg(long, default_value_t = 10)]
        latency: u64,

        /// Per-request step budget; requests exceeding it fail instead of blocking.
        #[arg(long)]
        max_steps: Option<u64>,

        /// Print each response.
        #[arg(short, long)]
        verbose: bool,

        /// Emit statistics as JSON instead of the table.
        #[arg(long)]
        json: bool,

        /// Statistics sections to print (summary, tiers, store). Default: all.
        #[arg(long, value_delimiter = ',')]
        sections: Vec<String>,
    },

    /// Write 0xAB to 0x10, read it back, then read an unwritten Tier2 address.
    Demo {
        /// Backing store latency in controller steps.
        #[arg(long, default_value_t = 4)]
        latency: u64,
    },
}

#[derive(Serialize)]
struct Report<'a> {
    responses: &'a [Response],
    stats: &'a HierarchyStats,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            trace,
            config,
            latency,
            max_steps,
            verbose,
            json,
            sections,
        } => cmd_run(
            &trace,
            config.as_deref(),
            latency,
            max_steps,
            verbose,
            json,
            &sections,
        ),
        Commands::Demo { latency } => cmd_demo(latency),
    };

    if let Err(e) = result {
        error!("{e}");
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Replays `trace_path` and prints the results.
fn cmd_run(
    trace_path: &str,
    config_path: Option<&str>,
    latency: u64,
    max_steps: Option<u64>,
    verbose: bool,
    json: bool,
    sections: &[String],
) -> Result<(), CacheError> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => HierarchyConfig::default(),
    };
    let trace = load_trace(trace_path)?;
    let mut cache = HierarchyController::new(config, LatencyStore::new(latency))?;

    println!("[*] Replaying {} requests from {}", trace.len(), trace_path);
    let mut responses = Vec::with_capacity(trace.len());
    for req in &trace {
        let resp = match max_steps {
            Some(budget) => cache.submit_within(*req, budget)?,
            None => cache.submit(*req)?,
        };
        if verbose {
            print_response(req, &resp);
        }
        responses.push(resp);
    }

    if json {
        let report = Report {
            responses: &responses,
            stats: &cache.stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        cache.stats.print_sections(sections);
    }
    Ok(())
}

/// Runs the fixed demonstration scenario.
fn cmd_demo(latency: u64) -> Result<(), CacheError> {
    let mut cache = HierarchyController::new(HierarchyConfig::default(), LatencyStore::new(latency))?;

    for req in [
        Request::write(0x10, 0xAB),
        Request::read(0x10),
        Request::read(0x400),
    ] {
        let resp = cache.submit(req)?;
        print_response(&req, &resp);
    }
    cache.stats.print();
    Ok(())
}

fn print_response(req: &Request, resp: &Response) {
    println!(
        "  {:<5} {:#06x}  data={:#x}  hit={}",
        format!("{:?}", req.op),
        req.address,
        resp.data,
        resp.hit_tier
    );
}
