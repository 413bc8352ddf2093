//! # Trace Loading Tests
//!
//! JSON trace parsing, config files, and in-order replay.

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;
use tiercache_core::common::ConfigError;
use tiercache_core::sim::{load_config, load_trace, parse_trace, replay};
use tiercache_core::{CacheError, HitTier, Operation, Request, Response};

use crate::common::harness::default_cache;

fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_parse_trace_defaults_data() {
    let trace = parse_trace(
        r#"[
            { "op": "Write", "address": 16, "data": 171 },
            { "op": "Read", "address": 16 }
        ]"#,
    )
    .unwrap();
    assert_eq!(trace, vec![Request::write(16, 171), Request::read(16)]);
    assert_eq!(trace[1].data, 0);
}

#[test]
fn test_parse_empty_trace() {
    assert!(parse_trace("[]").unwrap().is_empty());
}

#[test]
fn test_malformed_trace_is_rejected() {
    let err = parse_trace(r#"[{ "op": "Fetch", "address": 1 }]"#).unwrap_err();
    assert!(matches!(err, CacheError::Trace(_)));

    let err = parse_trace("{ not json").unwrap_err();
    assert!(matches!(err, CacheError::Trace(_)));
}

#[test]
fn test_load_trace_from_file() {
    let file = temp_file(r#"[{ "op": "Read", "address": 4096 }]"#);
    let trace = load_trace(file.path()).unwrap();
    assert_eq!(trace.len(), 1);
    assert_eq!(trace[0].op, Operation::Read);
    assert_eq!(trace[0].address, 4096);
}

#[test]
fn test_missing_trace_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_trace(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CacheError::Io(_)));
}

#[test]
fn test_load_config_validates() {
    let file = temp_file(r#"{ "tiers": [{ "slots": 48 }] }"#);
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(
        err,
        CacheError::Config(ConfigError::SlotsNotPowerOfTwo { tier: 0, slots: 48 })
    ));
}

#[test]
fn test_load_config_accepts_valid_file() {
    let file = temp_file(r#"{ "fill_policy": "Never" }"#);
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.tiers.len(), 4);
}

#[test]
fn test_replay_preserves_order() {
    let trace = parse_trace(
        r#"[
            { "op": "Write", "address": 16, "data": 171 },
            { "op": "Read", "address": 16 },
            { "op": "Read", "address": 1024 }
        ]"#,
    )
    .unwrap();

    let mut cache = default_cache(2);
    let responses = replay(&mut cache, &trace).unwrap();
    assert_eq!(
        responses,
        vec![
            Response {
                data: 171,
                hit_tier: HitTier::Miss
            },
            Response {
                data: 171,
                hit_tier: HitTier::Tier(0)
            },
            Response {
                data: 0,
                hit_tier: HitTier::Miss
            },
        ]
    );
    assert_eq!(cache.stats.requests, 3);
}

#[test]
fn test_replay_stops_at_first_rejection() {
    let trace = vec![
        Request::write(1, 1),
        Request::read(0x1_0000),
        Request::write(2, 2),
    ];
    let mut cache = default_cache(0);
    let err = replay(&mut cache, &trace).unwrap_err();
    assert!(matches!(err, CacheError::AddressOutOfRange { .. }));
    assert_eq!(cache.stats.requests, 1);
    assert_eq!(cache.resident_tier(2).unwrap(), None);
}
