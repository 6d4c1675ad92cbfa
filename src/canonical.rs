//! Fingerprints for snapshots, layers and zoom policies.
//!
//! Three ids are derived here:
//!
//! - `GraphSnapshot::snapshot_id`: sorted node ids and edge pairs
//! - `GraphLayer::fingerprint`: per-slot id string, rank and weighted
//!   successors, so two layers compare equal only if their structure does
//! - `ZoomPolicy::params_hash`: quantized policy parameters
//!
//! Each is xxh64 over compact JSON of tuples and vectors. Nothing hashed
//! here is a `HashMap`, so element order is slot or sort order.

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Compact JSON bytes of a fingerprint input.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("canonical serialization of plain data")
}

/// xxh64 (seed 0) of [`to_canonical_bytes`].
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Fingerprint as the 16-digit hex string stored on snapshots and layers.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}
