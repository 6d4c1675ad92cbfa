//! Zoom Report Binary
//!
//! Builds the zoom stack for a JSON snapshot and logs one summary line per
//! level.
//!
//! ## Configuration
//!
//! Arguments:
//! - `<snapshot.json>`: a `SnapshotInput` document (required)
//! - `[policy.json]`: a `ZoomPolicy` document (default policy when omitted)
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! LOG_FORMAT=pretty cargo run --bin zoom_report --features cli -- graph.json policy.json
//! ```

use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pangraph_kernel::{GraphSnapshot, SnapshotInput, ZoomPolicy, ZoomStack};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "zoom_report=info,pangraph_kernel=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).flatten_event(true))
            .init();
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(snapshot_path) = args.next() else {
        warn!("usage: zoom_report <snapshot.json> [policy.json]");
        return Err("missing snapshot path".into());
    };

    let policy = match args.next() {
        Some(path) => read_json::<ZoomPolicy>(Path::new(&path))?,
        None => ZoomPolicy::default(),
    };
    info!(
        policy_id = policy.policy_id(),
        params_hash = %policy.params_hash(),
        groups = policy.groups.len(),
        "Policy loaded"
    );

    let input: SnapshotInput = read_json(Path::new(&snapshot_path))?;
    let snapshot = match GraphSnapshot::from_input(input) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(error = %e, path = %snapshot_path, "Invalid snapshot");
            return Err(e.into());
        }
    };
    info!(
        snapshot_id = snapshot.snapshot_id(),
        nodes = snapshot.num_nodes(),
        edges = snapshot.num_edges(),
        genomes = snapshot.genomes().len(),
        "Snapshot loaded"
    );

    let start = Instant::now();
    let stack = ZoomStack::build(&snapshot, &policy)?;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    for (level, layer) in stack.levels().iter().enumerate() {
        info!(
            level,
            wrappers = layer.len(),
            longest_path = layer.longest_path(),
            size = layer.size(),
            base_pairs = layer.total_base_pairs(),
            fingerprint = %layer.fingerprint(),
            "Zoom level"
        );
    }

    info!(
        levels = stack.len(),
        reached_fixpoint = stack.reached_fixpoint(),
        latency_ms = elapsed_ms,
        "Zoom report complete"
    );

    Ok(())
}
