//! # pangraph-kernel
//!
//! Longest-path layering and lossless compaction for pangenome alignment
//! graphs.
//!
//! The kernel answers one question:
//!
//! > Given an alignment graph, what does it look like at every zoom level?
//!
//! ## Core Contract
//!
//! 1. Wrap each aligned segment of a [`GraphSnapshot`] in a leaf [`Wrapper`]
//! 2. Rank every wrapper by its longest path from any source
//! 3. Collapse singly-linked chains into composites until nothing changes,
//!    keeping every intermediate [`GraphLayer`] as a zoom level
//! 4. Score wrappers that span several genome cohorts so layout keeps them apart
//!
//! ## Architecture
//!
//! ```text
//! SnapshotInput → GraphSnapshot → GraphLayer (leaves) → collapse → GraphLayer ...
//!                                       ↓                              ↓
//!                                 GroupInterest                  GroupInterest
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same snapshot + same policy → identical layer fingerprints at every level
//! - Ranks do not depend on wrapper order
//! - Composite members keep chain order, head first

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod wrapper;
pub mod layering;
pub mod layer;
pub mod merge;
pub mod policy;
pub mod zoom;
pub mod canonical;

// Re-exports
pub use types::{
    DataNode, Edge, Genome, GenomeSet, GraphSnapshot, Label, NodeId, SnapshotError, SnapshotInput,
};
pub use wrapper::{
    Composite, Slot, SpaceFiller, Variant, Wrapper, WrapperKind, WrapperOperation, DEFAULT_INTEREST,
};
pub use layering::{compute_longest_paths, DedupQueue};
pub use layer::{GraphLayer, LayerError};
pub use merge::{collapse, collapse_horizontal, CombineRule, HorizontalChains, MergeOutcome};
pub use policy::{GroupInterest, PolicyError, ZoomPolicy};
pub use zoom::{ZoomError, ZoomStack};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

/// Default zoom policy version.
pub const DEFAULT_POLICY_VERSION: &str = "zoom_policy_v1";
