//! Topological ranking of wrappers.

pub mod dedup_queue;
pub mod longest_path;

pub use dedup_queue::DedupQueue;
pub use longest_path::compute_longest_paths;
