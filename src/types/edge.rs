//! Edge type for the alignment graph.

use serde::{Deserialize, Serialize};
use super::node::NodeId;

/// Directed adjacency between two data nodes.
///
/// Edges carry no weight of their own; repeated edges between the same pair
/// are counted as multiplicity on the owning wrapper's outgoing link.
/// Implements `Ord` for deterministic ordering: (from, to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node.
    pub from: NodeId,
    /// Target node.
    pub to: NodeId,
}

impl Edge {
    /// Create a new edge.
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl From<(u32, u32)> for Edge {
    fn from((from, to): (u32, u32)) -> Self {
        Self::new(from, to)
    }
}
