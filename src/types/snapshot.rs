//! Immutable graph snapshot handed over by the parsing collaborator.
//!
//! A `GraphSnapshot` validates the upstream contract once (unique ids,
//! non-empty genome sets, edges between known nodes) and is never mutated
//! afterwards. Every zoom level is derived from it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::canonical::canonical_hash_hex;
use super::edge::Edge;
use super::genome::{Genome, GenomeSet};
use super::node::{DataNode, NodeId};

/// Error type for snapshot construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// Two nodes share an id.
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),
    /// An edge refers to a node that is not in the node list.
    #[error("Edge references unknown node: {0}")]
    UnknownNode(NodeId),
    /// A node has no genomes passing through it.
    #[error("Node {0} has an empty genome set")]
    EmptyGenomeSet(NodeId),
}

/// Raw snapshot data, as deserialized from an interchange file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotInput {
    /// Nodes in parse order.
    pub nodes: Vec<DataNode>,
    /// Directed edges.
    pub edges: Vec<Edge>,
}

/// Validated, immutable node/edge/genome set.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    nodes: Vec<Arc<DataNode>>,
    edges: Vec<Edge>,
    index: BTreeMap<NodeId, usize>,
    snapshot_id: String,
}

impl GraphSnapshot {
    /// Validate and build a snapshot.
    pub fn new(nodes: Vec<DataNode>, edges: Vec<Edge>) -> Result<Self, SnapshotError> {
        let mut index = BTreeMap::new();
        for (position, node) in nodes.iter().enumerate() {
            if node.genomes.is_empty() {
                return Err(SnapshotError::EmptyGenomeSet(node.id));
            }
            if index.insert(node.id, position).is_some() {
                return Err(SnapshotError::DuplicateNode(node.id));
            }
        }

        for edge in &edges {
            for endpoint in [edge.from, edge.to] {
                if !index.contains_key(&endpoint) {
                    return Err(SnapshotError::UnknownNode(endpoint));
                }
            }
        }

        // Sorted pairs so the id does not depend on parse order
        let node_ids: Vec<u32> = index.keys().map(NodeId::get).collect();
        let mut edge_pairs: Vec<(u32, u32)> =
            edges.iter().map(|e| (e.from.get(), e.to.get())).collect();
        edge_pairs.sort_unstable();
        let snapshot_id = canonical_hash_hex(&(node_ids, edge_pairs));

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            snapshot_id = %snapshot_id,
            "graph snapshot validated"
        );

        Ok(Self {
            nodes: nodes.into_iter().map(Arc::new).collect(),
            edges,
            index,
            snapshot_id,
        })
    }

    /// Build a snapshot from deserialized input.
    pub fn from_input(input: SnapshotInput) -> Result<Self, SnapshotError> {
        Self::new(input.nodes, input.edges)
    }

    /// Nodes in parse order.
    pub fn nodes(&self) -> &[Arc<DataNode>] {
        &self.nodes
    }

    /// All edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Position of a node in `nodes()`.
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Look up a node by id.
    pub fn node_by_id(&self, id: NodeId) -> Option<&Arc<DataNode>> {
        self.position_of(id).map(|pos| &self.nodes[pos])
    }

    /// All distinct genomes in the graph, sorted by identifier.
    pub fn genomes(&self) -> Vec<Genome> {
        let all: GenomeSet = self
            .nodes
            .iter()
            .flat_map(|n| n.genomes.iter().cloned())
            .collect();
        all.into_iter().collect()
    }

    /// Deterministic fingerprint of node ids and edge pairs.
    pub fn snapshot_id(&self) -> &str {
        &self.snapshot_id
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}
