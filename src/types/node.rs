//! Data node types produced by the parsing collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::genome::{GenomeSet, Label};

/// Stable integer identifier of a data node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node id.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// One aligned genome segment.
///
/// Immutable after parsing. Only the length of `sequence` matters to the
/// layering and compaction passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataNode {
    /// Node id.
    pub id: NodeId,
    /// Genomes passing through this segment (non-empty).
    pub genomes: GenomeSet,
    /// Start coordinate on the reference.
    pub ref_start: u64,
    /// End coordinate on the reference.
    pub ref_end: u64,
    /// Bases of the segment.
    pub sequence: Vec<u8>,
    /// Annotation labels, in annotation order.
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl DataNode {
    /// Create a new data node without labels.
    pub fn new(
        id: NodeId,
        genomes: GenomeSet,
        ref_start: u64,
        ref_end: u64,
        sequence: Vec<u8>,
    ) -> Self {
        Self {
            id,
            genomes,
            ref_start,
            ref_end,
            sequence,
            labels: Vec::new(),
        }
    }

    /// Attach labels (builder style).
    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    /// Number of bases in the segment.
    pub fn base_pair_count(&self) -> u64 {
        self.sequence.len() as u64
    }

    /// Sequence as text, lossy for non-ASCII bytes.
    pub fn base_pair_string(&self) -> String {
        String::from_utf8_lossy(&self.sequence).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Genome;

    #[test]
    fn test_base_pair_count_is_sequence_length() {
        let genomes: GenomeSet = [Genome::new("g1")].into_iter().collect();
        let node = DataNode::new(NodeId(7), genomes, 10, 14, b"ACGTA".to_vec());
        assert_eq!(node.base_pair_count(), 5);
        assert_eq!(node.base_pair_string(), "ACGTA");
    }

    #[test]
    fn test_node_id_ordering() {
        assert!(NodeId(1) < NodeId(2));
        assert_eq!(NodeId::from(3).get(), 3);
        assert_eq!(NodeId(12).to_string(), "12");
    }
}
