//! Core data types handed over by the parsing collaborator.

pub mod genome;
pub mod node;
pub mod edge;
pub mod snapshot;

pub use genome::{Genome, GenomeSet, Label};
pub use node::{DataNode, NodeId};
pub use edge::Edge;
pub use snapshot::{GraphSnapshot, SnapshotError, SnapshotInput};
