//! Graph layer: one generation of the wrapper set.
//!
//! A `GraphLayer` owns its wrappers in an arena and is ranked on
//! construction. Its structure never changes afterwards; compaction builds
//! a new layer and leaves this one valid, so several zoom granularities can
//! coexist. Only annotations (interest, position) are written later.

use std::sync::Arc;

use crate::canonical::canonical_hash_hex;
use crate::layering::compute_longest_paths;
use crate::types::{GenomeSet, GraphSnapshot, NodeId};
use crate::wrapper::{Slot, Variant, Wrapper, WrapperOperation};

/// Error type for layer construction and ordering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    /// Layering needs at least one wrapper.
    #[error("Cannot layer an empty wrapper set")]
    EmptyLayer,
    /// The forward pass stopped before ranking every wrapper.
    #[error("Input is not acyclic: ranked {ranked} of {total} wrappers")]
    CyclicInput {
        /// Wrappers ranked before the frontier ran dry.
        ranked: usize,
        /// Wrappers in the layer.
        total: usize,
    },
    /// A wrapper was compared before ranking completed.
    #[error("Wrapper {0} compared before ranking")]
    Unranked(NodeId),
    /// Adjacency refers to a slot outside the layer.
    #[error("Adjacency refers to missing slot {0}")]
    DanglingReference(Slot),
    /// A combine rule put one wrapper into two groups.
    #[error("Wrapper at slot {0} assigned to more than one group")]
    OverlappingGroups(Slot),
    /// A combine rule asked for a variant that cannot hold members.
    #[error("Variant {0} cannot hold members")]
    NotComposite(Variant),
}

/// One ranked generation of wrappers.
#[derive(Debug, Clone)]
pub struct GraphLayer {
    wrappers: Vec<Wrapper>,
    longest_path: u32,
    size: u64,
}

impl GraphLayer {
    /// Rank `wrappers` and take ownership of them.
    pub fn new(mut wrappers: Vec<Wrapper>) -> Result<Self, LayerError> {
        let longest_path = compute_longest_paths(&mut wrappers)?;
        let size = wrappers.iter().map(Wrapper::width).sum();
        Ok(Self {
            wrappers,
            longest_path,
            size,
        })
    }

    /// Build the initial layer: one leaf wrapper per data node, in snapshot
    /// order, with repeated edges folded into outgoing weight.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Result<Self, LayerError> {
        let mut wrappers: Vec<Wrapper> = snapshot
            .nodes()
            .iter()
            .map(|node| Wrapper::leaf(Arc::clone(node)))
            .collect();

        for edge in snapshot.edges() {
            // Endpoints were validated by the snapshot
            let endpoints = (snapshot.position_of(edge.from), snapshot.position_of(edge.to));
            if let (Some(from), Some(to)) = endpoints {
                wrappers[from].link_outgoing(Slot(to), 1);
                wrappers[to].link_incoming(Slot(from));
            }
        }

        Self::new(wrappers)
    }

    /// All wrappers, indexed by [`Slot`].
    pub fn wrappers(&self) -> &[Wrapper] {
        &self.wrappers
    }

    /// Wrapper at `slot`.
    pub fn get(&self, slot: Slot) -> Option<&Wrapper> {
        self.wrappers.get(slot.0)
    }

    /// Number of wrappers.
    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    /// Whether the layer has no wrappers. Never true for a constructed layer.
    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    /// Longest path length in nodes, equal to the maximum rank.
    pub fn longest_path(&self) -> u32 {
        self.longest_path
    }

    /// Total width of all wrappers.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Sum of base pair counts over all wrappers.
    pub fn total_base_pairs(&self) -> u64 {
        self.wrappers.iter().map(Wrapper::base_pair_count).sum()
    }

    /// Union of genome sets over all wrappers.
    pub fn genomes(&self) -> GenomeSet {
        self.wrappers
            .iter()
            .flat_map(|w| w.genomes().iter().cloned())
            .collect()
    }

    /// Slot of the wrapper containing the original data node.
    pub fn find_containing(&self, node: NodeId) -> Option<Slot> {
        self.wrappers.iter().position(|w| w.contains(node)).map(Slot)
    }

    /// Slots ordered by ascending rank, ties by ascending id.
    pub fn sorted_by_rank(&self) -> Result<Vec<Slot>, LayerError> {
        let mut keyed = Vec::with_capacity(self.wrappers.len());
        for (i, wrapper) in self.wrappers.iter().enumerate() {
            let rank = wrapper.rank().ok_or(LayerError::Unranked(wrapper.id()))?;
            keyed.push((rank, wrapper.id(), Slot(i)));
        }
        keyed.sort_unstable();
        Ok(keyed.into_iter().map(|(_, _, slot)| slot).collect())
    }

    /// Run an operation over every wrapper in slot order, with no container.
    ///
    /// Operations can annotate wrappers but cannot change adjacency, so the
    /// ranks stay valid.
    pub fn calculate(&mut self, operation: &mut dyn WrapperOperation) {
        for wrapper in &mut self.wrappers {
            wrapper.calculate(operation, None);
        }
    }

    /// Set the position of one wrapper. Returns false for an unknown slot.
    pub fn set_position(&mut self, slot: Slot, x: f32, y: f32) -> bool {
        match self.wrappers.get_mut(slot.0) {
            Some(wrapper) => {
                wrapper.set_x(x);
                wrapper.set_y(y);
                true
            }
            None => false,
        }
    }

    /// Deterministic fingerprint over ids, ranks and weighted adjacency.
    pub fn fingerprint(&self) -> String {
        let rows: Vec<(String, Option<u32>, Vec<usize>, Vec<u32>)> = self
            .wrappers
            .iter()
            .map(|w| {
                (
                    w.id_string(),
                    w.rank(),
                    w.outgoing().iter().map(Slot::index).collect(),
                    w.outgoing_weight().to_vec(),
                )
            })
            .collect();
        canonical_hash_hex(&rows)
    }
}
