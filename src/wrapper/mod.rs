//! Wrappers: the common interchange type of every layering pass.
//!
//! A [`Wrapper`] is one record in a layer's arena. It pairs shared, immutable
//! content ([`WrapperKind`]) with the per-layer state that passes compute:
//! adjacency, rank, interest and position.
//!
//! ## Adjacency
//!
//! Sibling references form cycles (a node's outgoing neighbour lists it as
//! incoming). They are stored as [`Slot`] indices into the owning layer, never
//! as owned references. `outgoing` and `outgoing_weight` are parallel and
//! always have the same length.
//!
//! Adjacency is written only while a layer is being built
//! ([`GraphLayer::from_snapshot`](crate::layer::GraphLayer::from_snapshot)
//! and [`collapse`](crate::merge::collapse)). Operations run through
//! [`Wrapper::calculate`] can change interest and position, not edges.

pub mod kind;
pub mod operation;

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::layer::LayerError;
use crate::types::{DataNode, GenomeSet, Label, NodeId};

pub use kind::{Composite, SpaceFiller, Variant, WrapperKind};
pub use operation::WrapperOperation;

/// Default interest of a fresh wrapper.
pub const DEFAULT_INTEREST: f32 = 1.0;

/// Index of a wrapper inside its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot(pub usize);

impl Slot {
    /// Raw index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One wrapper record in a layer.
#[derive(Debug, Clone)]
pub struct Wrapper {
    kind: Arc<WrapperKind>,
    incoming: Vec<Slot>,
    outgoing: Vec<Slot>,
    outgoing_weight: Vec<u32>,
    rank: Option<u32>,
    interest: f32,
    x: f32,
    y: f32,
    data_nodes: OnceCell<Vec<Arc<DataNode>>>,
    labels: OnceCell<BTreeSet<Label>>,
}

impl Wrapper {
    /// Create an unconnected, unranked wrapper around `kind`.
    pub fn new(kind: Arc<WrapperKind>) -> Self {
        Self {
            kind,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            outgoing_weight: Vec::new(),
            rank: None,
            interest: DEFAULT_INTEREST,
            x: 0.0,
            y: 0.0,
            data_nodes: OnceCell::new(),
            labels: OnceCell::new(),
        }
    }

    /// Wrap one data node.
    pub fn leaf(node: Arc<DataNode>) -> Self {
        Self::new(Arc::new(WrapperKind::Leaf(node)))
    }

    /// Wrapper content.
    pub fn kind(&self) -> &WrapperKind {
        &self.kind
    }

    /// Shared handle to the content, for building composites.
    pub fn kind_arc(&self) -> &Arc<WrapperKind> {
        &self.kind
    }

    /// Variant tag.
    pub fn variant(&self) -> Variant {
        self.kind.variant()
    }

    /// Id used to break rank ties.
    pub fn id(&self) -> NodeId {
        self.kind.id()
    }

    /// Genome union over contained leaves.
    pub fn genomes(&self) -> &GenomeSet {
        self.kind.genomes()
    }

    /// See [`WrapperKind::base_pair_count`].
    pub fn base_pair_count(&self) -> u64 {
        self.kind.base_pair_count()
    }

    /// See [`WrapperKind::width`].
    pub fn width(&self) -> u64 {
        self.kind.width()
    }

    /// Whether this wrapper can be expanded into its members.
    pub fn can_unwrap(&self) -> bool {
        self.kind.can_unwrap()
    }

    /// Whether the original data node is inside this wrapper.
    pub fn contains(&self, node: NodeId) -> bool {
        self.kind.contains(node)
    }

    /// Push contained data nodes into `acc`.
    pub fn collect_data_nodes(&self, acc: &mut Vec<Arc<DataNode>>) {
        self.kind.collect_data_nodes(acc);
    }

    /// Insert contained labels into `acc`.
    pub fn collect_labels(&self, acc: &mut BTreeSet<Label>) {
        self.kind.collect_labels(acc);
    }

    /// Contained data nodes sorted by id, computed on first access.
    pub fn data_nodes(&self) -> &[Arc<DataNode>] {
        self.data_nodes.get_or_init(|| {
            let mut acc = Vec::new();
            self.collect_data_nodes(&mut acc);
            acc.sort_by_key(|n| n.id);
            acc.dedup_by_key(|n| n.id);
            acc
        })
    }

    /// Contained labels, computed on first access.
    pub fn labels(&self) -> &BTreeSet<Label> {
        self.labels.get_or_init(|| {
            let mut acc = BTreeSet::new();
            self.collect_labels(&mut acc);
            acc
        })
    }

    /// Compact id string.
    pub fn id_string(&self) -> String {
        self.kind.id_string()
    }

    /// Bases of this wrapper.
    pub fn base_pair_string(&self) -> String {
        self.kind.base_pair_string()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Adjacency
    // ─────────────────────────────────────────────────────────────────────

    /// Predecessors.
    pub fn incoming(&self) -> &[Slot] {
        &self.incoming
    }

    /// Successors.
    pub fn outgoing(&self) -> &[Slot] {
        &self.outgoing
    }

    /// Multiplicity per successor, parallel to [`Self::outgoing`].
    pub fn outgoing_weight(&self) -> &[u32] {
        &self.outgoing_weight
    }

    /// Record a predecessor. Repeated links are kept once.
    pub(crate) fn link_incoming(&mut self, from: Slot) {
        if !self.incoming.contains(&from) {
            self.incoming.push(from);
        }
    }

    /// Record a successor with the given multiplicity.
    ///
    /// Linking an existing successor again adds to its weight.
    pub(crate) fn link_outgoing(&mut self, to: Slot, weight: u32) {
        match self.outgoing.iter().position(|s| *s == to) {
            Some(pos) => self.outgoing_weight[pos] += weight,
            None => {
                self.outgoing.push(to);
                self.outgoing_weight.push(weight);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rank
    // ─────────────────────────────────────────────────────────────────────

    /// Rank, or `None` before layering.
    pub fn rank(&self) -> Option<u32> {
        self.rank
    }

    /// Copy of this wrapper for rebuilding it in another layer.
    ///
    /// Adjacency and rank are cleared and interest starts over at
    /// [`DEFAULT_INTEREST`], like a fresh composite. Content, position and
    /// caches are kept.
    pub(crate) fn detached(&self) -> Wrapper {
        Wrapper {
            incoming: Vec::new(),
            outgoing: Vec::new(),
            outgoing_weight: Vec::new(),
            rank: None,
            interest: DEFAULT_INTEREST,
            ..self.clone()
        }
    }

    pub(crate) fn set_rank(&mut self, rank: u32) {
        self.rank = Some(rank);
    }

    pub(crate) fn reset_rank(&mut self) {
        self.rank = None;
    }

    /// Total order by ascending rank, then ascending id.
    ///
    /// Fails with [`LayerError::Unranked`] when either side has not been
    /// ranked yet.
    pub fn try_cmp(&self, other: &Wrapper) -> Result<Ordering, LayerError> {
        let mine = self.rank.ok_or(LayerError::Unranked(self.id()))?;
        let theirs = other.rank.ok_or(LayerError::Unranked(other.id()))?;
        Ok(mine.cmp(&theirs).then_with(|| self.id().cmp(&other.id())))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Interest and position
    // ─────────────────────────────────────────────────────────────────────

    /// Interest score.
    pub fn interest(&self) -> f32 {
        self.interest
    }

    /// Add to the interest score.
    pub fn add_interest(&mut self, amount: f32) {
        self.interest += amount;
    }

    /// Scale the interest score.
    pub fn multiply_interest(&mut self, factor: f32) {
        self.interest *= factor;
    }

    /// Horizontal position, set by the layout collaborator.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Vertical position, set by the layout collaborator.
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Set horizontal position.
    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    /// Set vertical position.
    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    /// Run an operation on this wrapper, dispatching on its variant.
    ///
    /// `container` is the enclosing wrapper when a caller walks an expanded
    /// composite. Layer-wide passes ([`GraphLayer::calculate`]) visit only
    /// top-level wrappers and always pass `None`.
    ///
    /// [`GraphLayer::calculate`]: crate::layer::GraphLayer::calculate
    pub fn calculate(
        &mut self,
        operation: &mut dyn WrapperOperation,
        container: Option<&Wrapper>,
    ) {
        match self.variant() {
            Variant::Leaf => operation.leaf(self, container),
            Variant::Horizontal => operation.horizontal(self, container),
            Variant::Vertical => operation.vertical(self, container),
            Variant::Space => operation.space(self, container),
            Variant::Combine => operation.combine(self, container),
        }
    }
}

impl fmt::Display for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.variant(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Genome;

    fn make_leaf(id: u32, len: usize) -> Wrapper {
        let node = DataNode::new(
            NodeId(id),
            [Genome::new("g1")].into_iter().collect(),
            0,
            len as u64,
            vec![b'C'; len],
        )
        .with_labels(vec![Label::new("dnaA")]);
        Wrapper::leaf(Arc::new(node))
    }

    #[test]
    fn test_outgoing_weight_tracks_multiplicity() {
        let mut w = make_leaf(1, 3);
        w.link_outgoing(Slot(2), 1);
        w.link_outgoing(Slot(5), 1);
        w.link_outgoing(Slot(2), 1);

        assert_eq!(w.outgoing(), &[Slot(2), Slot(5)]);
        assert_eq!(w.outgoing_weight(), &[2, 1]);
        assert_eq!(w.outgoing().len(), w.outgoing_weight().len());
    }

    #[test]
    fn test_incoming_deduplicates() {
        let mut w = make_leaf(1, 3);
        w.link_incoming(Slot(0));
        w.link_incoming(Slot(0));
        assert_eq!(w.incoming(), &[Slot(0)]);
    }

    #[test]
    fn test_try_cmp_requires_rank() {
        let mut a = make_leaf(1, 3);
        let mut b = make_leaf(2, 3);
        assert!(matches!(a.try_cmp(&b), Err(LayerError::Unranked(NodeId(1)))));

        a.set_rank(1);
        b.set_rank(1);
        assert_eq!(a.try_cmp(&b).unwrap(), Ordering::Less);

        b.set_rank(0);
        assert_eq!(a.try_cmp(&b).unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_interest_primitives() {
        let mut w = make_leaf(1, 3);
        assert_eq!(w.interest(), DEFAULT_INTEREST);
        w.add_interest(3.0);
        w.multiply_interest(0.5);
        assert_eq!(w.interest(), 2.0);
    }

    #[test]
    fn test_memoized_collections() {
        let w = make_leaf(4, 2);
        assert_eq!(w.data_nodes().len(), 1);
        assert_eq!(w.data_nodes()[0].id, NodeId(4));
        assert!(w.labels().contains(&Label::new("dnaA")));
        assert_eq!(w.to_string(), "Leaf:4");
    }

    struct CountVariants {
        leaves: usize,
        spaces: usize,
    }

    impl WrapperOperation for CountVariants {
        fn leaf(&mut self, _wrapper: &mut Wrapper, _container: Option<&Wrapper>) {
            self.leaves += 1;
        }

        fn space(&mut self, _wrapper: &mut Wrapper, _container: Option<&Wrapper>) {
            self.spaces += 1;
        }
    }

    #[test]
    fn test_calculate_dispatches_on_variant() {
        let mut op = CountVariants { leaves: 0, spaces: 0 };
        let mut leaf = make_leaf(1, 3);
        let mut space = Wrapper::new(Arc::new(WrapperKind::Space(SpaceFiller {
            id: NodeId(50),
            width: 4,
        })));

        leaf.calculate(&mut op, None);
        space.calculate(&mut op, None);
        space.calculate(&mut op, None);

        assert_eq!(op.leaves, 1);
        assert_eq!(op.spaces, 2);
    }
}
