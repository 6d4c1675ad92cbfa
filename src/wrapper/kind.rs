//! Wrapper content: what a wrapper stands for, independent of any layer.
//!
//! A `WrapperKind` is an immutable tree. Composites hold their members as
//! shared `Arc<WrapperKind>` so a coarser layer can reuse the content of the
//! finer one without copying or mutating it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::types::{DataNode, GenomeSet, Label, NodeId};

static EMPTY_GENOMES: GenomeSet = GenomeSet::new();

/// Wrapper variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// One original data node.
    Leaf,
    /// Maximal linear chain of singly-linked wrappers.
    Horizontal,
    /// Parallel alternative paths at the same rank.
    Vertical,
    /// Layout filler without source content.
    Space,
    /// Generic multi-child container.
    Combine,
}

impl Variant {
    /// Whether this variant holds members.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Horizontal | Self::Vertical | Self::Combine)
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::Leaf => "L",
            Self::Horizontal => "H",
            Self::Vertical => "V",
            Self::Space => "S",
            Self::Combine => "C",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf => write!(f, "Leaf"),
            Self::Horizontal => write!(f, "Horizontal"),
            Self::Vertical => write!(f, "Vertical"),
            Self::Space => write!(f, "Space"),
            Self::Combine => write!(f, "Combine"),
        }
    }
}

/// Members of a composite wrapper plus their genome union.
#[derive(Debug)]
pub struct Composite {
    members: Vec<Arc<WrapperKind>>,
    genomes: GenomeSet,
}

impl Composite {
    /// Build a composite. Returns `None` when `members` is empty.
    pub fn new(members: Vec<Arc<WrapperKind>>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        let genomes = members
            .iter()
            .flat_map(|m| m.genomes().iter().cloned())
            .collect();
        Some(Self { members, genomes })
    }

    /// Members in order (chain order for horizontal composites).
    pub fn members(&self) -> &[Arc<WrapperKind>] {
        &self.members
    }

    fn first(&self) -> &WrapperKind {
        // Non-empty by construction
        &self.members[0]
    }
}

/// Layout filler occupying horizontal space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceFiller {
    /// Id used for ordering.
    pub id: NodeId,
    /// Occupied width.
    pub width: u64,
}

/// The content of a wrapper.
#[derive(Debug)]
pub enum WrapperKind {
    /// One original data node.
    Leaf(Arc<DataNode>),
    /// Chain of members, head first.
    Horizontal(Composite),
    /// Parallel members.
    Vertical(Composite),
    /// Filler.
    Space(SpaceFiller),
    /// Generic container.
    Combine(Composite),
}

impl WrapperKind {
    /// Build a composite of the given variant.
    ///
    /// Returns `None` for non-composite variants or an empty member list.
    pub fn composite(variant: Variant, members: Vec<Arc<WrapperKind>>) -> Option<Self> {
        let composite = Composite::new(members)?;
        match variant {
            Variant::Horizontal => Some(Self::Horizontal(composite)),
            Variant::Vertical => Some(Self::Vertical(composite)),
            Variant::Combine => Some(Self::Combine(composite)),
            Variant::Leaf | Variant::Space => None,
        }
    }

    /// Variant tag.
    pub fn variant(&self) -> Variant {
        match self {
            Self::Leaf(_) => Variant::Leaf,
            Self::Horizontal(_) => Variant::Horizontal,
            Self::Vertical(_) => Variant::Vertical,
            Self::Space(_) => Variant::Space,
            Self::Combine(_) => Variant::Combine,
        }
    }

    /// Id: the node id for a leaf, the first member's id for a composite.
    pub fn id(&self) -> NodeId {
        match self {
            Self::Leaf(node) => node.id,
            Self::Space(space) => space.id,
            Self::Horizontal(c) | Self::Vertical(c) | Self::Combine(c) => c.first().id(),
        }
    }

    /// Members of a composite; empty for leaves and fillers.
    pub fn members(&self) -> &[Arc<WrapperKind>] {
        match self {
            Self::Horizontal(c) | Self::Vertical(c) | Self::Combine(c) => c.members(),
            Self::Leaf(_) | Self::Space(_) => &[],
        }
    }

    /// Union of genomes over all contained leaves.
    pub fn genomes(&self) -> &GenomeSet {
        match self {
            Self::Leaf(node) => &node.genomes,
            Self::Space(_) => &EMPTY_GENOMES,
            Self::Horizontal(c) | Self::Vertical(c) | Self::Combine(c) => &c.genomes,
        }
    }

    /// Maximum number of bases passed when crossing this wrapper.
    ///
    /// Chains and generic containers add up their members; parallel members
    /// are alternatives, so a vertical group takes the longest one.
    pub fn base_pair_count(&self) -> u64 {
        match self {
            Self::Leaf(node) => node.base_pair_count(),
            Self::Space(_) => 0,
            Self::Horizontal(c) | Self::Combine(c) => {
                c.members.iter().map(|m| m.base_pair_count()).sum()
            }
            Self::Vertical(c) => c.members.iter().map(|m| m.base_pair_count()).max().unwrap_or(0),
        }
    }

    /// Horizontal extent of this wrapper.
    pub fn width(&self) -> u64 {
        match self {
            Self::Leaf(node) => node.base_pair_count(),
            Self::Space(space) => space.width,
            Self::Horizontal(c) | Self::Combine(c) => c.members.iter().map(|m| m.width()).sum(),
            Self::Vertical(c) => c.members.iter().map(|m| m.width()).max().unwrap_or(0),
        }
    }

    /// Whether this wrapper can be expanded into its members.
    pub fn can_unwrap(&self) -> bool {
        self.variant().is_composite()
    }

    /// Whether the original data node is contained in this wrapper.
    pub fn contains(&self, node: NodeId) -> bool {
        match self {
            Self::Leaf(data) => data.id == node,
            Self::Space(_) => false,
            Self::Horizontal(c) | Self::Vertical(c) | Self::Combine(c) => {
                c.members.iter().any(|m| m.contains(node))
            }
        }
    }

    /// Push every contained data node into `acc`.
    pub fn collect_data_nodes(&self, acc: &mut Vec<Arc<DataNode>>) {
        match self {
            Self::Leaf(node) => acc.push(Arc::clone(node)),
            Self::Space(_) => {}
            Self::Horizontal(c) | Self::Vertical(c) | Self::Combine(c) => {
                for member in &c.members {
                    member.collect_data_nodes(acc);
                }
            }
        }
    }

    /// Insert every label of every contained data node into `acc`.
    pub fn collect_labels(&self, acc: &mut BTreeSet<Label>) {
        match self {
            Self::Leaf(node) => acc.extend(node.labels.iter().cloned()),
            Self::Space(_) => {}
            Self::Horizontal(c) | Self::Vertical(c) | Self::Combine(c) => {
                for member in &c.members {
                    member.collect_labels(acc);
                }
            }
        }
    }

    /// Compact id string, e.g. `12` or `H[1,2,V[3,4]]`.
    pub fn id_string(&self) -> String {
        match self {
            Self::Leaf(node) => node.id.to_string(),
            Self::Space(space) => format!("S{}", space.id),
            Self::Horizontal(c) | Self::Vertical(c) | Self::Combine(c) => {
                let inner: Vec<String> = c.members.iter().map(|m| m.id_string()).collect();
                format!("{}[{}]", self.variant().tag(), inner.join(","))
            }
        }
    }

    /// Bases of this wrapper: a chain concatenates, alternatives are
    /// separated by `|`.
    pub fn base_pair_string(&self) -> String {
        match self {
            Self::Leaf(node) => node.base_pair_string(),
            Self::Space(_) => String::new(),
            Self::Horizontal(c) | Self::Combine(c) => {
                c.members.iter().map(|m| m.base_pair_string()).collect()
            }
            Self::Vertical(c) => {
                let parts: Vec<String> = c.members.iter().map(|m| m.base_pair_string()).collect();
                parts.join("|")
            }
        }
    }
}
