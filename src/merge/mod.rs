//! Layer compaction.
//!
//! A [`CombineRule`] decides which wrappers belong together and which
//! composite variant they form. [`collapse`] turns those groups into a new,
//! coarser [`GraphLayer`]:
//!
//! - each group becomes one composite at the position of its first member,
//! - every other wrapper is copied over with its content and position;
//!   interest starts over so each layer is scored on its own,
//! - every reference to a grouped wrapper is rewritten to its composite,
//!   keeping edge order and per-edge weight,
//! - a composite's adjacency is the union of its members' external edges;
//!   edges between members disappear.
//!
//! The source layer is only read. When a rule finds nothing to combine the
//! result is [`MergeOutcome::Fixpoint`], which is not an error.

pub mod horizontal;

use std::sync::Arc;

use crate::layer::{GraphLayer, LayerError};
use crate::wrapper::{Slot, Variant, Wrapper, WrapperKind};

pub use horizontal::{find_chains, HorizontalChains};

/// Result of one compaction pass.
#[derive(Debug)]
pub enum MergeOutcome {
    /// A new, strictly smaller layer.
    Merged(GraphLayer),
    /// Nothing left to combine.
    Fixpoint,
}

impl MergeOutcome {
    /// Whether the pass reached the fixpoint.
    pub fn is_fixpoint(&self) -> bool {
        matches!(self, Self::Fixpoint)
    }

    /// The merged layer, if any.
    pub fn into_layer(self) -> Option<GraphLayer> {
        match self {
            Self::Merged(layer) => Some(layer),
            Self::Fixpoint => None,
        }
    }
}

/// A lossless grouping rule plugged into [`collapse`].
pub trait CombineRule {
    /// Composite variant produced for each group.
    fn variant(&self) -> Variant;

    /// Groups of slots to combine, members in composite order.
    ///
    /// Groups must be disjoint. Groups with fewer than two members are
    /// ignored.
    fn find_groups(&self, layer: &GraphLayer) -> Vec<Vec<Slot>>;
}

enum Planned {
    Keep(usize),
    Group(usize),
}

/// Apply `rule` to `layer` and build the next layer.
///
/// # Errors
///
/// Fails when the rule returns overlapping or out-of-range groups, asks for
/// a non-composite variant, or when ranking the new layer fails.
pub fn collapse<R: CombineRule + ?Sized>(
    layer: &GraphLayer,
    rule: &R,
) -> Result<MergeOutcome, LayerError> {
    let variant = rule.variant();
    if !variant.is_composite() {
        return Err(LayerError::NotComposite(variant));
    }

    let groups: Vec<Vec<Slot>> = rule
        .find_groups(layer)
        .into_iter()
        .filter(|group| group.len() > 1)
        .collect();
    if groups.is_empty() {
        tracing::debug!(variant = %variant, wrappers = layer.len(), "fixpoint reached");
        return Ok(MergeOutcome::Fixpoint);
    }

    let total = layer.len();
    let mut owner: Vec<Option<usize>> = vec![None; total];
    for (group_index, group) in groups.iter().enumerate() {
        for &slot in group {
            match owner.get_mut(slot.0) {
                None => return Err(LayerError::DanglingReference(slot)),
                Some(Some(_)) => return Err(LayerError::OverlappingGroups(slot)),
                Some(entry) => *entry = Some(group_index),
            }
        }
    }

    // New slot of every old wrapper, composites placed at their first member
    let mut plan: Vec<Planned> = Vec::with_capacity(total);
    let mut group_slot: Vec<Option<Slot>> = vec![None; groups.len()];
    let mut remap: Vec<Slot> = Vec::with_capacity(total);
    for (old, assigned) in owner.iter().enumerate() {
        let new_slot = match *assigned {
            None => {
                plan.push(Planned::Keep(old));
                Slot(plan.len() - 1)
            }
            Some(group_index) => match group_slot[group_index] {
                Some(slot) => slot,
                None => {
                    plan.push(Planned::Group(group_index));
                    let slot = Slot(plan.len() - 1);
                    group_slot[group_index] = Some(slot);
                    slot
                }
            },
        };
        remap.push(new_slot);
    }

    let source = layer.wrappers();
    let mut wrappers = Vec::with_capacity(plan.len());
    for (index, planned) in plan.iter().enumerate() {
        let own = Slot(index);
        let wrapper = match *planned {
            Planned::Keep(old) => {
                let mut wrapper = source[old].detached();
                reconnect(&mut wrapper, &source[old], own, &remap)?;
                wrapper
            }
            Planned::Group(group_index) => {
                let members = &groups[group_index];
                let kinds = members
                    .iter()
                    .map(|slot| Arc::clone(source[slot.0].kind_arc()))
                    .collect();
                let kind = WrapperKind::composite(variant, kinds)
                    .ok_or(LayerError::NotComposite(variant))?;
                let mut wrapper = Wrapper::new(Arc::new(kind));
                for slot in members {
                    reconnect(&mut wrapper, &source[slot.0], own, &remap)?;
                }
                wrapper
            }
        };
        wrappers.push(wrapper);
    }

    tracing::debug!(
        variant = %variant,
        merged_groups = groups.len(),
        before = total,
        after = wrappers.len(),
        "layer collapsed"
    );
    Ok(MergeOutcome::Merged(GraphLayer::new(wrappers)?))
}

/// Copy the external edges of `from` onto `target`, rewritten through `remap`.
fn reconnect(
    target: &mut Wrapper,
    from: &Wrapper,
    own: Slot,
    remap: &[Slot],
) -> Result<(), LayerError> {
    for &pred in from.incoming() {
        let mapped = *remap.get(pred.0).ok_or(LayerError::DanglingReference(pred))?;
        if mapped != own {
            target.link_incoming(mapped);
        }
    }
    for (&succ, &weight) in from.outgoing().iter().zip(from.outgoing_weight()) {
        let mapped = *remap.get(succ.0).ok_or(LayerError::DanglingReference(succ))?;
        if mapped != own {
            target.link_outgoing(mapped, weight);
        }
    }
    Ok(())
}

/// Collapse maximal horizontal chains. Shorthand for
/// `collapse(layer, &HorizontalChains)`.
pub fn collapse_horizontal(layer: &GraphLayer) -> Result<MergeOutcome, LayerError> {
    collapse(layer, &HorizontalChains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataNode, Genome, NodeId};

    fn make_layer(nodes: &[(u32, &[&str], usize)], edges: &[(usize, usize)]) -> GraphLayer {
        let mut wrappers: Vec<Wrapper> = nodes
            .iter()
            .map(|&(id, genomes, len)| {
                Wrapper::leaf(Arc::new(DataNode::new(
                    NodeId(id),
                    genomes.iter().map(Genome::new).collect(),
                    0,
                    len as u64,
                    vec![b'T'; len],
                )))
            })
            .collect();
        for &(from, to) in edges {
            wrappers[from].link_outgoing(Slot(to), 1);
            wrappers[to].link_incoming(Slot(from));
        }
        GraphLayer::new(wrappers).unwrap()
    }

    /// Groups every pair of wrappers sharing one predecessor and one successor.
    struct Bubbles;

    impl CombineRule for Bubbles {
        fn variant(&self) -> Variant {
            Variant::Vertical
        }

        fn find_groups(&self, layer: &GraphLayer) -> Vec<Vec<Slot>> {
            let mut groups: Vec<(Vec<Slot>, Vec<Slot>, Vec<Slot>)> = Vec::new();
            for (i, w) in layer.wrappers().iter().enumerate() {
                if w.incoming().len() != 1 || w.outgoing().len() != 1 {
                    continue;
                }
                match groups
                    .iter_mut()
                    .find(|(inc, out, _)| inc == w.incoming() && out == w.outgoing())
                {
                    Some((_, _, members)) => members.push(Slot(i)),
                    None => groups.push((
                        w.incoming().to_vec(),
                        w.outgoing().to_vec(),
                        vec![Slot(i)],
                    )),
                }
            }
            groups.into_iter().map(|(_, _, members)| members).collect()
        }
    }

    struct Fixed(Vec<Vec<Slot>>, Variant);

    impl CombineRule for Fixed {
        fn variant(&self) -> Variant {
            self.1
        }

        fn find_groups(&self, _layer: &GraphLayer) -> Vec<Vec<Slot>> {
            self.0.clone()
        }
    }

    #[test]
    fn test_vertical_group_reconnects_union() {
        // 0 -> {1, 2} -> 3
        let layer = make_layer(
            &[(0, &["g1", "g2"], 2), (1, &["g1"], 3), (2, &["g2"], 5), (3, &["g1", "g2"], 1)],
            &[(0, 1), (0, 2), (1, 3), (2, 3)],
        );
        let merged = collapse(&layer, &Bubbles).unwrap().into_layer().unwrap();

        assert_eq!(merged.len(), 3);
        let group = merged.get(Slot(1)).unwrap();
        assert_eq!(group.variant(), Variant::Vertical);
        assert_eq!(group.incoming(), &[Slot(0)]);
        assert_eq!(group.outgoing(), &[Slot(2)]);
        assert_eq!(group.base_pair_count(), 5);

        // Two parallel edges into the group fold into one weighted edge
        let source = merged.get(Slot(0)).unwrap();
        assert_eq!(source.outgoing(), &[Slot(1)]);
        assert_eq!(source.outgoing_weight(), &[2]);
        assert_eq!(merged.get(Slot(2)).unwrap().incoming(), &[Slot(1)]);
        assert_eq!(merged.longest_path(), 2);
    }

    #[test]
    fn test_source_layer_left_untouched() {
        let layer = make_layer(
            &[(0, &["g1"], 2), (1, &["g1"], 3), (2, &["g1"], 4)],
            &[(0, 1), (1, 2)],
        );
        let before = layer.fingerprint();
        let merged = collapse_horizontal(&layer).unwrap().into_layer().unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(layer.len(), 3);
        assert_eq!(layer.fingerprint(), before);
    }

    #[test]
    fn test_empty_rule_is_fixpoint() {
        let layer = make_layer(&[(0, &["g1"], 2), (1, &["g1"], 3)], &[(0, 1)]);
        let outcome = collapse(&layer, &Fixed(vec![vec![Slot(1)]], Variant::Combine)).unwrap();
        assert!(outcome.is_fixpoint());
    }

    #[test]
    fn test_invalid_groups_rejected() {
        let layer = make_layer(
            &[(0, &["g1"], 2), (1, &["g1"], 3), (2, &["g1"], 1)],
            &[(0, 1), (1, 2)],
        );

        let overlapping = Fixed(
            vec![vec![Slot(0), Slot(1)], vec![Slot(1), Slot(2)]],
            Variant::Combine,
        );
        assert_eq!(
            collapse(&layer, &overlapping).unwrap_err(),
            LayerError::OverlappingGroups(Slot(1))
        );

        let dangling = Fixed(vec![vec![Slot(0), Slot(8)]], Variant::Combine);
        assert_eq!(
            collapse(&layer, &dangling).unwrap_err(),
            LayerError::DanglingReference(Slot(8))
        );

        let leaf = Fixed(vec![vec![Slot(0), Slot(1)]], Variant::Leaf);
        assert_eq!(
            collapse(&layer, &leaf).unwrap_err(),
            LayerError::NotComposite(Variant::Leaf)
        );
    }

    #[test]
    fn test_kept_wrapper_interest_starts_over() {
        let mut layer = make_layer(
            &[(0, &["g1"], 2), (1, &["g1"], 3), (2, &["g2"], 4), (3, &["g1"], 1)],
            &[(0, 1), (0, 2), (1, 3), (2, 3)],
        );

        struct Bump;
        impl crate::wrapper::WrapperOperation for Bump {
            fn leaf(&mut self, wrapper: &mut Wrapper, _container: Option<&Wrapper>) {
                wrapper.add_interest(2.0);
            }
        }
        layer.calculate(&mut Bump);

        let merged = collapse(&layer, &Fixed(vec![vec![Slot(1), Slot(2)]], Variant::Combine))
            .unwrap()
            .into_layer()
            .unwrap();
        assert_eq!(layer.get(Slot(0)).unwrap().interest(), 3.0);

        // Kept wrapper and new composite start from the same baseline
        let kept = merged.get(Slot(0)).unwrap();
        let composite = merged.get(Slot(1)).unwrap();
        assert_eq!(kept.interest(), crate::wrapper::DEFAULT_INTEREST);
        assert_eq!(composite.interest(), crate::wrapper::DEFAULT_INTEREST);
    }

    /// Rewires the sink after ranking.
    struct Rewire;

    impl crate::wrapper::WrapperOperation for Rewire {
        fn leaf(&mut self, wrapper: &mut Wrapper, _container: Option<&Wrapper>) {
            if wrapper.outgoing().is_empty() {
                wrapper.link_outgoing(Slot(999), 1);
            }
        }
    }

    #[test]
    fn test_out_of_range_edge_is_an_error() {
        let mut layer = make_layer(
            &[(0, &["g1"], 2), (1, &["g1"], 3), (2, &["g1"], 4)],
            &[(0, 1), (1, 2)],
        );
        layer.calculate(&mut Rewire);

        assert_eq!(
            collapse_horizontal(&layer).unwrap_err(),
            LayerError::DanglingReference(Slot(999))
        );
    }
}
