//! Property tests: layering and compaction on random acyclic graphs.
//!
//! Graphs are generated with edges only from a lower to a higher node index,
//! so every input is a DAG. Repeated edges are allowed and fold into weight.

use pangraph_kernel::{
    collapse_horizontal, DataNode, Edge, Genome, GraphLayer, GraphSnapshot, MergeOutcome,
    NodeId, ZoomPolicy, ZoomStack,
};
use proptest::prelude::*;

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

const GENOMES: [&str; 3] = ["g0", "g1", "g2"];

/// Genome masks (1..=7) per node plus forward edges.
fn arb_dag() -> impl Strategy<Value = (Vec<u8>, Vec<(usize, usize)>)> {
    (1usize..24).prop_flat_map(|n| {
        let masks = prop::collection::vec(1u8..8, n);
        let edges = prop::collection::vec((0..n, 0..n), 0..n * 2).prop_map(|pairs| {
            pairs
                .into_iter()
                .filter(|(from, to)| from < to)
                .collect::<Vec<_>>()
        });
        (masks, edges)
    })
}

fn build_snapshot(masks: &[u8], edges: &[(usize, usize)]) -> GraphSnapshot {
    let nodes = masks
        .iter()
        .enumerate()
        .map(|(i, &mask)| {
            let genomes = GENOMES
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, id)| Genome::new(id))
                .collect();
            let len = 1 + i % 5;
            DataNode::new(NodeId(i as u32), genomes, 0, len as u64, vec![b'N'; len])
        })
        .collect();
    let edges = edges
        .iter()
        .map(|&(from, to)| Edge::new(from as u32, to as u32))
        .collect();
    GraphSnapshot::new(nodes, edges).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Property Tests
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    /// Every edge points from a lower to a strictly higher rank.
    #[test]
    fn ranks_respect_every_edge((masks, edges) in arb_dag()) {
        let snapshot = build_snapshot(&masks, &edges);
        let layer = GraphLayer::from_snapshot(&snapshot).unwrap();

        for &(from, to) in &edges {
            let r_from = layer.wrappers()[from].rank().unwrap();
            let r_to = layer.wrappers()[to].rank().unwrap();
            prop_assert!(r_from < r_to, "edge {} -> {}: {} >= {}", from, to, r_from, r_to);
        }
    }

    /// The returned longest path is the maximum rank.
    #[test]
    fn longest_path_is_max_rank((masks, edges) in arb_dag()) {
        let layer = GraphLayer::from_snapshot(&build_snapshot(&masks, &edges)).unwrap();
        let max_rank = layer.wrappers().iter().filter_map(|w| w.rank()).max().unwrap();
        prop_assert_eq!(max_rank, layer.longest_path());
    }

    /// Ranking the same input twice gives the same layer.
    #[test]
    fn layering_is_deterministic((masks, edges) in arb_dag()) {
        let snapshot = build_snapshot(&masks, &edges);
        let a = GraphLayer::from_snapshot(&snapshot).unwrap();
        let b = GraphLayer::from_snapshot(&snapshot).unwrap();
        prop_assert_eq!(a.fingerprint(), b.fingerprint());
    }

    /// Compaction keeps base pairs and genomes, and strictly shrinks the layer.
    #[test]
    fn merge_conserves_content((masks, edges) in arb_dag()) {
        let layer = GraphLayer::from_snapshot(&build_snapshot(&masks, &edges)).unwrap();

        if let MergeOutcome::Merged(merged) = collapse_horizontal(&layer).unwrap() {
            prop_assert!(merged.len() < layer.len());
            prop_assert_eq!(merged.total_base_pairs(), layer.total_base_pairs());
            prop_assert_eq!(merged.genomes(), layer.genomes());

            let mut contained: Vec<u32> = merged
                .wrappers()
                .iter()
                .flat_map(|w| w.data_nodes().iter().map(|n| n.id.get()))
                .collect();
            contained.sort_unstable();
            let expected: Vec<u32> = (0..masks.len() as u32).collect();
            prop_assert_eq!(contained, expected);
        }
    }

    /// Zoom levels get strictly coarser and keep the same content.
    #[test]
    fn zoom_levels_strictly_coarser((masks, edges) in arb_dag()) {
        let snapshot = build_snapshot(&masks, &edges);
        let stack = ZoomStack::build(&snapshot, &ZoomPolicy::default()).unwrap();

        prop_assert!(stack.reached_fixpoint());
        for pair in stack.levels().windows(2) {
            prop_assert!(pair[1].len() < pair[0].len());
            prop_assert_eq!(pair[1].total_base_pairs(), pair[0].total_base_pairs());
            prop_assert!(pair[1].longest_path() <= pair[0].longest_path());
        }
    }
}
