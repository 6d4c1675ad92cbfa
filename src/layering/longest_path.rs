//! Longest-path layering.
//!
//! ## Algorithm
//!
//! 1. Forward: sources start at rank 0. A wrapper is admitted to the
//!    frontier once all its predecessors were admitted, and is ranked
//!    `1 + max(rank(pred))` when polled. Sinks are seeded into the backward
//!    frontier.
//! 2. Backward: a wrapper is admitted once all its successors were
//!    admitted, and is moved to `min(rank(succ)) - 1`, as late as possible
//!    while staying left of every successor. Sinks keep their rank, so the
//!    longest path found by the forward pass is unchanged.
//!
//! Both frontiers are FIFO, so everything a wrapper depends on is polled
//! before the wrapper itself. O(V + E).

use crate::layer::LayerError;
use crate::wrapper::{Slot, Wrapper};
use super::dedup_queue::DedupQueue;

/// Rank every wrapper and return the longest path length (the maximum rank).
///
/// Any rank set by a previous run is discarded first, so ranking an
/// unmodified set twice gives identical results.
///
/// # Errors
///
/// - [`LayerError::EmptyLayer`] for an empty input.
/// - [`LayerError::DanglingReference`] when adjacency points outside `wrappers`.
/// - [`LayerError::CyclicInput`] when the forward pass cannot rank every
///   wrapper, which only happens on cyclic input.
pub fn compute_longest_paths(wrappers: &mut [Wrapper]) -> Result<u32, LayerError> {
    let total = wrappers.len();
    if total == 0 {
        return Err(LayerError::EmptyLayer);
    }
    check_references(wrappers)?;

    for wrapper in wrappers.iter_mut() {
        wrapper.reset_rank();
    }

    let mut forward: DedupQueue<Slot> = DedupQueue::with_capacity(total);
    let mut backward: DedupQueue<Slot> = DedupQueue::with_capacity(total);
    forward.add_all(
        wrappers
            .iter()
            .enumerate()
            .filter(|(_, w)| w.incoming().is_empty())
            .map(|(i, _)| Slot(i)),
    );

    let mut longest = 0;
    let mut ranked = 0;
    while let Some(slot) = forward.poll() {
        let rank = wrappers[slot.0]
            .incoming()
            .iter()
            .filter_map(|pred| wrappers[pred.0].rank())
            .map(|r| r + 1)
            .max()
            .unwrap_or(0);
        wrappers[slot.0].set_rank(rank);
        longest = longest.max(rank);
        ranked += 1;

        let wrapper = &wrappers[slot.0];
        if wrapper.outgoing().is_empty() {
            backward.add(slot);
        } else {
            for &next in wrapper.outgoing() {
                if forward.done_all(wrappers[next.0].incoming()) {
                    forward.add(next);
                }
            }
        }
    }

    if ranked != total {
        tracing::error!(ranked, total, "layering stopped early, input is not acyclic");
        return Err(LayerError::CyclicInput { ranked, total });
    }

    while let Some(slot) = backward.poll() {
        let latest = wrappers[slot.0]
            .outgoing()
            .iter()
            .filter_map(|succ| wrappers[succ.0].rank())
            .min();
        if let Some(latest) = latest {
            wrappers[slot.0].set_rank(latest.saturating_sub(1));
        }

        let wrapper = &wrappers[slot.0];
        for &prev in wrapper.incoming() {
            if backward.done_all(wrappers[prev.0].outgoing()) {
                backward.add(prev);
            }
        }
    }

    tracing::debug!(wrappers = total, longest_path = longest, "longest paths computed");
    Ok(longest)
}

fn check_references(wrappers: &[Wrapper]) -> Result<(), LayerError> {
    let total = wrappers.len();
    for wrapper in wrappers {
        let dangling = wrapper
            .incoming()
            .iter()
            .chain(wrapper.outgoing())
            .find(|slot| slot.0 >= total);
        if let Some(&slot) = dangling {
            return Err(LayerError::DanglingReference(slot));
        }
    }
    Ok(())
}
