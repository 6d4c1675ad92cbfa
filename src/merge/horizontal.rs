//! Horizontal compaction: maximal singly-linked chains.
//!
//! ## Eligibility
//!
//! - Right of `n`: `next = n.outgoing[0]` joins when `n` has exactly one
//!   successor and `next` has exactly one predecessor.
//! - Left of `n`: the sole predecessor joins under the same degree
//!   condition, and only when its genome set equals the genome set of `n`.
//!
//! Genome equality is checked only when growing left. Growing right from a
//! start node takes any degree-eligible successor, so which chains form can
//! depend on scan order. A wrapper never joins a second chain.

use std::collections::VecDeque;

use crate::layer::GraphLayer;
use crate::wrapper::{Slot, Variant, Wrapper};
use super::CombineRule;

/// Combine rule producing [`Variant::Horizontal`] composites.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalChains;

impl CombineRule for HorizontalChains {
    fn variant(&self) -> Variant {
        Variant::Horizontal
    }

    fn find_groups(&self, layer: &GraphLayer) -> Vec<Vec<Slot>> {
        find_chains(layer.wrappers())
    }
}

/// Find every chain of two or more wrappers, members head first.
///
/// Wrappers are scanned in slot order; every wrapper is considered once,
/// either as a start node or as a member of an earlier chain.
pub fn find_chains(wrappers: &[Wrapper]) -> Vec<Vec<Slot>> {
    let mut visited = vec![false; wrappers.len()];
    let mut chains = Vec::new();

    for start in 0..wrappers.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut chain = VecDeque::from([Slot(start)]);

        let mut node = start;
        while let Some(next) = right_of(wrappers, node) {
            if visited[next] {
                break;
            }
            visited[next] = true;
            chain.push_back(Slot(next));
            node = next;
        }

        node = start;
        while let Some(prev) = left_of(wrappers, node) {
            if visited[prev] {
                break;
            }
            visited[prev] = true;
            chain.push_front(Slot(prev));
            node = prev;
        }

        if chain.len() > 1 {
            tracing::trace!(head = start, members = chain.len(), "chain found");
            chains.push(chain.into());
        }
    }

    chains
}

fn right_of(wrappers: &[Wrapper], node: usize) -> Option<usize> {
    match wrappers[node].outgoing() {
        [next] if wrappers.get(next.0)?.incoming().len() == 1 => Some(next.0),
        _ => None,
    }
}

fn left_of(wrappers: &[Wrapper], node: usize) -> Option<usize> {
    match wrappers[node].incoming() {
        [prev] => {
            let candidate = wrappers.get(prev.0)?;
            let eligible = candidate.outgoing().len() == 1
                && candidate.genomes() == wrappers[node].genomes();
            eligible.then_some(prev.0)
        }
        _ => None,
    }
}
