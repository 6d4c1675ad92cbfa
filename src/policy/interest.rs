//! Group-divergence interest scoring.
//!
//! A wrapper whose genomes come from two or more cohorts marks a region
//! where the cohorts diverge. Such wrappers get extra interest so the
//! renderer keeps them visually distinct instead of collapsing them further.
//! Wrappers within a single cohort are left alone.

use crate::types::GenomeSet;
use crate::wrapper::{Wrapper, WrapperOperation};

/// Adds a fixed increment to every wrapper that spans at least two groups.
///
/// Scores accumulate: running the pass twice adds the increment twice.
#[derive(Debug, Clone)]
pub struct GroupInterest {
    groups: Vec<GenomeSet>,
    increment: f32,
    flagged: usize,
}

impl GroupInterest {
    /// Create a scorer over ordered cohorts.
    pub fn new(groups: Vec<GenomeSet>, increment: f32) -> Self {
        Self {
            groups,
            increment,
            flagged: 0,
        }
    }

    /// Whether `genomes` intersects at least two groups.
    pub fn is_interesting(&self, genomes: &GenomeSet) -> bool {
        let mut found = false;
        for group in &self.groups {
            if !group.is_disjoint(genomes) {
                if found {
                    return true;
                }
                found = true;
            }
        }
        false
    }

    /// Wrappers flagged so far.
    pub fn flagged(&self) -> usize {
        self.flagged
    }

    fn score(&mut self, wrapper: &mut Wrapper) {
        if self.is_interesting(wrapper.genomes()) {
            wrapper.add_interest(self.increment);
            self.flagged += 1;
        }
    }
}

impl WrapperOperation for GroupInterest {
    fn leaf(&mut self, wrapper: &mut Wrapper, _container: Option<&Wrapper>) {
        self.score(wrapper);
    }

    fn horizontal(&mut self, wrapper: &mut Wrapper, _container: Option<&Wrapper>) {
        self.score(wrapper);
    }

    fn vertical(&mut self, wrapper: &mut Wrapper, _container: Option<&Wrapper>) {
        self.score(wrapper);
    }

    // Fillers have no genomes; scored anyway so a filler variant carrying
    // genomes would be picked up.
    fn space(&mut self, wrapper: &mut Wrapper, _container: Option<&Wrapper>) {
        self.score(wrapper);
    }

    fn combine(&mut self, wrapper: &mut Wrapper, _container: Option<&Wrapper>) {
        self.score(wrapper);
    }
}
