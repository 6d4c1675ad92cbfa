//! Zoom stack: every granularity of one snapshot.
//!
//! Level 0 is the leaf layer. Each further level is one horizontal
//! compaction pass over the previous one, so levels get strictly coarser
//! until the fixpoint or the policy's `max_levels` cap. Earlier levels are
//! never modified by later passes.

use crate::layer::{GraphLayer, LayerError};
use crate::merge::{collapse_horizontal, MergeOutcome};
use crate::policy::{GroupInterest, PolicyError, ZoomPolicy};
use crate::types::{GraphSnapshot, SnapshotError};

/// Error type for zoom stack construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZoomError {
    /// The snapshot is invalid.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    /// Layering or compaction failed.
    #[error("Layer error: {0}")]
    Layer(#[from] LayerError),
    /// The policy is invalid.
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),
}

/// Ordered layers, finest first.
#[derive(Debug, Clone)]
pub struct ZoomStack {
    levels: Vec<GraphLayer>,
    reached_fixpoint: bool,
    policy_hash: String,
}

impl ZoomStack {
    /// Build all levels for `snapshot` under `policy`.
    ///
    /// When the policy names two or more genome groups, every level is
    /// scored once with [`GroupInterest`] right after it is built.
    pub fn build(snapshot: &GraphSnapshot, policy: &ZoomPolicy) -> Result<Self, ZoomError> {
        policy.validate()?;

        let mut scorer = policy
            .scores_groups()
            .then(|| GroupInterest::new(policy.groups.clone(), policy.group_interest));

        let mut current = GraphLayer::from_snapshot(snapshot)?;
        if let Some(scorer) = scorer.as_mut() {
            current.calculate(scorer);
        }
        log_level(0, &current);

        let mut levels = Vec::new();
        let mut reached_fixpoint = false;
        while levels.len() + 1 < policy.max_levels {
            match collapse_horizontal(&current)? {
                MergeOutcome::Merged(mut next) => {
                    if let Some(scorer) = scorer.as_mut() {
                        next.calculate(scorer);
                    }
                    log_level(levels.len() + 1, &next);
                    levels.push(std::mem::replace(&mut current, next));
                }
                MergeOutcome::Fixpoint => {
                    reached_fixpoint = true;
                    break;
                }
            }
        }
        levels.push(current);

        tracing::debug!(
            snapshot_id = snapshot.snapshot_id(),
            levels = levels.len(),
            reached_fixpoint,
            flagged = scorer.as_ref().map_or(0, GroupInterest::flagged),
            "zoom stack built"
        );

        Ok(Self {
            levels,
            reached_fixpoint,
            policy_hash: policy.params_hash(),
        })
    }

    /// All levels, finest first.
    pub fn levels(&self) -> &[GraphLayer] {
        &self.levels
    }

    /// Level `index`, 0 being the leaf layer.
    pub fn level(&self, index: usize) -> Option<&GraphLayer> {
        self.levels.get(index)
    }

    /// The leaf layer.
    pub fn finest(&self) -> &GraphLayer {
        &self.levels[0]
    }

    /// The last level built.
    pub fn coarsest(&self) -> &GraphLayer {
        &self.levels[self.levels.len() - 1]
    }

    /// Number of levels, at least 1.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false: a stack holds at least the leaf layer.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Whether building stopped at the fixpoint rather than the level cap.
    pub fn reached_fixpoint(&self) -> bool {
        self.reached_fixpoint
    }

    /// Params hash of the policy the stack was built with.
    pub fn policy_hash(&self) -> &str {
        &self.policy_hash
    }

    /// Finest level with at most `max_wrappers` wrappers.
    ///
    /// Returns `None` when even the coarsest level is larger.
    pub fn level_for_budget(&self, max_wrappers: usize) -> Option<&GraphLayer> {
        self.levels.iter().find(|layer| layer.len() <= max_wrappers)
    }
}

fn log_level(level: usize, layer: &GraphLayer) {
    tracing::debug!(
        level,
        wrappers = layer.len(),
        longest_path = layer.longest_path(),
        size = layer.size(),
        "zoom level built"
    );
}
