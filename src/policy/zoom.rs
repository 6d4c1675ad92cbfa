//! ZoomPolicy: how many compaction levels to build and how to score them.
//!
//! ## Float Normalization for Deterministic Hashing
//!
//! `group_interest` is quantized before hashing (multiplied by 1e6 and
//! rounded to i64) so equal policies hash equally regardless of float
//! formatting.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::types::GenomeSet;
use crate::DEFAULT_POLICY_VERSION;

/// Quantization factor for float normalization.
const FLOAT_QUANTIZATION_FACTOR: f64 = 1_000_000.0;

/// Error type for invalid policies.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    /// At least one level is always built.
    #[error("max_levels must be at least 1")]
    NoLevels,
    /// Increment must be finite and non-negative.
    #[error("Invalid group interest increment: {0}")]
    InvalidInterest(f32),
    /// A configured group has no genomes.
    #[error("Genome group {0} is empty")]
    EmptyGroup(usize),
}

/// Zoom policy version 1.
///
/// ## Parameters
///
/// - `max_levels`: Cap on layers in a zoom stack, the leaf layer included
/// - `group_interest`: Interest added to wrappers spanning two or more groups
/// - `groups`: Ordered genome cohorts; empty disables scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoomPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Maximum number of layers to build.
    pub max_levels: usize,
    /// Interest increment for multi-cohort wrappers.
    pub group_interest: f32,
    /// Genome cohorts.
    #[serde(default)]
    pub groups: Vec<GenomeSet>,
}

/// Quantized policy parameters for deterministic hashing.
#[derive(Serialize)]
struct QuantizedPolicyParams<'a> {
    version: &'a str,
    max_levels: usize,
    group_interest: i64,
    groups: Vec<Vec<&'a str>>,
}

impl ZoomPolicy {
    /// Create a policy with the given cohorts and default limits.
    pub fn with_groups(groups: Vec<GenomeSet>, group_interest: f32) -> Self {
        Self {
            groups,
            group_interest,
            ..Self::default()
        }
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Check the parameters.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.max_levels == 0 {
            return Err(PolicyError::NoLevels);
        }
        if !self.group_interest.is_finite() || self.group_interest < 0.0 {
            return Err(PolicyError::InvalidInterest(self.group_interest));
        }
        if let Some(index) = self.groups.iter().position(|g| g.is_empty()) {
            return Err(PolicyError::EmptyGroup(index));
        }
        Ok(())
    }

    /// Whether a scoring pass should run.
    pub fn scores_groups(&self) -> bool {
        self.groups.len() >= 2
    }

    /// Hash of the policy parameters, stable across float formatting.
    pub fn params_hash(&self) -> String {
        let quantized = QuantizedPolicyParams {
            version: &self.version,
            max_levels: self.max_levels,
            group_interest: quantize_float(self.group_interest),
            groups: self
                .groups
                .iter()
                .map(|g| g.iter().map(|genome| genome.identifier()).collect())
                .collect(),
        };
        canonical_hash_hex(&quantized)
    }
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            max_levels: 32,
            group_interest: 1.0,
            groups: Vec::new(),
        }
    }
}

fn quantize_float(value: f32) -> i64 {
    ((value as f64) * FLOAT_QUANTIZATION_FACTOR).round() as i64
}
