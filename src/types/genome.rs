//! Genome and label types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// One sequenced source contributing to the alignment.
///
/// Equality, ordering and hashing are by identifier only. The identifier is
/// reference counted so genome sets can be cloned freely between wrappers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Genome(Arc<str>);

impl Genome {
    /// Create a genome from its identifier.
    pub fn new(identifier: impl AsRef<str>) -> Self {
        Self(Arc::from(identifier.as_ref()))
    }

    /// Get the identifier.
    pub fn identifier(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Genome {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Ordered set of genomes. Ordered so that hashing and iteration are stable.
pub type GenomeSet = BTreeSet<Genome>;

/// Annotation label attached to a data node (gene names and markers).
///
/// Produced by the annotation collaborator; this crate only aggregates them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Label(String);

impl Label {
    /// Create a new label.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Label text.
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genome_equality_by_identifier() {
        let a = Genome::new("TKK_02_0001");
        let b = Genome::from("TKK_02_0001");
        assert_eq!(a, b);

        let mut set = GenomeSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_genome_set_is_ordered() {
        let set: GenomeSet = ["g3", "g1", "g2"].into_iter().map(Genome::new).collect();
        let ids: Vec<_> = set.iter().map(Genome::identifier).collect();
        assert_eq!(ids, vec!["g1", "g2", "g3"]);
    }
}
