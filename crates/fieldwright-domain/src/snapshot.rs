//! Per-run view of the registry used for identity resolution

use crate::CanonicalField;
use std::collections::HashSet;

/// Ordered set of canonical names known to a processing run
///
/// Built from the registry when a run starts and extended with every field
/// the run creates, so later mentions in the same run see earlier creations.
/// Iteration follows creation order, which makes fuzzy-score ties resolve the
/// same way on every run.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    names: Vec<String>,
    index: HashSet<String>,
}

impl RegistrySnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from registry rows, ordered by creation ordinal
    pub fn from_fields(fields: &[CanonicalField]) -> Self {
        let mut ordered: Vec<&CanonicalField> = fields.iter().collect();
        ordered.sort_by_key(|field| field.ordinal);

        let mut snapshot = Self::new();
        for field in ordered {
            snapshot.push(field.canonical_name.clone());
        }
        snapshot
    }

    /// Append a name; returns false if it was already present
    pub fn push(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.index.contains(&name) {
            return false;
        }
        self.index.insert(name.clone());
        self.names.push(name);
        true
    }

    /// Check whether a name is known
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Names in creation order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of known names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names are known
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
