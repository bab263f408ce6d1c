//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and storage.
//! Implementations live in other crates (fieldwright-store).

use crate::{CanonicalField, ColumnOutcome, DataType, FieldOption, ParagraphGroup, SchemaColumn, Synonym};

/// Authoritative, append-only store of canonical field identities
///
/// Every mutating method must be safe to call repeatedly with identical
/// arguments. When several callers register the same new name concurrently,
/// exactly one row is created and every other caller observes
/// `Ok(false)`, then re-reads the winner's row.
pub trait FieldRegistry {
    /// Error type for registry operations
    type Error;

    /// Check whether a canonical name is registered
    fn exists(&self, name: &str) -> Result<bool, Self::Error>;

    /// Register a canonical field; returns whether a row was inserted
    ///
    /// Registering a name that is already present is a successful no-op.
    fn register(&mut self, name: &str, data_type: DataType, tooltip: &str) -> Result<bool, Self::Error>;

    /// Get a field by canonical name
    fn get_field(&self, name: &str) -> Result<Option<CanonicalField>, Self::Error>;

    /// All fields, in creation order
    fn list_fields(&self) -> Result<Vec<CanonicalField>, Self::Error>;

    /// Record an observed spelling (idempotent on `(name, raw_text)`)
    fn add_synonym(&mut self, name: &str, raw_text: &str, source_file: &str) -> Result<(), Self::Error>;

    /// Record a choice-set element (idempotent on `(name, value)`)
    ///
    /// The caller bounds the size of the option set.
    fn add_option(&mut self, name: &str, value: &str, order: usize) -> Result<(), Self::Error>;

    /// Spellings recorded for a field
    fn synonyms(&self, name: &str) -> Result<Vec<Synonym>, Self::Error>;

    /// Options recorded for a field, in display order
    fn options(&self, name: &str) -> Result<Vec<FieldOption>, Self::Error>;

    /// Persist a choose-one group (idempotent)
    fn record_paragraph_group(&mut self, group: &ParagraphGroup) -> Result<(), Self::Error>;
}

/// Keeps the wide value table in step with the registry
pub trait SchemaSynchronizer {
    /// Error type for schema operations
    type Error;

    /// Make sure the field owns a physical column
    ///
    /// Succeeds when the column already exists. Any other failure, including
    /// a physical-name collision with a different field, is returned.
    fn ensure_column(&mut self, name: &str, data_type: DataType) -> Result<ColumnOutcome, Self::Error>;

    /// All bookkeeping rows, in creation order
    fn columns(&self) -> Result<Vec<SchemaColumn>, Self::Error>;
}
