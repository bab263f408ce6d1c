//! Fieldwright Domain Layer
//!
//! Core model for turning free-text placeholder mentions from legal form
//! templates into a registry of canonical fields. This crate holds value
//! objects and the trait boundaries every other layer depends upon; storage,
//! matching and orchestration live in other crates.
//!
//! ## Key Concepts
//!
//! - **Mention**: one raw occurrence of a placeholder string in a document
//! - **Canonical field**: the deduplicated identity one or more mentions map to
//! - **Synonym**: a recorded raw-text variant observed for a canonical field
//! - **Option**: one element of a bounded choice set (`Yes|No`, `Plaintiff/Defendant`)
//! - **Schema column**: the physical value slot a field owns in the wide table
//!
//! ## Architecture
//!
//! - Only `uuid` as an external dependency
//! - Pure business logic only
//! - Trait definitions for registry and schema storage

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod data_type;
pub mod field;
pub mod group;
pub mod run;
pub mod schema;
pub mod snapshot;
pub mod traits;

// Re-exports for convenience
pub use data_type::DataType;
pub use field::{CanonicalField, FieldOption, Synonym};
pub use group::ParagraphGroup;
pub use run::RunId;
pub use schema::{physical_name, ColumnOutcome, PhysicalType, SchemaColumn, RESERVED_COLUMNS};
pub use snapshot::RegistrySnapshot;
pub use traits::{FieldRegistry, SchemaSynchronizer};
