//! Fieldwright Ingest
//!
//! Orchestrates the path from raw template placeholders to registered
//! canonical fields and wide-table columns.
//!
//! # Architecture
//!
//! ```text
//! Mentions → IdentityResolver → (new) TypeInferencer → FieldRegistry
//!                                                   → SchemaSynchronizer
//! ```
//!
//! # Key Features
//!
//! - **Read-your-writes runs**: fields created earlier in a run are visible
//!   to every later mention of the same run
//! - **Race-safe registration**: a lost registration adopts the winner's row
//! - **Metadata inference**: data type, tooltip and option set from raw text
//! - **Choose-one groups**: placeholders following a `CHOOSE ONE` instruction
//! - **Failure isolation**: a bad mention is reported and the run continues
//!
//! # Example Usage
//!
//! ```no_run
//! use fieldwright_ingest::{DocumentRequest, IngestConfig, Ingestor, Mention};
//! use fieldwright_store::SqliteStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("registry.db")?;
//! let ingestor = Ingestor::new(store, IngestConfig::default())?;
//!
//! let report = ingestor.run(vec![DocumentRequest {
//!     source_file: "complaint.docx".to_string(),
//!     mentions: vec![Mention::new("Plaintiff Name"), Mention::new("Case No.")],
//! }])?;
//!
//! println!("{}", report.metrics.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod groups;
pub mod inference;
mod ingestor;
mod metrics;
mod types;

#[cfg(test)]
mod tests;

pub use config::{default_type_rules, DataTypeRule, IngestConfig, MAX_OPTION_SEGMENTS};
pub use error::IngestError;
pub use ingestor::{IngestRun, Ingestor, Preview};
pub use metrics::RunMetrics;
pub use types::{
    ColumnFailure, Disposition, DocumentReport, DocumentRequest, FailureReason, Mention,
    MentionFailure, MentionOutcome, ReconcileReport, RunReport,
};
