//! Error types for ingestion

use thiserror::Error;

/// Errors that stop a whole run
///
/// Problems with a single mention never surface here; they are recorded as
/// [`crate::MentionFailure`] entries in the run report.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Registry or schema store error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resolver could not be built
    #[error("Resolver error: {0}")]
    Resolver(#[from] fieldwright_resolver::ResolverError),

    /// Input cannot be processed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Store mutex was poisoned
    #[error("Store lock error: {0}")]
    Lock(String),
}
