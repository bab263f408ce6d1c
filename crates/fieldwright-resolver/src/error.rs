//! Resolver error types

use thiserror::Error;

/// Errors that can occur while building a resolver
///
/// Resolution itself never fails; these only arise from bad configuration.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A phrase could not be compiled into a pattern
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}
