//! Fieldwright Identity Resolver
//!
//! Decides whether a raw placeholder mention names a field that already
//! exists in the registry or a new one.
//!
//! Resolution runs through tiers, first success wins:
//! - Normalization to canonical key form (phrase table, then folding)
//! - Exact match against the registry snapshot
//! - Token-sort fuzzy match above a threshold
//! - Optional semantic confirmation of the fuzzy candidate
//!
//! # Examples
//!
//! ```
//! use fieldwright_domain::RegistrySnapshot;
//! use fieldwright_resolver::{IdentityResolver, ResolverConfig};
//!
//! let resolver = IdentityResolver::without_semantics(ResolverConfig::default()).unwrap();
//! let mut snapshot = RegistrySnapshot::new();
//! snapshot.push("plaintiff_name");
//!
//! let resolution = resolver.resolve("Plaintiff Name:", &snapshot);
//! assert_eq!(resolution.canonical_name(), "plaintiff_name");
//! assert!(!resolution.is_new());
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod fuzzy;
pub mod normalize;
mod resolver;
pub mod similarity;

pub use config::{PhraseSubstitution, ResolverConfig};
pub use error::ResolverError;
pub use normalize::{fold_key, phrase_pattern, Normalizer};
pub use resolver::{IdentityResolver, MatchTier, Resolution};
pub use similarity::{DisabledScorer, EmbeddingScorer, SimilarityScorer};
