//! Tiered identity resolution

use crate::fuzzy::token_sort_ratio;
use crate::similarity::{DisabledScorer, SimilarityScorer};
use crate::{Normalizer, ResolverConfig, ResolverError};
use fieldwright_domain::RegistrySnapshot;
use tracing::{debug, warn};

/// How a mention matched an existing field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchTier {
    /// Normalized text equals the canonical name
    Exact,

    /// Accepted on token-sort ratio alone
    Fuzzy {
        /// Ratio (0-100)
        score: f64,
    },

    /// Fuzzy candidate confirmed by the similarity backend
    Semantic {
        /// Ratio (0-100)
        score: f64,
        /// Cosine similarity
        similarity: f32,
    },
}

/// Outcome of resolving one mention
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The mention names an existing field
    Matched {
        /// Existing canonical name
        canonical_name: String,
        /// Tier that produced the match
        tier: MatchTier,
    },

    /// No existing field matched; the normalized key is the new name
    New {
        /// Proposed canonical name
        canonical_name: String,
    },
}

impl Resolution {
    /// Canonical name the mention resolved to
    pub fn canonical_name(&self) -> &str {
        match self {
            Resolution::Matched { canonical_name, .. } | Resolution::New { canonical_name } => canonical_name,
        }
    }

    /// Whether a new field must be registered
    pub fn is_new(&self) -> bool {
        matches!(self, Resolution::New { .. })
    }
}

/// Maps raw mentions onto canonical identities
pub struct IdentityResolver {
    config: ResolverConfig,
    normalizer: Normalizer,
    scorer: Box<dyn SimilarityScorer>,
}

impl IdentityResolver {
    /// Create a resolver with the given similarity backend
    pub fn new(config: ResolverConfig, scorer: Box<dyn SimilarityScorer>) -> Result<Self, ResolverError> {
        config.validate()?;
        let normalizer = Normalizer::new(&config.phrase_substitutions)?;

        Ok(Self {
            config,
            normalizer,
            scorer,
        })
    }

    /// Create a resolver with semantic confirmation disabled
    pub fn without_semantics(config: ResolverConfig) -> Result<Self, ResolverError> {
        Self::new(config, Box::new(DisabledScorer))
    }

    /// Active configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Name of the similarity backend
    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Whether fuzzy candidates go through semantic confirmation
    pub fn semantics_active(&self) -> bool {
        self.config.semantics_enabled && self.scorer.is_available()
    }

    /// Normalize a raw mention without resolving it
    pub fn normalize(&self, raw: &str) -> String {
        self.normalizer.normalize(raw)
    }

    /// Resolve a raw mention against the snapshot
    ///
    /// Never fails. The snapshot must include every field created earlier in
    /// the same run.
    pub fn resolve(&self, raw: &str, snapshot: &RegistrySnapshot) -> Resolution {
        let key = self.normalizer.normalize(raw);

        if snapshot.contains(&key) {
            return Resolution::Matched {
                canonical_name: key,
                tier: MatchTier::Exact,
            };
        }

        let Some((candidate, score)) = self.best_candidate(&key, snapshot) else {
            return Resolution::New { canonical_name: key };
        };

        if !self.semantics_active() {
            debug!("Fuzzy match '{}' -> '{}' ({:.1})", key, candidate, score);
            return Resolution::Matched {
                canonical_name: candidate.to_string(),
                tier: MatchTier::Fuzzy { score },
            };
        }

        match self.scorer.similarity(&key, candidate) {
            Ok(similarity) if f64::from(similarity) >= self.config.semantic_threshold => {
                debug!(
                    "Semantic match '{}' -> '{}' ({:.1}, {:.3})",
                    key, candidate, score, similarity
                );
                Resolution::Matched {
                    canonical_name: candidate.to_string(),
                    tier: MatchTier::Semantic { score, similarity },
                }
            }
            Ok(similarity) => {
                debug!(
                    "Semantic check rejected '{}' -> '{}' ({:.3} < {})",
                    key, candidate, similarity, self.config.semantic_threshold
                );
                Resolution::New { canonical_name: key }
            }
            Err(e) => {
                warn!("Similarity backend '{}' failed, treating as rejection: {}", self.scorer.name(), e);
                Resolution::New { canonical_name: key }
            }
        }
    }

    /// Highest-scoring name at or above the fuzzy threshold
    ///
    /// Ties go to the name created first.
    fn best_candidate<'a>(&self, key: &str, snapshot: &'a RegistrySnapshot) -> Option<(&'a str, f64)> {
        let mut best: Option<(&str, f64)> = None;

        for name in snapshot.iter() {
            let score = token_sort_ratio(key, name);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((name, score));
            }
        }

        best.filter(|(_, score)| *score >= f64::from(self.config.fuzzy_threshold))
    }
}
