//! Resolver configuration

use crate::ResolverError;
use serde::{Deserialize, Serialize};

/// One entry of the phrase-substitution table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseSubstitution {
    /// Phrase to look for, lowercase
    pub from: String,

    /// Replacement text
    pub to: String,
}

impl PhraseSubstitution {
    /// Create a substitution entry
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Configuration for identity resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Minimum token-sort ratio (0-100) for a fuzzy candidate
    pub fuzzy_threshold: u8,

    /// Minimum cosine similarity (0.0-1.0) to confirm a fuzzy candidate
    pub semantic_threshold: f64,

    /// Enable semantic confirmation when a scorer is available
    pub semantics_enabled: bool,

    /// Ordered phrase table applied during normalization
    pub phrase_substitutions: Vec<PhraseSubstitution>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 85,
            semantic_threshold: 0.85,
            semantics_enabled: false,
            phrase_substitutions: default_phrase_substitutions(),
        }
    }
}

impl ResolverConfig {
    /// Create a lenient configuration (merges more spellings)
    pub fn lenient() -> Self {
        Self {
            fuzzy_threshold: 80,
            ..Self::default()
        }
    }

    /// Create a strict configuration (semantic confirmation on)
    pub fn strict() -> Self {
        Self {
            fuzzy_threshold: 92,
            semantic_threshold: 0.90,
            semantics_enabled: true,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ResolverError> {
        if self.fuzzy_threshold > 100 {
            return Err(ResolverError::Config(format!(
                "fuzzy_threshold must be between 0 and 100, got {}",
                self.fuzzy_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.semantic_threshold) {
            return Err(ResolverError::Config(format!(
                "semantic_threshold must be between 0.0 and 1.0, got {}",
                self.semantic_threshold
            )));
        }

        if let Some(entry) = self.phrase_substitutions.iter().find(|e| e.from.trim().is_empty()) {
            return Err(ResolverError::Config(format!(
                "phrase substitution with empty pattern (replacement '{}')",
                entry.to
            )));
        }

        Ok(())
    }
}

/// Phrase table applied when no other is configured
///
/// Longer phrases come before their prefixes so "name of the" wins over
/// "name of".
pub fn default_phrase_substitutions() -> Vec<PhraseSubstitution> {
    [
        ("name of the", "name"),
        ("name of", "name"),
        ("date of the", "date"),
        ("e-mail", "email"),
        ("telephone", "phone"),
        ("tel.", "phone"),
        ("case no.", "case number"),
        ("cause no.", "cause number"),
        ("no.", "number"),
        ("#", "number"),
        ("d.o.b.", "date of birth"),
        ("dob", "date of birth"),
        ("zip code", "zip"),
        ("attorney for", "attorney"),
    ]
    .into_iter()
    .map(|(from, to)| PhraseSubstitution::new(from, to))
    .collect()
}
