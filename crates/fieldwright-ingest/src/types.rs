//! Request and report types for ingestion

use crate::metrics::RunMetrics;
use fieldwright_domain::{DataType, ParagraphGroup, RunId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One raw placeholder occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    /// Placeholder text as it appears in the template
    pub raw_text: String,

    /// Paragraph the placeholder sits in, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_index: Option<i64>,
}

impl Mention {
    /// Mention without paragraph information
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            paragraph_index: None,
        }
    }

    /// Mention located in a paragraph
    pub fn at(raw_text: impl Into<String>, paragraph_index: i64) -> Self {
        Self {
            raw_text: raw_text.into(),
            paragraph_index: Some(paragraph_index),
        }
    }
}

/// All mentions found in one template document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRequest {
    /// Template file the mentions came from
    pub source_file: String,

    /// Mentions in document order
    pub mentions: Vec<Mention>,
}

/// How a mention was attached to its field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Disposition {
    /// Normalized text equals an existing canonical name
    Exact,

    /// Fuzzy match to an existing field
    Fuzzy {
        /// Token-sort ratio (0-100)
        score: f64,
    },

    /// Fuzzy match confirmed by the similarity backend
    Semantic {
        /// Token-sort ratio (0-100)
        score: f64,
        /// Cosine similarity
        similarity: f32,
    },

    /// This mention created the field
    Created {
        /// Inferred type
        data_type: DataType,
    },

    /// Another writer registered the field first; its row was adopted
    Adopted {
        /// Type from the winning row
        data_type: DataType,
    },
}

impl Disposition {
    /// Short label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Disposition::Exact => "exact",
            Disposition::Fuzzy { .. } => "fuzzy",
            Disposition::Semantic { .. } => "semantic",
            Disposition::Created { .. } => "created",
            Disposition::Adopted { .. } => "adopted",
        }
    }
}

/// A mention that was attached to a field
#[derive(Debug, Clone, PartialEq)]
pub struct MentionOutcome {
    /// Raw text of the mention
    pub raw_text: String,

    /// Field the mention resolved to
    pub canonical_name: String,

    /// How it got there
    pub disposition: Disposition,

    /// Options recorded from this mention
    pub options: Vec<String>,
}

/// Why a mention could not be processed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Mention text is blank
    #[error("Mention is empty")]
    EmptyMention,

    /// Registry read or write failed
    #[error("Registry error: {0}")]
    Registry(String),

    /// Column could not be ensured
    #[error("Schema error: {0}")]
    Schema(String),

    /// Store mutex was poisoned
    #[error("Store lock error: {0}")]
    Lock(String),
}

/// A mention that failed; processing continued without it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionFailure {
    /// Raw text of the mention
    pub raw_text: String,

    /// Template file the mention came from
    pub source_file: String,

    /// Reason for failure
    pub reason: FailureReason,
}

/// Result of ingesting one document
#[derive(Debug, Clone, Default)]
pub struct DocumentReport {
    /// Template file
    pub source_file: String,

    /// Mentions attached to fields, in document order
    pub outcomes: Vec<MentionOutcome>,

    /// Choose-one groups recorded
    pub groups: Vec<ParagraphGroup>,

    /// Mentions that failed
    pub failures: Vec<MentionFailure>,
}

/// Result of a whole run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Run identifier
    pub run_id: RunId,

    /// Per-document results
    pub documents: Vec<DocumentReport>,

    /// Aggregated counters
    pub metrics: RunMetrics,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl RunReport {
    /// All failures across documents
    pub fn failures(&self) -> impl Iterator<Item = &MentionFailure> {
        self.documents.iter().flat_map(|d| d.failures.iter())
    }

    /// Names of fields this run created, in creation order
    pub fn created_fields(&self) -> Vec<&str> {
        self.documents
            .iter()
            .flat_map(|d| d.outcomes.iter())
            .filter(|o| matches!(o.disposition, Disposition::Created { .. }))
            .map(|o| o.canonical_name.as_str())
            .collect()
    }
}

/// A field whose column could not be ensured during reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFailure {
    /// Field name
    pub canonical_name: String,

    /// Error message
    pub reason: String,
}

/// Result of reconciling the wide table with the registry
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// Fields that were missing a column and got one
    pub created: Vec<String>,

    /// Fields whose column was already there
    pub already_present: usize,

    /// Fields that still have no column
    pub failures: Vec<ColumnFailure>,
}
