//! Embedding Model for Text Vectorization
//!
//! Converts field names into vectors so semantic confirmation can compare
//! two spellings without a network round trip.
//!
//! # Architecture
//!
//! - **EmbeddingModel**: the trait every backend implements
//! - **FeatureHashModel**: local bag-of-words plus character trigrams hashed
//!   into a fixed number of signed buckets
//!
//! # Examples
//!
//! ```rust
//! use fieldwright_store::embedding::{cosine_similarity, EmbeddingModel, FeatureHashModel};
//!
//! let model = FeatureHashModel::new(384);
//! let a = model.embed("plaintiff name").unwrap();
//! let b = model.embed("name plaintiff").unwrap();
//! assert!(cosine_similarity(&a, &b).unwrap() > 0.99);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Default vector width
pub const DEFAULT_DIMENSION: usize = 384;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Model not loaded
    #[error("Embedding model not loaded")]
    ModelNotLoaded,

    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model inference error
    #[error("Model inference failed: {0}")]
    InferenceFailed(String),

    /// Vectors of different widths were compared
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Width of the first vector
        expected: usize,
        /// Width of the second vector
        got: usize,
    },
}

/// Trait for embedding models
pub trait EmbeddingModel {
    /// Generate an embedding vector for the given text
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Get the dimension of embeddings produced by this model
    fn dimension(&self) -> usize;
}

/// Feature-hashing embedding model
///
/// Text is lowercased and underscores become spaces, so `plaintiff_name` and
/// `Plaintiff Name` embed identically. Each word contributes one feature and
/// each character trigram of ` word ` contributes a lighter one, which keeps
/// plurals and single-letter typos close. Features are hashed into signed
/// buckets and the result is normalized to unit length.
#[derive(Debug, Clone)]
pub struct FeatureHashModel {
    dimension: usize,
}

impl FeatureHashModel {
    /// Create a new model with the given vector width
    pub fn new(dimension: usize) -> Self {
        Self { dimension: dimension.max(1) }
    }

    fn bucket(&self, feature: &str) -> (usize, f32) {
        let mut hasher = DefaultHasher::new();
        feature.hash(&mut hasher);
        let hash = hasher.finish();

        let index = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }

    fn add(&self, embedding: &mut [f32], feature: &str, weight: f32) {
        let (index, sign) = self.bucket(feature);
        embedding[index] += sign * weight;
    }
}

impl Default for FeatureHashModel {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl EmbeddingModel for FeatureHashModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let folded = text.to_lowercase().replace('_', " ");
        let words: Vec<&str> = folded.split_whitespace().collect();
        if words.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Empty text cannot be embedded".to_string(),
            ));
        }

        let mut embedding = vec![0.0f32; self.dimension];
        for word in &words {
            self.add(&mut embedding, &format!("w:{}", word), WORD_WEIGHT);

            let padded: Vec<char> = format!(" {} ", word).chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.add(&mut embedding, &format!("t:{}", trigram), TRIGRAM_WEIGHT);
            }
        }

        // Normalize to unit length for cosine similarity
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Calculate cosine similarity between two embedding vectors
///
/// Returns a value in [-1, 1]; zero vectors compare as 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (mag_a * mag_b)).clamp(-1.0, 1.0))
}
