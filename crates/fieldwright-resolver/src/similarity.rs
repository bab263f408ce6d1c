//! Semantic similarity backends
//!
//! The resolver asks a [`SimilarityScorer`] to confirm fuzzy candidates. The
//! scorer is chosen when the resolver is built; [`DisabledScorer`] stands in
//! when no backend is configured.

use fieldwright_store::embedding::{cosine_similarity, EmbeddingError, EmbeddingModel};

/// Scores how close two canonical keys are in meaning
pub trait SimilarityScorer: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Whether the backend can score right now
    fn is_available(&self) -> bool;

    /// Cosine similarity of the two texts, in [-1, 1]
    fn similarity(&self, a: &str, b: &str) -> Result<f32, EmbeddingError>;
}

/// Scorer used when semantic confirmation is off
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledScorer;

impl SimilarityScorer for DisabledScorer {
    fn name(&self) -> &str {
        "disabled"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn similarity(&self, _a: &str, _b: &str) -> Result<f32, EmbeddingError> {
        Err(EmbeddingError::ModelNotLoaded)
    }
}

/// Adapts any embedding model into a scorer
pub struct EmbeddingScorer<M> {
    model: M,
    name: String,
}

impl<M: EmbeddingModel> EmbeddingScorer<M> {
    /// Wrap a model
    pub fn new(model: M) -> Self {
        let name = format!("embedding-{}", model.dimension());
        Self { model, name }
    }

    /// The wrapped model
    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: EmbeddingModel + Send + Sync> SimilarityScorer for EmbeddingScorer<M> {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        true
    }

    fn similarity(&self, a: &str, b: &str) -> Result<f32, EmbeddingError> {
        let va = self.model.embed(a)?;
        let vb = self.model.embed(b)?;
        cosine_similarity(&va, &vb)
    }
}
