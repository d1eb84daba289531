//! Evidence retrieval with a threshold-and-fallback selection policy

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{DomainError, EmbeddingProvider, EmbeddingRequest, ScoredClause};
use crate::infrastructure::index::{Neighbor, SimilarityIndex};
use crate::infrastructure::observability::record_retrieval_fallback;

/// Selection policy applied to the ranked neighbours
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RetrievalPolicy {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,
    #[serde(default = "default_min_excerpt_chars")]
    pub min_excerpt_chars: usize,
}

fn default_top_k() -> usize {
    6
}

fn default_min_similarity() -> f32 {
    0.25
}

fn default_min_excerpt_chars() -> usize {
    11
}

impl Default for RetrievalPolicy {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_similarity: default_min_similarity(),
            min_excerpt_chars: default_min_excerpt_chars(),
        }
    }
}

impl RetrievalPolicy {
    /// Pick the evidence from neighbours ranked by descending score.
    ///
    /// Returns the selection and whether the fallback path was taken.
    pub fn select(&self, ranked: &[Neighbor<'_>]) -> (Vec<ScoredClause>, bool) {
        let primary: Vec<ScoredClause> = ranked
            .iter()
            .filter(|n| n.score >= self.min_similarity)
            .take(self.top_k)
            .filter(|n| n.fragment.text.trim().chars().count() >= self.min_excerpt_chars)
            .map(to_clause)
            .collect();

        if !primary.is_empty() || ranked.is_empty() {
            return (primary, false);
        }

        let fallback = ranked.iter().take(self.top_k).map(to_clause).collect();
        (fallback, true)
    }
}

fn to_clause(neighbor: &Neighbor<'_>) -> ScoredClause {
    ScoredClause::from_fragment(neighbor.fragment, neighbor.score)
}

/// Embeds a query and selects supporting clauses from the index
#[derive(Debug, Clone)]
pub struct ClauseRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    model: String,
    dimensions: Option<usize>,
    index: SimilarityIndex,
    policy: RetrievalPolicy,
}

impl ClauseRetriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        model: impl Into<String>,
        index: SimilarityIndex,
    ) -> Self {
        Self {
            embedder,
            model: model.into(),
            dimensions: None,
            index,
            policy: RetrievalPolicy::default(),
        }
    }

    pub fn with_dimensions(mut self, dimensions: Option<usize>) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_policy(mut self, policy: RetrievalPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    /// Retrieve up to `top_k` clauses for `query`.
    ///
    /// Embedding failures and query vectors that do not match the corpus
    /// dimensionality propagate; an empty index yields no clauses.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredClause>, DomainError> {
        if self.index.is_empty() {
            debug!("Similarity index is empty, no evidence retrieved");
            return Ok(Vec::new());
        }

        let mut request = EmbeddingRequest::single(&self.model, query);
        if let Some(dimensions) = self.dimensions {
            request = request.with_dimensions(dimensions);
        }

        let vector = self
            .embedder
            .embed(request)
            .await?
            .into_first_vector()
            .ok_or_else(|| {
                DomainError::provider(
                    self.embedder.provider_name(),
                    "Embedding response contained no vectors",
                )
            })?;

        if let Some(expected) = self.index.dimensions() {
            if vector.len() != expected {
                return Err(DomainError::configuration(format!(
                    "Embedding model '{}' returned {} dimensions, corpus has {}",
                    self.model,
                    vector.len(),
                    expected
                )));
            }
        }

        let ranked = self.index.nearest(&vector);
        let (clauses, used_fallback) = self.policy.select(&ranked);

        if used_fallback {
            info!(
                min_similarity = self.policy.min_similarity,
                returned = clauses.len(),
                "No clause passed the similarity threshold, using top-ranked fragments"
            );
            record_retrieval_fallback();
        }

        debug!(
            clauses = clauses.len(),
            best_score = clauses.first().map(|c| c.score),
            "Clauses retrieved"
        );

        Ok(clauses)
    }
}
