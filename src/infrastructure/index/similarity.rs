//! Exhaustive cosine-similarity search

use std::sync::Arc;

use crate::domain::corpus::EmbeddedFragment;

/// Added to the norm product so zero vectors score 0 instead of NaN
pub const SIMILARITY_EPSILON: f32 = 1e-10;

/// Cosine similarity `dot(a,b) / (|a|*|b| + eps)`.
///
/// Vectors of different dimensionality score `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    let score = dot_product / (norm_a * norm_b + SIMILARITY_EPSILON);

    // Non-finite inputs collapse to 0; `+ 0.0` folds -0.0 into 0.0 so ties sort stably.
    if score.is_finite() { score + 0.0 } else { 0.0 }
}

/// A fragment paired with its similarity to the query vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub fragment: &'a EmbeddedFragment,
    pub score: f32,
}

/// Immutable collection of embedded fragments.
///
/// Cloning shares the underlying collection.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    fragments: Arc<[EmbeddedFragment]>,
}

impl SimilarityIndex {
    pub fn new(fragments: Vec<EmbeddedFragment>) -> Self {
        Self {
            fragments: fragments.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> &[EmbeddedFragment] {
        &self.fragments
    }

    /// Dimensionality of the collection, taken from its first fragment
    pub fn dimensions(&self) -> Option<usize> {
        self.fragments.first().map(EmbeddedFragment::dimensions)
    }

    /// Score every fragment against `query`, highest first.
    ///
    /// The sort is stable, so equal scores keep collection order.
    pub fn nearest(&self, query: &[f32]) -> Vec<Neighbor<'_>> {
        let mut neighbors: Vec<Neighbor<'_>> = self
            .fragments
            .iter()
            .map(|fragment| Neighbor {
                fragment,
                score: cosine_similarity(query, &fragment.embedding),
            })
            .collect();

        neighbors.sort_by(|a, b| b.score.total_cmp(&a.score));
        neighbors
    }
}

impl From<Vec<EmbeddedFragment>> for SimilarityIndex {
    fn from(fragments: Vec<EmbeddedFragment>) -> Self {
        Self::new(fragments)
    }
}
