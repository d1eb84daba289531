//! Read-only similarity index over the embedded corpus

mod loader;
mod similarity;

pub use loader::{load_fragments, load_index_or_empty};
pub use similarity::{cosine_similarity, Neighbor, SimilarityIndex, SIMILARITY_EPSILON};
