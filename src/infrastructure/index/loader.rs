//! Corpus loading from the pre-built JSON collection

use std::path::Path;

use tracing::{info, warn};

use super::SimilarityIndex;
use crate::domain::corpus::EmbeddedFragment;
use crate::domain::DomainError;

/// Read a JSON array of fragments from `path`.
///
/// Fragments without an embedding are dropped.
pub async fn load_fragments(path: &Path) -> Result<Vec<EmbeddedFragment>, DomainError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::corpus(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let fragments: Vec<EmbeddedFragment> = serde_json::from_str(&raw).map_err(|e| {
        DomainError::corpus(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    let total = fragments.len();
    let fragments: Vec<EmbeddedFragment> = fragments
        .into_iter()
        .filter(|f| !f.embedding.is_empty())
        .collect();

    if fragments.len() < total {
        warn!(
            dropped = total - fragments.len(),
            "Dropped corpus fragments without embeddings"
        );
    }

    if let Some(first) = fragments.first() {
        let dimensions = first.dimensions();
        let mismatched = fragments
            .iter()
            .filter(|f| f.dimensions() != dimensions)
            .count();

        if mismatched > 0 {
            warn!(
                mismatched,
                dimensions, "Corpus fragments with inconsistent embedding dimensions will score 0"
            );
        }
    }

    Ok(fragments)
}

/// Build the index from `path`, starting empty if the corpus cannot be loaded.
///
/// An empty index keeps the service available; every retrieval then yields no
/// evidence.
pub async fn load_index_or_empty(path: &Path) -> SimilarityIndex {
    match load_fragments(path).await {
        Ok(fragments) => {
            info!(
                path = %path.display(),
                fragments = fragments.len(),
                "Corpus loaded"
            );
            SimilarityIndex::new(fragments)
        }
        Err(e) => {
            warn!(error = %e, "Starting with an empty similarity index");
            SimilarityIndex::empty()
        }
    }
}
