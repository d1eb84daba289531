use serde::{Deserialize, Serialize};

/// A chunk of source-document text paired with its precomputed embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedFragment {
    /// Source document name
    pub dataset: String,
    /// Stable identifier, unique within `dataset`
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

impl EmbeddedFragment {
    pub fn new(
        dataset: impl Into<String>,
        id: impl Into<String>,
        text: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            id: id.into(),
            text: text.into(),
            embedding,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }
}
