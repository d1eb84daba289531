//! Embedding response types

use serde::{Deserialize, Serialize};

/// A single embedding vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    index: usize,
    embedding: Vec<f32>,
}

impl Embedding {
    pub fn new(index: usize, embedding: Vec<f32>) -> Self {
        Self { index, embedding }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn vector(&self) -> &[f32] {
        &self.embedding
    }

    pub fn into_vector(self) -> Vec<f32> {
        self.embedding
    }
}

/// Usage statistics for embedding request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingUsage {
    prompt_tokens: u32,
    total_tokens: u32,
}

impl EmbeddingUsage {
    pub fn new(prompt_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            total_tokens,
        }
    }

    pub fn total_tokens(&self) -> u32 {
        self.total_tokens
    }
}

/// Response from an embedding request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    model: String,
    data: Vec<Embedding>,
    usage: EmbeddingUsage,
}

impl EmbeddingResponse {
    pub fn new(model: String, data: Vec<Embedding>, usage: EmbeddingUsage) -> Self {
        Self { model, data, usage }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.data
    }

    pub fn usage(&self) -> &EmbeddingUsage {
        &self.usage
    }

    /// Consume the response and return the vector at position 0 of the batch
    pub fn into_first_vector(self) -> Option<Vec<f32>> {
        self.data
            .into_iter()
            .min_by_key(|e| e.index())
            .map(Embedding::into_vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_first_vector_uses_lowest_index() {
        let response = EmbeddingResponse::new(
            "test-model".into(),
            vec![
                Embedding::new(1, vec![0.3, 0.4]),
                Embedding::new(0, vec![0.1, 0.2]),
            ],
            EmbeddingUsage::new(4, 4),
        );

        assert_eq!(response.usage().total_tokens(), 4);
        assert_eq!(response.into_first_vector(), Some(vec![0.1, 0.2]));
    }

    #[test]
    fn test_into_first_vector_empty() {
        let response =
            EmbeddingResponse::new("m".into(), vec![], EmbeddingUsage::new(0, 0));

        assert!(response.into_first_vector().is_none());
    }
}
