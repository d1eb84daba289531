//! Embedding provider implementations

mod lazy;
mod openai;

pub use lazy::LazyEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;

// Re-export HTTP client for use by embedding providers
pub use super::llm::{HttpClient, HttpClientTrait};
