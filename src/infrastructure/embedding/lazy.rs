//! Process-wide embedding handle created on first use

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use tracing::info;

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

type ProviderFactory = dyn Fn() -> Result<Arc<dyn EmbeddingProvider>, DomainError> + Send + Sync;

/// Embedding provider that builds its inner provider exactly once.
///
/// Concurrent first calls block on the same initialisation; a failed
/// initialisation is not cached and is retried on the next call.
pub struct LazyEmbeddingProvider {
    inner: OnceCell<Arc<dyn EmbeddingProvider>>,
    factory: Box<ProviderFactory>,
}

impl LazyEmbeddingProvider {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn EmbeddingProvider>, DomainError> + Send + Sync + 'static,
    {
        Self {
            inner: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.get().is_some()
    }

    fn provider(&self) -> Result<&Arc<dyn EmbeddingProvider>, DomainError> {
        self.inner.get_or_try_init(|| {
            let provider = (self.factory)()?;
            info!(provider = provider.provider_name(), "Embedding provider initialized");
            Ok(provider)
        })
    }
}

impl fmt::Debug for LazyEmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyEmbeddingProvider")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[async_trait]
impl EmbeddingProvider for LazyEmbeddingProvider {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let provider = Arc::clone(self.provider()?);
        provider.embed(request).await
    }

    fn provider_name(&self) -> &'static str {
        "lazy"
    }
}
