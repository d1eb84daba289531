//! Application state for shared services

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DecisionResult, DomainError};
use crate::infrastructure::services::AdjudicationPipeline;

#[cfg(test)]
use mockall::automock;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub query_service: Arc<dyn QueryServiceTrait>,
}

impl AppState {
    pub fn new(query_service: Arc<dyn QueryServiceTrait>) -> Self {
        Self { query_service }
    }
}

/// Trait for the query adjudication service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QueryServiceTrait: Send + Sync {
    async fn handle(&self, query: &str) -> Result<DecisionResult, DomainError>;

    /// Number of fragments in the similarity index
    fn index_size(&self) -> usize;

    fn audit_backend(&self) -> &'static str;
}

#[async_trait]
impl QueryServiceTrait for AdjudicationPipeline {
    async fn handle(&self, query: &str) -> Result<DecisionResult, DomainError> {
        AdjudicationPipeline::handle(self, query).await
    }

    fn index_size(&self) -> usize {
        self.index().len()
    }

    fn audit_backend(&self) -> &'static str {
        AdjudicationPipeline::audit_backend(self)
    }
}
