//! Claim Adjudicator
//!
//! Answers natural-language insurance queries with a structured decision
//! grounded in retrieved policy clauses:
//! - Structured query extraction through a chat-completion model
//! - Clause retrieval over a pre-embedded fragment collection
//! - Adjudication with fallbacks for malformed model output
//! - Append-only audit trail of every handled query

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use api::state::AppState;
use domain::{AuditLogRepository, DomainError, EmbeddingProvider, LlmProvider};
use infrastructure::{
    audit::AuditStoreFactory,
    embedding::{LazyEmbeddingProvider, OpenAiEmbeddingProvider},
    index::load_index_or_empty,
    llm::{HttpClient, OpenAiProvider},
    services::{
        AdjudicationPipeline, Adjudicator, ClauseRetriever, CompletionSettings, QueryExtractor,
    },
};

/// Create the application state with the loaded configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let pipeline = create_pipeline(config).await?;
    Ok(AppState::new(Arc::new(pipeline)))
}

/// Build the pipeline with the configured providers, corpus and audit store
pub async fn create_pipeline(config: &AppConfig) -> anyhow::Result<AdjudicationPipeline> {
    let api_key = read_api_key(&config.llm.api_key_env)
        .context("Chat-completion provider is not configured")?;
    let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::with_base_url(
        HttpClient::new(),
        api_key,
        &config.llm.base_url,
    ));

    let embedding = config.embedding.clone();
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(LazyEmbeddingProvider::new(move || {
        let api_key = read_api_key(&embedding.api_key_env)?;
        Ok(Arc::new(OpenAiEmbeddingProvider::with_base_url(
            HttpClient::new(),
            api_key,
            &embedding.base_url,
        )) as Arc<dyn EmbeddingProvider>)
    }));

    let audit_log = AuditStoreFactory::create(&config.audit)
        .await
        .context("Failed to create audit log")?;

    assemble_pipeline(config, llm, embedder, audit_log).await
}

/// Wire the stages around already-built providers
pub async fn assemble_pipeline(
    config: &AppConfig,
    llm: Arc<dyn LlmProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    audit_log: Arc<dyn AuditLogRepository>,
) -> anyhow::Result<AdjudicationPipeline> {
    let index = load_index_or_empty(&config.corpus.path).await;

    let timeout = config.llm.stage_timeout();
    let extraction = CompletionSettings::new(
        "extraction",
        &config.llm.model,
        config.llm.extraction_max_tokens,
    )
    .with_temperature(config.llm.temperature)
    .with_timeout(timeout);
    let adjudication = CompletionSettings::new(
        "adjudication",
        &config.llm.model,
        config.llm.adjudication_max_tokens,
    )
    .with_temperature(config.llm.temperature)
    .with_timeout(timeout);

    let retriever = ClauseRetriever::new(embedder, &config.embedding.model, index)
        .with_dimensions(config.embedding.dimensions)
        .with_policy(config.retrieval);

    info!(
        model = %config.llm.model,
        embedding_model = %config.embedding.model,
        fragments = retriever.index().len(),
        top_k = config.retrieval.top_k,
        min_similarity = config.retrieval.min_similarity,
        audit_backend = audit_log.backend_name(),
        "Adjudication pipeline ready"
    );

    Ok(AdjudicationPipeline::new(
        QueryExtractor::new(Arc::clone(&llm), extraction),
        retriever,
        Adjudicator::new(llm, adjudication),
        audit_log,
    ))
}

fn read_api_key(env_var: &str) -> Result<String, DomainError> {
    std::env::var(env_var).map_err(|_| {
        DomainError::configuration(format!("Environment variable '{}' is not set", env_var))
    })
}
