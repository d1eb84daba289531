//! Single-prompt completion calls with an optional deadline

use std::time::{Duration, Instant};

use tracing::warn;

use crate::domain::{DomainError, FinishReason, LlmProvider, LlmRequest};
use crate::infrastructure::observability::{record_llm_request, LlmRequestMetricParams};

/// Sampling parameters for one pipeline stage
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub stage: &'static str,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Option<Duration>,
}

impl CompletionSettings {
    pub fn new(stage: &'static str, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            stage,
            model: model.into(),
            temperature: 0.0,
            max_tokens,
            timeout: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Ways a completion call can fail
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error(transparent)]
    Provider(#[from] DomainError),
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),
}

/// Send `prompt` as a single user message and return the completion text
pub async fn complete(
    provider: &dyn LlmProvider,
    settings: &CompletionSettings,
    prompt: String,
) -> Result<String, CompletionError> {
    let request = LlmRequest::builder()
        .user(prompt)
        .temperature(settings.temperature)
        .max_tokens(settings.max_tokens)
        .build();

    let started = Instant::now();
    let call = provider.chat(&settings.model, request);

    let result = match settings.timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result.map_err(CompletionError::from),
            Err(_) => Err(CompletionError::Timeout(limit)),
        },
        None => call.await.map_err(CompletionError::from),
    };

    record_llm_request(LlmRequestMetricParams {
        provider: provider.provider_name(),
        model: &settings.model,
        stage: settings.stage,
        duration: started.elapsed(),
        success: result.is_ok(),
        output_tokens: result
            .as_ref()
            .ok()
            .and_then(|r| r.usage.as_ref())
            .map(|u| u.completion_tokens as u64),
    });

    let response = result?;
    if response.finish_reason == Some(FinishReason::Length) {
        warn!(
            stage = settings.stage,
            max_tokens = settings.max_tokens,
            "Completion truncated at the token limit"
        );
    }

    Ok(response.content().to_string())
}
