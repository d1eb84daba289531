//! Structured query extraction

use std::sync::Arc;

use tracing::{debug, warn};

use super::completion::{complete, CompletionError, CompletionSettings};
use super::prompts::extraction_prompt;
use crate::domain::{FallbackReason, LlmProvider, StageOutcome, StructuredQuery};
use crate::infrastructure::llm::output::parse_fenced_json;
use crate::infrastructure::observability::record_stage_fallback;

const STAGE: &str = "extraction";

/// Turns free text into a [`StructuredQuery`], best effort
#[derive(Debug, Clone)]
pub struct QueryExtractor {
    provider: Arc<dyn LlmProvider>,
    settings: CompletionSettings,
}

impl QueryExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: CompletionSettings) -> Self {
        Self { provider, settings }
    }

    /// Extract the query fields.
    ///
    /// Never fails: any provider error, timeout or malformed completion yields
    /// the empty query as a fallback.
    pub async fn extract(&self, query: &str) -> StageOutcome<StructuredQuery> {
        let outcome = match complete(self.provider.as_ref(), &self.settings, extraction_prompt(query))
            .await
        {
            Ok(text) => parse_structured_query(&text),
            Err(CompletionError::Timeout(_)) => {
                StageOutcome::fallback(StructuredQuery::empty(), FallbackReason::Timeout)
            }
            Err(CompletionError::Provider(e)) => StageOutcome::fallback(
                StructuredQuery::empty(),
                FallbackReason::Provider(e.to_string()),
            ),
        };

        match outcome.reason() {
            Some(reason) => {
                warn!(stage = STAGE, reason = %reason, "Using empty structured query");
                record_stage_fallback(STAGE, reason.kind());
            }
            None => debug!(parsed_query = ?outcome.value(), "Structured query extracted"),
        }

        outcome
    }
}

fn parse_structured_query(text: &str) -> StageOutcome<StructuredQuery> {
    if text.trim().is_empty() {
        return StageOutcome::fallback(
            StructuredQuery::empty(),
            FallbackReason::MalformedOutput("empty completion".to_string()),
        );
    }

    let value = match parse_fenced_json(text) {
        Ok(value) => value,
        Err(e) => {
            return StageOutcome::fallback(
                StructuredQuery::empty(),
                FallbackReason::MalformedOutput(e.to_string()),
            );
        }
    };

    match StructuredQuery::from_json(&value) {
        Some(query) => StageOutcome::Parsed(query),
        None => StageOutcome::fallback(
            StructuredQuery::empty(),
            FallbackReason::MalformedOutput("completion is not a JSON object".to_string()),
        ),
    }
}
