//! Grounded claim decisions over retrieved evidence

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::completion::{complete, CompletionError, CompletionSettings};
use super::prompts::adjudication_prompt;
use crate::domain::{
    cite_all, ClauseCitation, Decision, DecisionResult, DomainError, FallbackReason, LlmProvider,
    ScoredClause, StageOutcome, StructuredQuery,
};
use crate::infrastructure::llm::output::parse_leading_object;
use crate::infrastructure::observability::record_stage_fallback;

const STAGE: &str = "adjudication";

/// Asks the model for a decision and repairs or replaces what comes back
#[derive(Debug, Clone)]
pub struct Adjudicator {
    provider: Arc<dyn LlmProvider>,
    settings: CompletionSettings,
}

impl Adjudicator {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: CompletionSettings) -> Self {
        Self { provider, settings }
    }

    /// Decide the claim described by `query` from `evidence`.
    ///
    /// Malformed completions and timeouts produce the synthetic Pending
    /// decision. Provider errors propagate.
    pub async fn adjudicate(
        &self,
        query: &StructuredQuery,
        evidence: &[ScoredClause],
    ) -> Result<StageOutcome<DecisionResult>, DomainError> {
        let prompt = adjudication_prompt(query, evidence);

        let outcome = match complete(self.provider.as_ref(), &self.settings, prompt).await {
            Ok(text) => parse_decision(&text, query, evidence),
            Err(CompletionError::Timeout(_)) => {
                StageOutcome::fallback(unparsable(query, evidence), FallbackReason::Timeout)
            }
            Err(CompletionError::Provider(e)) => return Err(e),
        };

        match outcome.reason() {
            Some(reason) => {
                warn!(stage = STAGE, reason = %reason, "Using synthetic pending decision");
                record_stage_fallback(STAGE, reason.kind());
            }
            None => debug!(
                status = %outcome.value().decision.status,
                clauses = outcome.value().clauses_used.len(),
                "Decision parsed"
            ),
        }

        Ok(outcome)
    }
}

fn unparsable(query: &StructuredQuery, evidence: &[ScoredClause]) -> DecisionResult {
    DecisionResult {
        parsed_query: query.clone(),
        decision: Decision::unparsable(),
        clauses_used: cite_all(evidence),
    }
}

fn parse_decision(
    text: &str,
    query: &StructuredQuery,
    evidence: &[ScoredClause],
) -> StageOutcome<DecisionResult> {
    let malformed = |detail: String| {
        StageOutcome::fallback(
            unparsable(query, evidence),
            FallbackReason::MalformedOutput(detail),
        )
    };

    let value = match parse_leading_object(text) {
        Ok(value) => value,
        Err(e) => return malformed(e.to_string()),
    };

    let decision = match Decision::from_json(value.get("decision").unwrap_or(&Value::Null)) {
        Ok(decision) => decision,
        Err(e) => return malformed(e.to_string()),
    };

    let mut clauses_used: Vec<ClauseCitation> = value
        .get("clauses_used")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(ClauseCitation::from_json).collect())
        .unwrap_or_default();

    if clauses_used.is_empty() {
        clauses_used = cite_all(evidence);
    }

    StageOutcome::Parsed(DecisionResult {
        parsed_query: query.clone(),
        decision,
        clauses_used,
    })
}
