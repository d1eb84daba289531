//! Request orchestration: extraction and retrieval, then adjudication and audit

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use super::{Adjudicator, ClauseRetriever, QueryExtractor};
use crate::domain::{AuditLogRepository, AuditRecord, DecisionResult, DomainError};
use crate::infrastructure::index::SimilarityIndex;
use crate::infrastructure::observability::{record_audit_failure, record_query, QueryOutcome};

/// Runs one query through every stage
pub struct AdjudicationPipeline {
    extractor: QueryExtractor,
    retriever: ClauseRetriever,
    adjudicator: Adjudicator,
    audit_log: Arc<dyn AuditLogRepository>,
}

impl std::fmt::Debug for AdjudicationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdjudicationPipeline")
            .field("index_size", &self.retriever.index().len())
            .field("audit_backend", &self.audit_log.backend_name())
            .finish()
    }
}

impl AdjudicationPipeline {
    pub fn new(
        extractor: QueryExtractor,
        retriever: ClauseRetriever,
        adjudicator: Adjudicator,
        audit_log: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            extractor,
            retriever,
            adjudicator,
            audit_log,
        }
    }

    pub fn index(&self) -> &SimilarityIndex {
        self.retriever.index()
    }

    pub fn audit_backend(&self) -> &'static str {
        self.audit_log.backend_name()
    }

    /// Handle one query and append its audit record.
    ///
    /// Audit failures are logged and counted but never returned.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn handle(&self, query: &str) -> Result<DecisionResult, DomainError> {
        let started = Instant::now();

        let result = self.run(query).await;

        let outcome = match &result {
            Ok((_, true)) => QueryOutcome::Fallback,
            Ok((_, false)) => QueryOutcome::Decided,
            Err(_) => QueryOutcome::Failed,
        };
        record_query(outcome, started.elapsed());

        let (result, _) = result?;

        let record = AuditRecord::new(query, &result);
        if let Err(e) = self.audit_log.append(&record).await {
            warn!(
                audit_id = %record.id,
                backend = self.audit_log.backend_name(),
                error = %e,
                "Failed to append audit record"
            );
            record_audit_failure(self.audit_log.backend_name());
        }

        info!(
            status = %result.decision.status,
            clauses = result.clauses_used.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Query adjudicated"
        );

        Ok(result)
    }

    /// Returns the result and whether any stage fell back
    async fn run(&self, query: &str) -> Result<(DecisionResult, bool), DomainError> {
        let (extraction, evidence) =
            tokio::join!(self.extractor.extract(query), self.retriever.retrieve(query));

        let evidence = evidence?;
        let extraction_fell_back = extraction.is_fallback();
        let structured_query = extraction.into_value();

        let adjudication = self
            .adjudicator
            .adjudicate(&structured_query, &evidence)
            .await?;
        let fell_back = extraction_fell_back || adjudication.is_fallback();

        Ok((adjudication.into_value(), fell_back))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audit::MockAuditLogRepository;
    use crate::domain::corpus::EmbeddedFragment;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::{DecisionStatus, Gender};
    use crate::infrastructure::audit::InMemoryAuditLog;
    use crate::infrastructure::services::CompletionSettings;

    const EXTRACTION_NEEDLE: &str = "Extract the following fields";
    const ADJUDICATION_NEEDLE: &str = "Policy clauses:";

    const KNEE_QUERY: &str = "46-year-old male, knee surgery in Pune, 3-month-old policy";
    const GIBBERISH_QUERY: &str = "asdkjh qweoiuqwe";

    fn knee_corpus() -> Vec<EmbeddedFragment> {
        vec![
            EmbeddedFragment::new(
                "policy.pdf",
                "policy.pdf_0",
                "Dental treatment is covered after a waiting period of two years.",
                vec![0.0, 1.0, 0.0],
            ),
            EmbeddedFragment::new(
                "policy.pdf",
                "policy.pdf_7",
                "Knee surgery is excluded during the first 24 months of the policy.",
                vec![0.95, 0.1, 0.1],
            ),
            EmbeddedFragment::new(
                "terms.pdf",
                "terms.pdf_2",
                "Claims are settled for treatment taken in India.",
                vec![0.4, 0.0, 0.9],
            ),
        ]
    }

    fn unrelated_corpus() -> Vec<EmbeddedFragment> {
        (0..9)
            .map(|i| {
                EmbeddedFragment::new(
                    "brochure.pdf",
                    format!("brochure.pdf_{i}"),
                    format!("Marketing paragraph number {i} about travel perks."),
                    vec![1.0, i as f32 / 100.0, 0.0],
                )
            })
            .collect()
    }

    fn pipeline(
        llm: MockLlmProvider,
        embedder: MockEmbeddingProvider,
        corpus: Vec<EmbeddedFragment>,
        audit_log: Arc<dyn AuditLogRepository>,
    ) -> AdjudicationPipeline {
        let llm: Arc<MockLlmProvider> = Arc::new(llm);
        AdjudicationPipeline::new(
            QueryExtractor::new(llm.clone(), CompletionSettings::new("extraction", "m", 200)),
            ClauseRetriever::new(Arc::new(embedder), "mock", SimilarityIndex::new(corpus)),
            Adjudicator::new(llm, CompletionSettings::new("adjudication", "m", 800)),
            audit_log,
        )
    }

    #[tokio::test]
    async fn test_knee_surgery_scenario() {
        let llm = MockLlmProvider::new("mock")
            .with_rule(
                EXTRACTION_NEEDLE,
                "```json\n{\"age\": 46, \"gender\": \"male\", \"procedure\": \"knee surgery\", \
                 \"location\": \"Pune\", \"policy_duration\": \"3 months\"}\n```",
            )
            .with_rule(
                ADJUDICATION_NEEDLE,
                "{\"parsed_query\": {}, \"decision\": {\"status\": \"Rejected\", \"amount\": null, \
                 \"justification\": \"The policy is 3 months old. CLAUSE_1 excludes knee surgery \
                 during the first 24 months. The claim is therefore rejected.\"}, \
                 \"clauses_used\": [{\"dataset\": \"policy.pdf\", \"clause_ref\": \"policy.pdf_7\", \
                 \"excerpt\": \"Knee surgery is excluded during the first 24 months of the policy.\"}]}",
            );
        let embedder = MockEmbeddingProvider::new(3).with_vector(KNEE_QUERY, vec![1.0, 0.0, 0.0]);
        let audit_log = Arc::new(InMemoryAuditLog::new());

        let pipeline = pipeline(llm, embedder, knee_corpus(), audit_log.clone());
        let result = pipeline.handle(KNEE_QUERY).await.unwrap();

        assert!(matches!(
            result.decision.status,
            DecisionStatus::Approved | DecisionStatus::Rejected | DecisionStatus::Pending
        ));
        assert!(result.decision.justification.contains("CLAUSE_1"));
        assert!(!result.clauses_used.is_empty());
        assert_eq!(result.parsed_query.age, Some(46));
        assert_eq!(result.parsed_query.gender, Some(Gender::Male));

        let records = audit_log.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].query, KNEE_QUERY);
        assert_eq!(records[0].decision, result.decision);
    }

    #[tokio::test]
    async fn test_knee_surgery_prompt_leads_with_best_clause() {
        let llm = Arc::new(
            MockLlmProvider::new("mock")
                .with_rule(EXTRACTION_NEEDLE, "{}")
                .with_rule(ADJUDICATION_NEEDLE, "not json"),
        );
        let embedder = MockEmbeddingProvider::new(3).with_vector(KNEE_QUERY, vec![1.0, 0.0, 0.0]);
        let pipeline = AdjudicationPipeline::new(
            QueryExtractor::new(llm.clone(), CompletionSettings::new("extraction", "m", 200)),
            ClauseRetriever::new(Arc::new(embedder), "mock", SimilarityIndex::new(knee_corpus())),
            Adjudicator::new(llm.clone(), CompletionSettings::new("adjudication", "m", 800)),
            Arc::new(InMemoryAuditLog::new()),
        );

        let result = pipeline.handle(KNEE_QUERY).await.unwrap();

        assert_eq!(result.decision.status, DecisionStatus::Pending);
        assert_eq!(result.clauses_used[0].clause_ref, "policy.pdf_7");

        let adjudication_prompt = llm
            .requests()
            .iter()
            .filter_map(|r| r.last_user_text().map(str::to_string))
            .find(|text| text.contains(ADJUDICATION_NEEDLE))
            .unwrap();
        assert!(adjudication_prompt.contains("CLAUSE_1 (policy.pdf / policy.pdf_7)"));
    }

    #[tokio::test]
    async fn test_gibberish_scenario_uses_fallback_evidence() {
        let llm = MockLlmProvider::new("mock")
            .with_rule(EXTRACTION_NEEDLE, "I could not find any fields.")
            .with_rule(
                ADJUDICATION_NEEDLE,
                "{\"decision\": {\"status\": \"Pending\", \"amount\": null, \"justification\": \
                 \"None of CLAUSE_1 to CLAUSE_6 relate to the query.\"}, \"clauses_used\": []}",
            );
        let embedder =
            MockEmbeddingProvider::new(3).with_vector(GIBBERISH_QUERY, vec![0.0, 0.0, 1.0]);
        let audit_log = Arc::new(InMemoryAuditLog::new());

        let pipeline = pipeline(llm, embedder, unrelated_corpus(), audit_log.clone());
        let result = pipeline.handle(GIBBERISH_QUERY).await.unwrap();

        assert_eq!(result.clauses_used.len(), 6);
        assert!(result.clauses_used.iter().all(|c| c.score.is_some()));
        assert!(result.parsed_query.is_empty());
        assert_eq!(result.decision.status, DecisionStatus::Pending);
        assert_eq!(audit_log.len().await, 1);
    }

    #[tokio::test]
    async fn test_empty_index_still_decides() {
        let llm = MockLlmProvider::new("mock")
            .with_rule(EXTRACTION_NEEDLE, "{}")
            .with_rule(
                ADJUDICATION_NEEDLE,
                "{\"decision\": {\"status\": \"Pending\", \"justification\": \"No clauses.\"}}",
            );

        let pipeline = pipeline(
            llm,
            MockEmbeddingProvider::new(3),
            vec![],
            Arc::new(InMemoryAuditLog::new()),
        );
        let result = pipeline.handle("knee surgery").await.unwrap();

        assert!(result.clauses_used.is_empty());
        assert_eq!(result.decision.status, DecisionStatus::Pending);
    }

    #[tokio::test]
    async fn test_audit_failure_does_not_fail_request() {
        let llm = MockLlmProvider::new("mock")
            .with_rule(EXTRACTION_NEEDLE, "{}")
            .with_rule(ADJUDICATION_NEEDLE, "garbage");

        let mut audit_log = MockAuditLogRepository::new();
        audit_log
            .expect_append()
            .times(1)
            .returning(|_| Err(DomainError::storage("disk full")));
        audit_log.expect_backend_name().return_const("mock");

        let pipeline = pipeline(llm, MockEmbeddingProvider::new(3), knee_corpus(), Arc::new(audit_log));
        let result = pipeline.handle("knee surgery").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_embedding_failure_fails_request_without_audit() {
        let llm = MockLlmProvider::new("mock").with_response("{}");

        let mut audit_log = MockAuditLogRepository::new();
        audit_log.expect_append().times(0);
        audit_log.expect_backend_name().return_const("mock");

        let pipeline = pipeline(
            llm,
            MockEmbeddingProvider::new(3).with_error("embedding model unavailable"),
            knee_corpus(),
            Arc::new(audit_log),
        );
        let result = pipeline.handle("knee surgery").await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_embedding_dimension_mismatch_fails_request() {
        let llm = MockLlmProvider::new("mock").with_response("{}");
        let audit_log = Arc::new(InMemoryAuditLog::new());

        let pipeline = pipeline(llm, MockEmbeddingProvider::new(4), knee_corpus(), audit_log.clone());
        let result = pipeline.handle("knee surgery").await;

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
        assert_eq!(audit_log.len().await, 0);
    }

    #[tokio::test]
    async fn test_adjudication_provider_failure_propagates() {
        let llm = MockLlmProvider::new("mock").with_error("upstream 502");
        let audit_log = Arc::new(InMemoryAuditLog::new());

        let pipeline = pipeline(llm, MockEmbeddingProvider::new(3), knee_corpus(), audit_log.clone());
        let result = pipeline.handle("knee surgery").await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
        assert_eq!(audit_log.len().await, 0);
    }
}
