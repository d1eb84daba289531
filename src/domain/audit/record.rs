//! Audit record entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::adjudication::{ClauseCitation, Decision, DecisionResult, StructuredQuery};

/// Audit record ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditRecordId(String);

impl AuditRecordId {
    pub fn generate() -> Self {
        Self(format!("audit-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AuditRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable copy of one handled request and its decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: AuditRecordId,
    pub query: String,
    pub parsed_query: StructuredQuery,
    pub decision: Decision,
    pub clauses_used: Vec<ClauseCitation>,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(query: impl Into<String>, result: &DecisionResult) -> Self {
        Self {
            id: AuditRecordId::generate(),
            query: query.into(),
            parsed_query: result.parsed_query.clone(),
            decision: result.decision.clone(),
            clauses_used: result.clauses_used.clone(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_copies_result() {
        let result = DecisionResult {
            parsed_query: StructuredQuery::empty(),
            decision: Decision::unparsable(),
            clauses_used: vec![],
        };

        let record = AuditRecord::new("knee surgery", &result);

        assert!(record.id.as_str().starts_with("audit-"));
        assert_eq!(record.query, "knee surgery");
        assert_eq!(record.decision, result.decision);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(AuditRecordId::generate(), AuditRecordId::generate());
    }
}
