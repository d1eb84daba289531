//! In-memory audit log

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{AuditLogRepository, AuditRecord, DomainError};

/// Audit log kept in process memory.
///
/// Records are lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    records: RwLock<Vec<AuditRecord>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records appended so far, in append order
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLog {
    async fn append(&self, record: &AuditRecord) -> Result<(), DomainError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decision, DecisionResult, StructuredQuery};
    use std::sync::Arc;

    fn record(query: &str) -> AuditRecord {
        AuditRecord::new(
            query,
            &DecisionResult {
                parsed_query: StructuredQuery::empty(),
                decision: Decision::unparsable(),
                clauses_used: vec![],
            },
        )
    }

    #[tokio::test]
    async fn test_append_keeps_order() {
        let log = InMemoryAuditLog::new();

        log.append(&record("first")).await.unwrap();
        log.append(&record("second")).await.unwrap();

        let records = log.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].query, "first");
        assert_eq!(records[1].query, "second");
    }

    #[tokio::test]
    async fn test_concurrent_appends() {
        let log = Arc::new(InMemoryAuditLog::new());

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let log = Arc::clone(&log);
                tokio::spawn(async move { log.append(&record(&format!("q{i}"))).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(log.len().await, 20);
    }
}
