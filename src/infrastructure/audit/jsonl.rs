//! Append-only JSON Lines audit file

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::{AuditLogRepository, AuditRecord, DomainError};

/// Audit log writing one JSON object per line.
///
/// Appends are serialised through a mutex so concurrent requests never
/// interleave partial lines.
#[derive(Debug)]
pub struct JsonlAuditLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlAuditLog {
    /// Open `path` for appending, creating it and its parent directory
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to open {}: {}", path.display(), e)))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditLogRepository for JsonlAuditLog {
    async fn append(&self, record: &AuditRecord) -> Result<(), DomainError> {
        let mut line = serde_json::to_vec(record).map_err(|e| {
            DomainError::storage(format!("Failed to serialize audit record: {}", e))
        })?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to write audit record: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "jsonl"
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

    async fn read_records(path: &Path) -> Vec<AuditRecord> {
        tokio::fs::read_to_string(path)
            .await
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_append_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonlAuditLog::open(dir.path().join("audit.jsonl")).await.unwrap();

        let first = record("knee surgery");
        log.append(&first).await.unwrap();
        log.append(&record("cataract")).await.unwrap();

        let records = read_records(log.path()).await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], first);
        assert_eq!(records[1].query, "cataract");
    }

    #[tokio::test]
    async fn test_reopen_preserves_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");

        JsonlAuditLog::open(&path)
            .await
            .unwrap()
            .append(&record("before restart"))
            .await
            .unwrap();
        JsonlAuditLog::open(&path)
            .await
            .unwrap()
            .append(&record("after restart"))
            .await
            .unwrap();

        let records = read_records(&path).await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].query, "before restart");
    }

    #[tokio::test]
    async fn test_concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(JsonlAuditLog::open(dir.path().join("audit.jsonl")).await.unwrap());

        let handles: Vec<_> = (0..25)
            .map(|i| {
                let log = Arc::clone(&log);
                tokio::spawn(async move { log.append(&record(&format!("query {i}"))).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(read_records(log.path()).await.len(), 25);
    }
}
