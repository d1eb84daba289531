//! PostgreSQL audit log

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::{AuditLogRepository, AuditRecord, DomainError};

/// Audit log stored as one row per record
pub struct PostgresAuditLog {
    pool: PgPool,
    table_name: String,
}

impl Debug for PostgresAuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresAuditLog")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl PostgresAuditLog {
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
        }
    }

    /// Connect with a small pool; audit writes are one insert per request
    pub async fn connect(url: &str, table_name: impl Into<String>) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool, table_name))
    }

    /// Ensures the audit table exists
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id VARCHAR(64) PRIMARY KEY,
                query TEXT NOT NULL,
                parsed_query JSONB NOT NULL,
                decision JSONB NOT NULL,
                clauses_used JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        Ok(())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(value)
        .map_err(|e| DomainError::storage(format!("Failed to serialize audit record: {}", e)))
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLog {
    async fn append(&self, record: &AuditRecord) -> Result<(), DomainError> {
        let query = format!(
            "INSERT INTO {} (id, query, parsed_query, decision, clauses_used, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
            self.table_name
        );

        sqlx::query(&query)
            .bind(record.id.as_str())
            .bind(&record.query)
            .bind(to_json(&record.parsed_query)?)
            .bind(to_json(&record.decision)?)
            .bind(to_json(&record.clauses_used)?)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to append audit record: {}", e)))?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
