//! Audit store selection from configuration

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::{InMemoryAuditLog, JsonlAuditLog, PostgresAuditLog};
use crate::domain::{AuditLogRepository, DomainError};

/// Supported audit backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditBackend {
    #[default]
    Memory,
    Jsonl,
    Postgres,
}

/// Audit log configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub backend: AuditBackend,
    /// File used by the `jsonl` backend
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Environment variable holding the connection URL for `postgres`
    #[serde(default = "default_database_url_env")]
    pub database_url_env: String,
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_path() -> PathBuf {
    PathBuf::from("data/audit.jsonl")
}

fn default_database_url_env() -> String {
    "DATABASE_URL".to_string()
}

fn default_table() -> String {
    "adjudication_audit_log".to_string()
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            backend: AuditBackend::default(),
            path: default_path(),
            database_url_env: default_database_url_env(),
            table: default_table(),
        }
    }
}

/// Factory for creating audit stores
#[derive(Debug)]
pub struct AuditStoreFactory;

impl AuditStoreFactory {
    pub async fn create(config: &AuditConfig) -> Result<Arc<dyn AuditLogRepository>, DomainError> {
        let store: Arc<dyn AuditLogRepository> = match config.backend {
            AuditBackend::Memory => Arc::new(InMemoryAuditLog::new()),
            AuditBackend::Jsonl => Arc::new(JsonlAuditLog::open(&config.path).await?),
            AuditBackend::Postgres => {
                validate_table_name(&config.table)?;
                let url = std::env::var(&config.database_url_env).map_err(|_| {
                    DomainError::configuration(format!(
                        "Environment variable '{}' is not set",
                        config.database_url_env
                    ))
                })?;
                let store = PostgresAuditLog::connect(&url, &config.table).await?;
                store.ensure_table().await?;
                Arc::new(store)
            }
        };

        info!(backend = store.backend_name(), "Audit log ready");
        Ok(store)
    }
}

fn validate_table_name(name: &str) -> Result<(), DomainError> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(DomainError::configuration(format!(
            "Invalid audit table name '{}'",
            name
        )))
    }
}
