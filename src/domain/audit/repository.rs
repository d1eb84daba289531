//! Audit log repository trait

use async_trait::async_trait;

use super::AuditRecord;
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Append-only store of audit records.
///
/// Implementations must accept concurrent appends without corrupting earlier
/// entries; ordering between concurrent appends is unspecified.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Appends one record
    async fn append(&self, record: &AuditRecord) -> Result<(), DomainError>;

    /// Backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}
