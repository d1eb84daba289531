//! Append-only audit trail of handled queries

mod record;
mod repository;

pub use record::{AuditRecord, AuditRecordId};
pub use repository::AuditLogRepository;

#[cfg(test)]
pub use repository::MockAuditLogRepository;
