//! Audit log store implementations

mod factory;
mod in_memory;
mod jsonl;
mod postgres;

pub use factory::{AuditBackend, AuditConfig, AuditStoreFactory};
pub use in_memory::InMemoryAuditLog;
pub use jsonl::JsonlAuditLog;
pub use postgres::PostgresAuditLog;
