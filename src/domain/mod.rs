//! Domain layer - Core business logic and entities

pub mod adjudication;
pub mod audit;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod llm;

pub use adjudication::{
    cite_all, ClauseCitation, Decision, DecisionResult, DecisionStatus, FallbackReason, Gender,
    ScoredClause, StageOutcome, StructuredQuery, UNPARSABLE_JUSTIFICATION,
};
pub use audit::{AuditLogRepository, AuditRecord, AuditRecordId};
pub use corpus::EmbeddedFragment;
pub use embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use llm::{FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage};
