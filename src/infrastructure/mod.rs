//! Infrastructure layer - External service implementations

pub mod audit;
pub mod embedding;
pub mod index;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod services;
