//! Pipeline services - extraction, retrieval, adjudication and orchestration

mod adjudicator;
mod clause_retriever;
mod completion;
mod pipeline;
mod prompts;
mod query_extractor;

pub use adjudicator::Adjudicator;
pub use clause_retriever::{ClauseRetriever, RetrievalPolicy};
pub use completion::{complete, CompletionError, CompletionSettings};
pub use pipeline::AdjudicationPipeline;
pub use prompts::{adjudication_prompt, extraction_prompt, render_clauses, NO_CLAUSES};
pub use query_extractor::QueryExtractor;
