//! Claim adjudication domain
//!
//! Types flowing through the retrieval-and-adjudication pipeline: the
//! structured query, retrieved evidence clauses, the decision, and the
//! fallback-carrying stage outcome.

mod clause;
mod decision;
mod outcome;
mod query;

pub use clause::{cite_all, ClauseCitation, ScoredClause};
pub use decision::{
    Decision, DecisionParseError, DecisionResult, DecisionStatus, UNPARSABLE_JUSTIFICATION,
};
pub use outcome::{FallbackReason, StageOutcome};
pub use query::{Gender, StructuredQuery};
