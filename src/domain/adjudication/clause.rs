//! Evidence clauses retrieved for a query

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::corpus::EmbeddedFragment;

/// A fragment selected as evidence, with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredClause {
    pub dataset: String,
    pub clause_ref: String,
    pub excerpt: String,
    pub score: f32,
}

impl ScoredClause {
    pub fn from_fragment(fragment: &EmbeddedFragment, score: f32) -> Self {
        Self {
            dataset: fragment.dataset.clone(),
            clause_ref: fragment.id.clone(),
            excerpt: fragment.text.clone(),
            score,
        }
    }
}

/// A clause as reported in a decision result.
///
/// Citations echoed by the model carry no score; citations substituted from
/// retrieval evidence keep theirs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseCitation {
    pub dataset: String,
    pub clause_ref: String,
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl ClauseCitation {
    /// Parse a model-echoed citation; non-objects are rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let field = |name: &str| match object.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Some(Self {
            dataset: field("dataset"),
            clause_ref: field("clause_ref"),
            excerpt: field("excerpt"),
            score: None,
        })
    }
}

impl From<&ScoredClause> for ClauseCitation {
    fn from(clause: &ScoredClause) -> Self {
        Self {
            dataset: clause.dataset.clone(),
            clause_ref: clause.clause_ref.clone(),
            excerpt: clause.excerpt.clone(),
            score: Some(clause.score),
        }
    }
}

/// Convert retrieval evidence into citations, preserving order
pub fn cite_all(evidence: &[ScoredClause]) -> Vec<ClauseCitation> {
    evidence.iter().map(ClauseCitation::from).collect()
}
