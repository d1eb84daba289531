//! Adjudication decision types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ClauseCitation, StructuredQuery};

/// Justification used when the model output cannot be parsed
pub const UNPARSABLE_JUSTIFICATION: &str = "Could not parse LLM output";

/// Verdict of an adjudication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionStatus {
    Approved,
    Rejected,
    Pending,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Approved => "Approved",
            DecisionStatus::Rejected => "Rejected",
            DecisionStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DecisionStatus {
    type Err = DecisionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Approved, Self::Rejected, Self::Pending]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DecisionParseError::UnknownStatus(s.to_string()))
    }
}

/// Reasons a model-produced decision object is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionParseError {
    #[error("decision is not a JSON object")]
    NotAnObject,
    #[error("decision status is missing")]
    MissingStatus,
    #[error("unrecognised decision status '{0}'")]
    UnknownStatus(String),
}

/// Approve/reject/pend verdict with its justification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub status: DecisionStatus,
    pub amount: Option<String>,
    pub justification: String,
}

impl Decision {
    /// Synthetic decision substituted when the model output is unusable
    pub fn unparsable() -> Self {
        Self {
            status: DecisionStatus::Pending,
            amount: None,
            justification: UNPARSABLE_JUSTIFICATION.to_string(),
        }
    }

    /// Validate a model-produced `decision` object
    pub fn from_json(value: &Value) -> Result<Self, DecisionParseError> {
        let object = value.as_object().ok_or(DecisionParseError::NotAnObject)?;

        let status = match object.get("status") {
            Some(Value::String(s)) => s.parse()?,
            Some(other) => return Err(DecisionParseError::UnknownStatus(other.to_string())),
            None => return Err(DecisionParseError::MissingStatus),
        };

        let amount = match object.get("amount") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let justification = object
            .get("justification")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            status,
            amount,
            justification,
        })
    }
}

/// Final response of the pipeline, also persisted to the audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub parsed_query: StructuredQuery,
    pub decision: Decision,
    pub clauses_used: Vec<ClauseCitation>,
}
