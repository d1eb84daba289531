//! Helpers for turning untrusted completion text into JSON

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?i:json)?").expect("Invalid code fence pattern"));

/// Errors raised while reading JSON out of completion text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutputError {
    #[error("no JSON object found in completion")]
    NoJsonObject,
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

/// Remove markdown code-fence markers (```` ```json ```` and ```` ``` ````)
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Parse the whole completion as JSON after removing code fences
pub fn parse_fenced_json(text: &str) -> Result<Value, OutputError> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(&cleaned).map_err(|e| OutputError::InvalidJson(e.to_string()))
}

/// Parse from the first `{` to the end of the completion after removing code
/// fences, skipping any commentary the model put before the object.
pub fn parse_leading_object(text: &str) -> Result<Value, OutputError> {
    let cleaned = strip_code_fences(text);
    let start = cleaned.find('{').ok_or(OutputError::NoJsonObject)?;

    serde_json::from_str(&cleaned[start..]).map_err(|e| OutputError::InvalidJson(e.to_string()))
}
