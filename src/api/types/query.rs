//! Query endpoint request validation

use serde_json::Value;

use super::ApiError;

const QUERY_PARAM: &str = "query";

/// Validated body of `POST /v1/query`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    /// Accept only an object whose `query` is a non-blank string
    pub fn from_body(body: &Value) -> Result<Self, ApiError> {
        let object = body
            .as_object()
            .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))?;

        match object.get(QUERY_PARAM) {
            None | Some(Value::Null) => {
                Err(ApiError::bad_request("Missing required field 'query'").with_param(QUERY_PARAM))
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                Err(ApiError::bad_request("'query' must not be blank").with_param(QUERY_PARAM))
            }
            Some(Value::String(s)) => Ok(Self { query: s.clone() }),
            Some(_) => Err(ApiError::bad_request("'query' must be a string").with_param(QUERY_PARAM)),
        }
    }
}
