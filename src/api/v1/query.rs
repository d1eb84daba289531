//! Query adjudication endpoint

use axum::extract::State;
use serde_json::Value;
use tracing::{debug, error};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, QueryRequest};
use crate::domain::DecisionResult;

/// POST /v1/query
pub async fn adjudicate_query(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<DecisionResult>, ApiError> {
    let request = QueryRequest::from_body(&body)?;
    debug!(query_len = request.query.len(), "Adjudicating query");

    let result = state
        .query_service
        .handle(&request.query)
        .await
        .map_err(|e| {
            error!(error = %e, "Query adjudication failed");
            ApiError::from(e)
        })?;

    Ok(Json(result))
}
