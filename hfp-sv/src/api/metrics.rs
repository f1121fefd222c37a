//! Model metrics endpoint

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::AppState;

/// GET /metrics
///
/// Returns the current metrics snapshot, or a placeholder message when no
/// metrics have been recorded yet.
pub async fn metrics(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    match hfp_common::metrics::read_snapshot(&state.metrics_path)? {
        Some(snapshot) => Ok(Json(serde_json::to_value(snapshot).map_err(
            |e| crate::ApiError::Internal(hfp_common::Error::Json(e)),
        )?)),
        None => Ok(Json(json!({"message": "no metrics recorded"}))),
    }
}
