//! Error types for hfp-sv
//!
//! Input-shape errors surface as 400s with enumerable detail (the exact
//! missing-feature set, the per-field violation list). Everything else is a
//! 500: full detail goes to the server log, the response body carries a
//! generic message only.

use std::collections::BTreeSet;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use hfp_common::error::ValidationError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request shape (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Record failed schema validation (400)
    #[error("{0}")]
    Validation(ValidationError),

    /// Record lacks columns the model requires (400)
    #[error("Missing feature columns required by the model: {0:?}")]
    MissingFeatures(BTreeSet<String>),

    /// Internal server error (500); detail is logged, not returned
    #[error("Internal server error")]
    Internal(#[source] hfp_common::Error),
}

impl From<hfp_common::Error> for ApiError {
    fn from(err: hfp_common::Error) -> Self {
        use hfp_common::Error;
        match err {
            Error::Validation(v) => ApiError::Validation(v),
            Error::MissingFeatures(missing) => ApiError::MissingFeatures(missing),
            Error::UnknownCategory { .. } => ApiError::BadRequest(err.to_string()),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({"error": {"code": "BAD_REQUEST", "message": msg}}),
            ),
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "message": err.to_string(),
                        "violations": err.violations,
                    }
                }),
            ),
            ApiError::MissingFeatures(missing) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": {
                        "code": "MISSING_FEATURE_COLUMNS",
                        "message": format!(
                            "Missing feature columns required by the model: {:?}",
                            missing
                        ),
                        "missing": missing,
                    }
                }),
            ),
            ApiError::Internal(err) => {
                tracing::error!("internal error serving request: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": {"code": "INTERNAL_ERROR", "message": "internal server error"}}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
