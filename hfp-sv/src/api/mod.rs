//! HTTP API handlers for hfp-sv

pub mod health;
pub mod metrics;
pub mod predict;

pub use health::health_routes;
pub use metrics::metrics;
pub use predict::predict;

use axum::Json;
use serde_json::{json, Value};

/// GET /
///
/// Liveness check.
pub async fn root() -> Json<Value> {
    Json(json!({"message": "Heart Failure Prediction API"}))
}
