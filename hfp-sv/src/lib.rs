//! hfp-sv library - Prediction Serving module
//!
//! Loads the trained model artifact once at startup and serves predictions
//! over HTTP. All shared state is read-only after load apart from the
//! append-only prediction log.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use hfp_common::{ModelArtifact, PredictionLog};

pub mod api;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded classifier plus its expected-feature list (read-only)
    pub model: Arc<ModelArtifact>,
    /// Append-only prediction log (writes serialized internally)
    pub log: Arc<PredictionLog>,
    /// Location of the current metrics snapshot
    pub metrics_path: PathBuf,
}

impl AppState {
    pub fn new(model: ModelArtifact, log: PredictionLog, metrics_path: PathBuf) -> Self {
        Self {
            model: Arc::new(model),
            log: Arc::new(log),
            metrics_path,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::root))
        .route("/predict", post(api::predict))
        .route("/metrics", get(api::metrics))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
