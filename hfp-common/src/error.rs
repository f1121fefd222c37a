//! Common error types for HFP

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

pub use crate::domain::validate::{FieldViolation, ValidationError};

/// Common result type for HFP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the HFP services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input record failed schema validation (aggregated per-field detail)
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Input value outside the fixed category vocabulary for a field
    #[error("Unknown value '{value}' for categorical field '{field}'")]
    UnknownCategory { field: String, value: String },

    /// Record lacks columns the trained model requires
    #[error("Missing feature columns required by the model: {0:?}")]
    MissingFeatures(BTreeSet<String>),

    /// Trained model artifact absent (fatal at startup)
    #[error("Trained model not found at {}. Train the model first.", .0.display())]
    ModelNotFound(PathBuf),

    /// Intermediate pipeline artifact absent
    #[error("Artifact not found at {}. Run the preceding pipeline stage first.", .0.display())]
    ArtifactNotFound(PathBuf),

    /// Metrics computation has no usable (ground truth, prediction) pairs
    #[error("No usable (ground truth, prediction) pairs in the log history")]
    InsufficientData,

    /// Metrics undefined for the collected pairs (e.g. one-class ground truth)
    #[error("Metrics undefined for the collected pairs: {0}")]
    DegenerateMetrics(String),

    /// Model training failed
    #[error("Model training failed: {0}")]
    Training(String),

    /// Bounded-time operation exceeded its deadline
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
