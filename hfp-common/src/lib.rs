//! # HFP Common Library
//!
//! Shared code for the HFP (Heart Failure Prediction) services including:
//! - Domain schema, category encoding, validation, feature projection
//! - Trained model artifact load/save
//! - Prediction log store (append-only NDJSON)
//! - Classification metrics computation and snapshot persistence
//! - Database access (prediction_logs / evaluations tables)
//! - Configuration loading and root folder resolution

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logstore;
pub mod metrics;
pub mod model;

pub use error::{Error, Result};
pub use logstore::{PredictionLog, PredictionLogEntry};
pub use model::ModelArtifact;
