//! Trained model artifact
//!
//! The artifact bundles the fitted classifier with the ordered feature list
//! it was fit on (the expected-feature contract). Written once by the
//! training stage, read-only at serving time.

use std::fs;
use std::path::Path;

use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Serialized classifier plus its declared expected-feature list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Ordered feature names the classifier requires, in fit order;
    /// immutable for this model's lifetime
    pub expected_features: Vec<String>,
    /// Fitted decision tree classifier
    pub model: DecisionTree<f64, usize>,
}

impl ModelArtifact {
    pub fn new(expected_features: Vec<String>, model: DecisionTree<f64, usize>) -> Self {
        Self {
            expected_features,
            model,
        }
    }

    /// Load the artifact from disk; missing file is `ModelNotFound`
    /// (fatal at service startup).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelNotFound(path.to_path_buf()));
        }
        let file = fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    /// Persist the artifact as JSON, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(path)?;
        serde_json::to_writer(file, self)?;
        Ok(())
    }

    /// Predict labels for a batch of projected feature vectors.
    ///
    /// Every row must already be in `expected_features` order (the
    /// projector's output). Output labels align positionally with input rows.
    pub fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>> {
        let width = self.expected_features.len();
        let flat: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        let matrix = Array2::from_shape_vec((rows.len(), width), flat)
            .map_err(|e| Error::Internal(format!("malformed feature matrix: {e}")))?;
        let labels: Array1<usize> = self.model.predict(&matrix);
        Ok(labels.iter().map(|&l| l as i64).collect())
    }
}
