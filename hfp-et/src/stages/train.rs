//! Train stage: fit the classifier on the encoded dataset
//!
//! Reads `data/processed_data.csv`, splits off the `HeartDisease` target,
//! shuffles with a fixed seed and holds out 20% for evaluation. Fitting is
//! delegated entirely to linfa-trees. Persists the model artifact (with its
//! expected-feature list) and the hold-out rows.

use linfa::prelude::*;
use linfa::Dataset;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{Map, Value};
use tracing::info;

use hfp_common::config::Paths;
use hfp_common::domain::{FEATURE_FIELDS, TARGET_FIELD};
use hfp_common::{Error, ModelArtifact, Result};

use crate::csvio;

/// Fixed shuffle seed keeps training runs reproducible
const SPLIT_SEED: u64 = 42;

/// Summary of one training run
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub holdout_accuracy: f64,
}

/// Run the train stage
pub fn train(paths: &Paths) -> Result<TrainReport> {
    let records = csvio::read_records(&paths.processed_data())?;
    if records.is_empty() {
        return Err(Error::Training("processed dataset is empty".to_string()));
    }
    info!("Training on {} rows", records.len());

    let width = FEATURE_FIELDS.len();
    let mut flat = Vec::with_capacity(records.len() * width);
    let mut targets = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let target = record
            .get(TARGET_FIELD)
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                Error::Training(format!(
                    "row {}: target column '{}' missing or non-integer",
                    i + 1,
                    TARGET_FIELD
                ))
            })?;
        targets.push(target as usize);
        for field in FEATURE_FIELDS {
            let value = record.get(field).and_then(Value::as_f64).ok_or_else(|| {
                Error::Training(format!(
                    "row {}: feature column '{}' missing or non-numeric",
                    i + 1,
                    field
                ))
            })?;
            flat.push(value);
        }
    }

    let matrix = Array2::from_shape_vec((records.len(), width), flat)
        .map_err(|e| Error::Training(format!("malformed feature matrix: {e}")))?;
    let feature_names: Vec<String> = FEATURE_FIELDS.iter().map(|s| s.to_string()).collect();
    let dataset = Dataset::new(matrix, Array1::from_vec(targets))
        .with_feature_names(feature_names.clone());

    let mut rng = StdRng::seed_from_u64(SPLIT_SEED);
    let (train_set, test_set) = dataset.shuffle(&mut rng).split_with_ratio(0.8);
    info!(
        "Split: {} training rows, {} hold-out rows",
        train_set.nsamples(),
        test_set.nsamples()
    );

    let tree = DecisionTree::params()
        .fit(&train_set)
        .map_err(|e| Error::Training(e.to_string()))?;

    let predicted = tree.predict(test_set.records());
    let correct = predicted
        .iter()
        .zip(test_set.targets().iter())
        .filter(|(a, b)| a == b)
        .count();
    let holdout_accuracy = if test_set.nsamples() > 0 {
        correct as f64 / test_set.nsamples() as f64
    } else {
        0.0
    };
    info!("Hold-out accuracy: {:.3}", holdout_accuracy);

    let artifact = ModelArtifact::new(feature_names.clone(), tree);
    artifact.save(&paths.model())?;
    info!("Saved model artifact to {}", paths.model().display());

    // Persist the hold-out rows (features plus target) for the predict stage
    let mut test_rows: Vec<Map<String, Value>> = Vec::with_capacity(test_set.nsamples());
    for (row, target) in test_set
        .records()
        .outer_iter()
        .zip(test_set.targets().iter())
    {
        let mut record = Map::new();
        for (field, value) in feature_names.iter().zip(row.iter()) {
            record.insert(field.clone(), csvio::number_value(*value));
        }
        record.insert(
            TARGET_FIELD.to_string(),
            Value::Number((*target as i64).into()),
        );
        test_rows.push(record);
    }
    let mut columns = feature_names;
    columns.push(TARGET_FIELD.to_string());
    csvio::write_records(&paths.test_data(), &test_rows, &columns)?;
    info!("Saved hold-out rows to {}", paths.test_data().display());

    Ok(TrainReport {
        rows: records.len(),
        train_rows: train_set.nsamples(),
        test_rows: test_set.nsamples(),
        holdout_accuracy,
    })
}
