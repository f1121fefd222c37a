//! Predict stage: batch predictions over the hold-out data
//!
//! Reads `data/test_data.csv` and the trained model, projects every row
//! onto the model's expected-feature list (missing columns are a hard error
//! naming the complete set) and writes `data/predictions.csv` with the
//! ground truth and predicted labels side by side.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::info;

use hfp_common::config::Paths;
use hfp_common::domain::encode::EncodedRecord;
use hfp_common::domain::{project, TARGET_FIELD};
use hfp_common::{Error, ModelArtifact, Result};

use crate::csvio;

/// Run the predict stage; returns the number of predictions written
pub fn predict(paths: &Paths) -> Result<usize> {
    let records = csvio::read_records(&paths.test_data())?;
    let artifact = ModelArtifact::load(&paths.model())?;
    info!(
        "Predicting {} rows with a {}-feature model",
        records.len(),
        artifact.expected_features.len()
    );

    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if !record.contains_key(TARGET_FIELD) {
            return Err(Error::Internal(format!(
                "row {}: test data lacks the '{}' column",
                i + 1,
                TARGET_FIELD
            )));
        }
        let values: BTreeMap<String, f64> = record
            .iter()
            .filter_map(|(field, value)| value.as_f64().map(|v| (field.clone(), v)))
            .collect();
        let encoded = EncodedRecord::from_values(values);
        rows.push(project(&encoded, &artifact.expected_features)?);
    }

    let labels = artifact.predict_rows(&rows)?;

    let mut out = records;
    for (record, label) in out.iter_mut().zip(&labels) {
        record.insert("Predictions".to_string(), json!(label));
    }

    let mut columns: Vec<String> = artifact.expected_features.clone();
    columns.push(TARGET_FIELD.to_string());
    columns.push("Predictions".to_string());
    csvio::write_records(&paths.predictions(), &out, &columns)?;
    info!(
        "Wrote {} predictions to {}",
        out.len(),
        paths.predictions().display()
    );
    Ok(out.len())
}
