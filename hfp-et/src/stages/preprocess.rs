//! Preprocess stage: validate and encode the raw dataset
//!
//! Reads `data/heart.csv`, runs every row through the same validator and
//! category encoder the serving path uses, and writes the fully numeric
//! `data/processed_data.csv`. Any out-of-domain or missing value is a hard
//! error; the encoded output never contains a string in a categorical
//! column.

use serde_json::Map;
use tracing::{error, info};

use hfp_common::config::Paths;
use hfp_common::domain::{encode_record, validate, FEATURE_FIELDS, TARGET_FIELD};
use hfp_common::{Error, Result};

use crate::csvio;

/// Run the preprocess stage; returns the number of rows written
pub fn preprocess(paths: &Paths) -> Result<usize> {
    let raw = csvio::read_records(&paths.raw_data())?;
    info!("Loaded {} rows from {}", raw.len(), paths.raw_data().display());

    let has_target = raw
        .first()
        .map(|r| r.contains_key(TARGET_FIELD))
        .unwrap_or(false);

    let mut encoded_rows = Vec::with_capacity(raw.len());
    for (i, record) in raw.iter().enumerate() {
        let validated = validate(record).map_err(|e| {
            error!("Row {} failed validation: {}", i + 1, e);
            Error::Validation(e)
        })?;
        let encoded = encode_record(&validated)?;

        let mut row = Map::new();
        for (field, value) in encoded.iter() {
            row.insert(field.to_string(), csvio::number_value(value));
        }
        encoded_rows.push(row);
    }

    let mut columns: Vec<String> = FEATURE_FIELDS.iter().map(|s| s.to_string()).collect();
    if has_target {
        columns.push(TARGET_FIELD.to_string());
    }

    let out_path = paths.processed_data();
    csvio::write_records(&out_path, &encoded_rows, &columns)?;
    info!(
        "Wrote {} encoded rows to {}",
        encoded_rows.len(),
        out_path.display()
    );
    Ok(encoded_rows.len())
}
