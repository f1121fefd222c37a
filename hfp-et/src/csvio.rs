//! CSV reading/writing for the pipeline artifacts
//!
//! Every artifact is an ordered sequence of records with a fixed column
//! set. Cell values are coerced numerically where they parse as numbers
//! (integer first, then float) and kept as strings otherwise, so the same
//! reader handles both the raw dataset and the encoded intermediates.

use std::fs;
use std::path::Path;

use serde_json::{Map, Number, Value};

use hfp_common::{Error, Result};

/// Read a CSV file with headers into one JSON-valued map per row
pub fn read_records(path: &Path) -> Result<Vec<Map<String, Value>>> {
    if !path.exists() {
        return Err(Error::ArtifactNotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = Map::new();
        for (field, raw) in headers.iter().zip(row.iter()) {
            record.insert(field.clone(), coerce(raw));
        }
        records.push(record);
    }
    Ok(records)
}

/// Write records as CSV with the given column order.
///
/// A record lacking one of the columns is an error; artifacts never carry
/// holes.
pub fn write_records(
    path: &Path,
    records: &[Map<String, Value>],
    columns: &[String],
) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns)?;
    for (i, record) in records.iter().enumerate() {
        let mut cells = Vec::with_capacity(columns.len());
        for column in columns {
            let value = record.get(column).ok_or_else(|| {
                Error::Internal(format!("row {}: missing column '{}'", i + 1, column))
            })?;
            cells.push(cell_text(value));
        }
        writer.write_record(&cells)?;
    }
    writer.flush()?;
    Ok(())
}

fn coerce(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(Number::from(i));
    }
    if let Ok(f) = raw.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Render an encoded f64 cell: integral codes print without a decimal point
pub fn number_value(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Value::Number(Number::from(v as i64))
    } else {
        Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
    }
}
