//! Schema validator
//!
//! Checks that an input record contains every required feature field with a
//! value inside its declared domain, before any encoding happens. All field
//! violations are collected into one aggregated error, not just the first.
//!
//! Numeric ranges are deliberately unchecked (matching the trained model's
//! input distribution contract); Oldpeak is a signed float.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::schema::{self, FieldKind, FEATURE_FIELDS, TARGET_FIELD};
use crate::domain::encode;

/// One field-level validation failure
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

/// Aggregated validation failure listing every field violation
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: ")?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", v.field, v.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A record whose fields all passed schema validation.
///
/// Holds the checked JSON values keyed by field name; categorical fields are
/// still strings here (encoding is a separate step).
#[derive(Debug, Clone)]
pub struct ValidatedRecord {
    values: BTreeMap<String, Value>,
}

impl ValidatedRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Ground-truth label, when the record carries one
    pub fn ground_truth(&self) -> Option<i64> {
        self.values.get(TARGET_FIELD).and_then(Value::as_i64)
    }
}

/// Validate a raw JSON record against the feature schema.
///
/// Unknown extra fields are ignored (the projector drops them later); the
/// optional `HeartDisease` label is checked and carried through when present.
pub fn validate(record: &Map<String, Value>) -> Result<ValidatedRecord, ValidationError> {
    let mut violations = Vec::new();
    let mut values = BTreeMap::new();

    for field in FEATURE_FIELDS {
        match record.get(field) {
            None => violations.push(FieldViolation {
                field: field.to_string(),
                reason: "required field is missing".to_string(),
            }),
            Some(value) => match check_field(field, value) {
                Ok(()) => {
                    values.insert(field.to_string(), value.clone());
                }
                Err(reason) => violations.push(FieldViolation {
                    field: field.to_string(),
                    reason,
                }),
            },
        }
    }

    // Optional ground truth, training/evaluation only
    if let Some(value) = record.get(TARGET_FIELD) {
        match check_field(TARGET_FIELD, value) {
            Ok(()) => {
                values.insert(TARGET_FIELD.to_string(), value.clone());
            }
            Err(reason) => violations.push(FieldViolation {
                field: TARGET_FIELD.to_string(),
                reason,
            }),
        }
    }

    if violations.is_empty() {
        Ok(ValidatedRecord { values })
    } else {
        Err(ValidationError { violations })
    }
}

fn check_field(field: &str, value: &Value) -> Result<(), String> {
    match schema::field_kind(field) {
        Some(FieldKind::Integer) => match value.as_i64() {
            Some(_) => Ok(()),
            None => Err("expected an integer".to_string()),
        },
        Some(FieldKind::Float) => match value.as_f64() {
            Some(_) => Ok(()),
            None => Err("expected a number".to_string()),
        },
        Some(FieldKind::Binary) => match value.as_i64() {
            Some(0) | Some(1) => Ok(()),
            _ => Err("expected 0 or 1".to_string()),
        },
        Some(FieldKind::Categorical) => {
            let allowed = encode::domain(field).unwrap_or_default();
            match value.as_str() {
                Some(s) if allowed.iter().any(|&a| a == s) => Ok(()),
                Some(s) => Err(format!(
                    "value '{}' not in allowed set {:?}",
                    s, allowed
                )),
                None => Err(format!("expected one of {:?}", allowed)),
            }
        }
        None => Err("unknown field".to_string()),
    }
}
