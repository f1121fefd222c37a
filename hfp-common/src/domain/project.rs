//! Feature projector
//!
//! Reduces and reorders an encoded record onto the exact ordered feature
//! vector the classifier was fit on. Order is the contract: the model
//! consumes positional columns, so reordering is not optional. A missing
//! field is always an error naming the complete missing set, never a
//! silently defaulted value.

use std::collections::BTreeSet;

use crate::domain::encode::EncodedRecord;
use crate::{Error, Result};

/// Project an encoded record onto the model's expected feature list.
///
/// Returns the values in exactly `expected` order, or fails with
/// `MissingFeatures` enumerating every absent field.
pub fn project(record: &EncodedRecord, expected: &[String]) -> Result<Vec<f64>> {
    let mut vector = Vec::with_capacity(expected.len());
    let mut missing = BTreeSet::new();
    for field in expected {
        match record.get(field) {
            Some(value) => vector.push(value),
            None => {
                missing.insert(field.clone());
            }
        }
    }
    if !missing.is_empty() {
        return Err(Error::MissingFeatures(missing));
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(fields: &[(&str, f64)]) -> EncodedRecord {
        EncodedRecord::from_values(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn expected(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn output_follows_expected_order_exactly() {
        let rec = record(&[("Age", 54.0), ("MaxHR", 150.0), ("Sex", 1.0)]);
        let vector = project(&rec, &expected(&["MaxHR", "Age", "Sex"])).unwrap();
        assert_eq!(vector, vec![150.0, 54.0, 1.0]);
    }

    #[test]
    fn superset_records_project_onto_expected_length() {
        let rec = record(&[("Age", 54.0), ("MaxHR", 150.0), ("HeartDisease", 1.0)]);
        let names = expected(&["Age", "MaxHR"]);
        let vector = project(&rec, &names).unwrap();
        assert_eq!(vector.len(), names.len());
    }

    #[test]
    fn one_missing_field_is_named() {
        let rec = record(&[("Age", 54.0)]);
        let err = project(&rec, &expected(&["Age", "Cholesterol"])).unwrap_err();
        match err {
            Error::MissingFeatures(missing) => {
                assert_eq!(missing.into_iter().collect::<Vec<_>>(), vec!["Cholesterol"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn the_complete_missing_set_is_reported() {
        let rec = record(&[]);
        let err = project(&rec, &expected(&["Age", "MaxHR", "Sex"])).unwrap_err();
        match err {
            Error::MissingFeatures(missing) => {
                assert_eq!(missing.len(), 3);
                assert!(missing.contains("Age"));
                assert!(missing.contains("MaxHR"));
                assert!(missing.contains("Sex"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn absence_is_never_defaulted_to_zero() {
        let rec = record(&[("Age", 54.0)]);
        assert!(project(&rec, &expected(&["Age", "Oldpeak"])).is_err());
    }
}
