//! Classification metrics over the prediction log history
//!
//! Per-entry validity issues are modeled as an explicit partition into
//! usable (ground truth, prediction) pairs plus a skipped-with-reason list,
//! so callers and tests can assert on the skips directly instead of relying
//! on interleaved logging.

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Current metrics snapshot, overwritten wholesale on each recompute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub accuracy: f64,
    pub auc: f64,
    pub precision: f64,
    pub recall: f64,
    pub last_updated: String,
}

/// Computed metric values, before timestamping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsValues {
    pub accuracy: f64,
    pub auc: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Why one log entry was excluded from the metrics computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Request payload carries no `HeartDisease` ground truth
    MissingGroundTruth,
    /// Predictions field is not a non-empty array
    EmptyPredictions,
    /// Request payload is not a record or array of records
    MalformedRequest,
}

/// One skipped log entry with its reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub index: usize,
    pub reason: SkipReason,
}

/// Partition log entries into usable (ground truth, prediction) pairs and
/// skipped entries.
///
/// Granularity is per entry, not per record: only the first record of a
/// batch contributes its ground truth, paired with the first predicted
/// label. Skipping is never an error.
pub fn collect_pairs(
    entries: &[(Value, Value)],
) -> (Vec<(i64, i64)>, Vec<SkippedEntry>) {
    let mut pairs = Vec::new();
    let mut skipped = Vec::new();

    for (index, (request, predictions)) in entries.iter().enumerate() {
        // A batched request contributes its first record only
        let record = match request {
            Value::Array(records) => records.first(),
            Value::Object(_) => Some(request),
            _ => None,
        };
        let Some(Value::Object(record)) = record else {
            skipped.push(SkippedEntry {
                index,
                reason: SkipReason::MalformedRequest,
            });
            continue;
        };

        let Some(truth) = record.get("HeartDisease").and_then(Value::as_i64) else {
            skipped.push(SkippedEntry {
                index,
                reason: SkipReason::MissingGroundTruth,
            });
            continue;
        };

        let first_prediction = match predictions {
            Value::Array(labels) if !labels.is_empty() => labels[0].as_i64(),
            _ => None,
        };
        let Some(predicted) = first_prediction else {
            skipped.push(SkippedEntry {
                index,
                reason: SkipReason::EmptyPredictions,
            });
            continue;
        };

        pairs.push((truth, predicted));
    }

    (pairs, skipped)
}

/// Compute accuracy, precision, recall and AUC over binary pairs.
///
/// Fails with `InsufficientData` on zero pairs and `DegenerateMetrics` when
/// the ground truth contains only one class (AUC and recall are undefined
/// there; surfacing an error beats a silent NaN).
pub fn compute(pairs: &[(i64, i64)]) -> Result<MetricsValues> {
    if pairs.is_empty() {
        return Err(Error::InsufficientData);
    }

    let positives = pairs.iter().filter(|(t, _)| *t == 1).count();
    let negatives = pairs.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(Error::DegenerateMetrics(format!(
            "ground truth contains a single class ({} positive, {} negative)",
            positives, negatives
        )));
    }

    let n = pairs.len() as f64;
    let correct = pairs.iter().filter(|(t, p)| t == p).count() as f64;
    let tp = pairs.iter().filter(|(t, p)| *t == 1 && *p == 1).count() as f64;
    let fp = pairs.iter().filter(|(t, p)| *t == 0 && *p == 1).count() as f64;

    let accuracy = correct / n;
    let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
    let recall = tp / positives as f64;

    // Mann-Whitney rank form of ROC AUC; ties between scores count 0.5.
    // With hard 0/1 predictions as scores this equals balanced accuracy.
    let mut wins = 0.0;
    for &(_, p_pos) in pairs.iter().filter(|(t, _)| *t == 1) {
        for &(_, p_neg) in pairs.iter().filter(|(t, _)| *t == 0) {
            if p_pos > p_neg {
                wins += 1.0;
            } else if p_pos == p_neg {
                wins += 0.5;
            }
        }
    }
    let auc = wins / (positives as f64 * negatives as f64);

    Ok(MetricsValues {
        accuracy,
        auc,
        precision,
        recall,
    })
}

/// Overwrite the current snapshot file with freshly computed values
pub fn write_snapshot(path: &Path, values: &MetricsValues) -> Result<MetricsSnapshot> {
    let snapshot = MetricsSnapshot {
        accuracy: values.accuracy,
        auc: values.auc,
        precision: values.precision,
        recall: values.recall,
        last_updated: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    serde_json::to_writer(file, &snapshot)?;
    Ok(snapshot)
}

/// Read the current snapshot, if one has been recorded yet
pub fn read_snapshot(path: &Path) -> Result<Option<MetricsSnapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let file = fs::File::open(path)?;
    Ok(Some(serde_json::from_reader(file)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn zero_pairs_is_insufficient_data() {
        assert!(matches!(compute(&[]), Err(Error::InsufficientData)));
    }

    #[test]
    fn known_history_yields_expected_metrics() {
        // truth [1,0,1,0], predictions [1,0,0,0]
        let pairs = [(1, 1), (0, 0), (1, 0), (0, 0)];
        let values = compute(&pairs).unwrap();
        assert_eq!(values.accuracy, 0.75);
        assert_eq!(values.precision, 1.0);
        assert_eq!(values.recall, 0.5);
        assert_eq!(values.auc, 0.75);
    }

    #[test]
    fn perfect_predictions_score_one() {
        let pairs = [(1, 1), (0, 0), (1, 1), (0, 0)];
        let values = compute(&pairs).unwrap();
        assert_eq!(values.accuracy, 1.0);
        assert_eq!(values.precision, 1.0);
        assert_eq!(values.recall, 1.0);
        assert_eq!(values.auc, 1.0);
    }

    #[test]
    fn one_class_ground_truth_is_a_defined_error() {
        let err = compute(&[(1, 1), (1, 0)]).unwrap_err();
        assert!(matches!(err, Error::DegenerateMetrics(_)));
    }

    #[test]
    fn no_positive_predictions_gives_zero_precision() {
        let pairs = [(1, 0), (0, 0)];
        let values = compute(&pairs).unwrap();
        assert_eq!(values.precision, 0.0);
        assert_eq!(values.recall, 0.0);
    }

    #[test]
    fn collect_pairs_partitions_with_reasons() {
        let entries = vec![
            // usable: batched request, first record has ground truth
            (
                json!([{"Age": 54, "HeartDisease": 1}, {"Age": 61}]),
                json!([1, 0]),
            ),
            // skipped: no ground truth
            (json!([{"Age": 40}]), json!([0])),
            // skipped: empty predictions
            (json!([{"Age": 40, "HeartDisease": 0}]), json!([])),
            // skipped: predictions not an array
            (json!([{"Age": 40, "HeartDisease": 0}]), json!("none")),
            // usable: bare object request
            (json!({"Age": 70, "HeartDisease": 0}), json!([0])),
            // skipped: request is a scalar
            (json!(42), json!([1])),
        ];

        let (pairs, skipped) = collect_pairs(&entries);
        assert_eq!(pairs, vec![(1, 1), (0, 0)]);
        assert_eq!(
            skipped,
            vec![
                SkippedEntry { index: 1, reason: SkipReason::MissingGroundTruth },
                SkippedEntry { index: 2, reason: SkipReason::EmptyPredictions },
                SkippedEntry { index: 3, reason: SkipReason::EmptyPredictions },
                SkippedEntry { index: 5, reason: SkipReason::MalformedRequest },
            ]
        );
    }

    #[test]
    fn snapshot_is_overwritten_wholesale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("metrics.json");

        let first = MetricsValues { accuracy: 0.5, auc: 0.5, precision: 0.5, recall: 0.5 };
        write_snapshot(&path, &first).unwrap();

        let second = MetricsValues { accuracy: 0.75, auc: 0.75, precision: 1.0, recall: 0.5 };
        write_snapshot(&path, &second).unwrap();

        let snapshot = read_snapshot(&path).unwrap().unwrap();
        assert_eq!(snapshot.accuracy, 0.75);
        assert!(!snapshot.last_updated.is_empty());
    }

    #[test]
    fn absent_snapshot_reads_as_none() {
        let dir = tempdir().unwrap();
        assert!(read_snapshot(&dir.path().join("metrics.json")).unwrap().is_none());
    }
}
