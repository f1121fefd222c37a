//! Queries for the prediction_logs and evaluations tables

use serde_json::Value;
use sqlx::SqlitePool;

use crate::logstore::PredictionLogEntry;
use crate::metrics::MetricsValues;
use crate::Result;

/// One row of the prediction_logs table with its JSON columns parsed
#[derive(Debug, Clone)]
pub struct PredictionLogRow {
    pub timestamp: String,
    pub request: Value,
    pub predictions: Value,
}

/// Append one ingested log entry to prediction_logs
pub async fn insert_prediction_log(pool: &SqlitePool, entry: &PredictionLogEntry) -> Result<()> {
    sqlx::query("INSERT INTO prediction_logs (timestamp, request, predictions) VALUES (?, ?, ?)")
        .bind(&entry.timestamp)
        .bind(serde_json::to_string(&entry.request)?)
        .bind(serde_json::to_string(&entry.predictions)?)
        .execute(pool)
        .await?;
    Ok(())
}

/// Fetch every prediction_logs row in insertion order
pub async fn fetch_prediction_logs(pool: &SqlitePool) -> Result<Vec<PredictionLogRow>> {
    let rows = sqlx::query_as::<_, (String, String, String)>(
        "SELECT timestamp, request, predictions FROM prediction_logs ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(timestamp, request, predictions)| {
            Ok(PredictionLogRow {
                timestamp,
                request: serde_json::from_str(&request)?,
                predictions: serde_json::from_str(&predictions)?,
            })
        })
        .collect()
}

/// Append one metrics computation to the evaluations history
pub async fn insert_evaluation(
    pool: &SqlitePool,
    timestamp: &str,
    values: &MetricsValues,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO evaluations (timestamp, auc, precision, recall, accuracy)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(timestamp)
    .bind(values.auc)
    .bind(values.precision)
    .bind(values.recall)
    .bind(values.accuracy)
    .execute(pool)
    .await?;
    Ok(())
}

/// Number of accumulated evaluation records
pub async fn count_evaluations(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM evaluations")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
