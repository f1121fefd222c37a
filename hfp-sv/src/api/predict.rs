//! Prediction endpoint
//!
//! Per record, in order: Validate -> Encode -> Project -> classifier. The
//! whole batch succeeds or fails together; on success the response echoes
//! every input record augmented with a `Prediction` label and one log entry
//! covering the entire batch is appended.

use std::time::Duration;

use axum::extract::State;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use hfp_common::domain::{encode_record, project, validate};
use hfp_common::PredictionLogEntry;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Upper bound on one classifier invocation
const PREDICT_TIMEOUT: Duration = Duration::from_secs(5);

/// Request body: one record object or an ordered sequence of records
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PredictRequest {
    Many(Vec<Map<String, Value>>),
    One(Map<String, Value>),
}

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    Json(body): Json<PredictRequest>,
) -> ApiResult<Json<Value>> {
    let (records, single) = match body {
        PredictRequest::One(record) => (vec![record], true),
        PredictRequest::Many(records) => (records, false),
    };
    if records.is_empty() {
        return Err(ApiError::BadRequest("request contains no records".to_string()));
    }

    // All-or-nothing: any record failing validation or projection fails
    // the whole request before the classifier runs.
    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        let validated = validate(record).map_err(hfp_common::Error::Validation)?;
        let encoded = encode_record(&validated)?;
        rows.push(project(&encoded, &state.model.expected_features)?);
    }

    let labels = invoke_classifier(&state, rows).await?;

    // Echo each record with its label; output order matches input order 1:1
    let augmented: Vec<Value> = records
        .iter()
        .zip(&labels)
        .map(|(record, label)| {
            let mut out = record.clone();
            out.insert("Prediction".to_string(), json!(label));
            Value::Object(out)
        })
        .collect();

    // One log entry for the whole batch, shaped like the original request
    let request_payload = if single {
        Value::Object(records.into_iter().next().expect("single record present"))
    } else {
        Value::Array(records.into_iter().map(Value::Object).collect())
    };
    state
        .log
        .append(&PredictionLogEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            request: request_payload,
            predictions: labels,
        })
        .await?;

    if single {
        Ok(Json(augmented.into_iter().next().expect("single response present")))
    } else {
        Ok(Json(Value::Array(augmented)))
    }
}

/// Run the classifier on a blocking thread with a bounded deadline
async fn invoke_classifier(state: &AppState, rows: Vec<Vec<f64>>) -> ApiResult<Vec<i64>> {
    let model = state.model.clone();
    let prediction = tokio::time::timeout(
        PREDICT_TIMEOUT,
        tokio::task::spawn_blocking(move || model.predict_rows(&rows)),
    )
    .await
    .map_err(|_| {
        ApiError::Internal(hfp_common::Error::Timeout(
            "classifier invocation exceeded deadline".to_string(),
        ))
    })?
    .map_err(|e| {
        ApiError::Internal(hfp_common::Error::Internal(format!(
            "classifier task failed: {e}"
        )))
    })?;

    Ok(prediction?)
}
