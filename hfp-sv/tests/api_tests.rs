//! Integration tests for hfp-sv API endpoints
//!
//! Tests cover:
//! - Liveness and health endpoints
//! - Prediction happy path (response augmentation + log append)
//! - Batch ordering and all-or-nothing failure semantics
//! - Missing-feature and validation 400 responses
//! - Metrics snapshot endpoint and its no-metrics fallback

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use linfa::prelude::Fit;
use linfa::Dataset;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

use hfp_common::domain::FEATURE_FIELDS;
use hfp_common::metrics::{write_snapshot, MetricsValues};
use hfp_common::{ModelArtifact, PredictionLog};
use hfp_sv::{build_router, AppState};

/// Test helper: fit a tiny tree over the real 11-feature schema.
///
/// Labels split on Oldpeak (index 9): rows with Oldpeak >= 2.0 are class 1.
fn tiny_model() -> ModelArtifact {
    let mut rows: Vec<f64> = Vec::new();
    let mut labels: Vec<usize> = Vec::new();
    for i in 0..8 {
        let oldpeak = if i % 2 == 0 { 0.5 } else { 3.0 };
        // Age, Sex, ChestPainType, RestingBP, Cholesterol, FastingBS,
        // RestingECG, MaxHR, ExerciseAngina, Oldpeak, ST_Slope.
        // Everything except Oldpeak is constant so the split is on Oldpeak.
        rows.extend_from_slice(&[
            54.0, 1.0, 0.0, 130.0, 240.0, 0.0, 0.0, 150.0, 0.0, oldpeak, 0.0,
        ]);
        labels.push(if oldpeak >= 2.0 { 1 } else { 0 });
    }
    let records = Array2::from_shape_vec((8, 11), rows).unwrap();
    let targets = Array1::from_vec(labels);
    let tree = DecisionTree::params()
        .fit(&Dataset::new(records, targets))
        .expect("tiny model should fit");

    let expected = FEATURE_FIELDS.iter().map(|s| s.to_string()).collect();
    ModelArtifact::new(expected, tree)
}

/// Test helper: build app state rooted in a temp dir
fn setup_app(dir: &TempDir) -> axum::Router {
    let log = PredictionLog::new(dir.path().join("logs/api/predictions.log"));
    let state = AppState::new(tiny_model(), log, dir.path().join("logs/metrics.json"));
    build_router(state)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn sample_record() -> Value {
    json!({
        "Age": 54,
        "Sex": "M",
        "ChestPainType": "ATA",
        "RestingBP": 130,
        "Cholesterol": 246,
        "FastingBS": 0,
        "RestingECG": "Normal",
        "MaxHR": 150,
        "ExerciseAngina": "N",
        "Oldpeak": 1.0,
        "ST_Slope": "Up"
    })
}

fn log_line_count(dir: &TempDir) -> usize {
    let path = dir.path().join("logs/api/predictions.log");
    if !path.exists() {
        return 0;
    }
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .count()
}

// =============================================================================
// Liveness / health
// =============================================================================

#[tokio::test]
async fn test_root_liveness_message() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);

    let response = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "Heart Failure Prediction API");
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "hfp-sv");
    assert!(body["version"].is_string());
}

// =============================================================================
// Prediction: happy path
// =============================================================================

#[tokio::test]
async fn test_predict_single_record_appends_one_log_line() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);

    let request = post_json("/predict", &json!([sample_record()]));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let records = body.as_array().expect("array response for array input");
    assert_eq!(records.len(), 1);
    let prediction = records[0]["Prediction"].as_i64().unwrap();
    assert!(prediction == 0 || prediction == 1);
    // Input fields are echoed back
    assert_eq!(records[0]["Age"], 54);

    assert_eq!(log_line_count(&dir), 1);
}

#[tokio::test]
async fn test_predict_bare_object_gets_object_response() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);

    let request = post_json("/predict", &sample_record());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert!(body.is_object());
    let prediction = body["Prediction"].as_i64().unwrap();
    assert!(prediction == 0 || prediction == 1);
    assert_eq!(log_line_count(&dir), 1);
}

#[tokio::test]
async fn test_predict_batch_preserves_input_order() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);

    let mut batch = Vec::new();
    for (i, oldpeak) in [(0, 0.5), (1, 3.0), (2, 0.5)] {
        let mut record = sample_record();
        record["Age"] = json!(40 + i);
        record["Oldpeak"] = json!(oldpeak);
        batch.push(record);
    }

    let request = post_json("/predict", &json!(batch));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 3);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record["Age"].as_i64().unwrap(), 40 + i as i64);
        let p = record["Prediction"].as_i64().unwrap();
        assert!(p == 0 || p == 1);
    }
    // High Oldpeak row classified positive by the tiny model
    assert_eq!(records[1]["Prediction"], 1);
    assert_eq!(records[0]["Prediction"], 0);

    assert_eq!(log_line_count(&dir), 1);
}

// =============================================================================
// Prediction: client errors
// =============================================================================

#[tokio::test]
async fn test_predict_missing_cholesterol_names_the_field() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);

    let mut record = sample_record();
    record.as_object_mut().unwrap().remove("Cholesterol");

    let request = post_json("/predict", &json!([record]));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    let violations = body["error"]["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["field"], "Cholesterol");

    // Failed requests are not logged
    assert_eq!(log_line_count(&dir), 0);
}

#[tokio::test]
async fn test_predict_batch_is_all_or_nothing() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);

    let mut bad = sample_record();
    bad.as_object_mut().unwrap().remove("MaxHR");
    let batch = json!([sample_record(), bad, sample_record()]);

    let request = post_json("/predict", &batch);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // No partial output, no log entry
    assert_eq!(log_line_count(&dir), 0);
}

#[tokio::test]
async fn test_predict_unknown_category_value_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);

    let mut record = sample_record();
    record["ChestPainType"] = json!("XXX");

    let request = post_json("/predict", &json!([record]));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    let violations = body["error"]["violations"].as_array().unwrap();
    assert_eq!(violations[0]["field"], "ChestPainType");
}

#[tokio::test]
async fn test_predict_empty_batch_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);

    let request = post_json("/predict", &json!([]));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Metrics endpoint
// =============================================================================

#[tokio::test]
async fn test_metrics_fallback_message_when_none_recorded() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir);

    let response = app.oneshot(get_request("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "no metrics recorded");
}

#[tokio::test]
async fn test_metrics_returns_current_snapshot() {
    let dir = TempDir::new().unwrap();
    let values = MetricsValues { accuracy: 0.75, auc: 0.75, precision: 1.0, recall: 0.5 };
    write_snapshot(&dir.path().join("logs/metrics.json"), &values).unwrap();
    let app = setup_app(&dir);

    let response = app.oneshot(get_request("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["accuracy"], 0.75);
    assert_eq!(body["precision"], 1.0);
    assert!(body["last_updated"].is_string());
}
