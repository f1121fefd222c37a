//! Evaluate stage: recompute metrics from the prediction log history
//!
//! Correlates `prediction_logs` rows with the ground truth embedded in
//! their request payloads, computes the standard binary classification
//! metrics, overwrites the current snapshot file and appends one row to the
//! `evaluations` history.

use std::path::Path;

use sqlx::SqlitePool;
use tracing::{info, warn};

use hfp_common::config::Paths;
use hfp_common::metrics::{self, MetricsSnapshot};
use hfp_common::{db, Result};

/// Run the evaluate stage
pub async fn evaluate(paths: &Paths, db_path: &Path) -> Result<MetricsSnapshot> {
    let pool = db::init_database(db_path).await?;
    let result = evaluate_with_pool(&pool, paths).await;
    // Release connections on every exit path
    pool.close().await;
    result
}

async fn evaluate_with_pool(pool: &SqlitePool, paths: &Paths) -> Result<MetricsSnapshot> {
    let rows = db::fetch_prediction_logs(pool).await?;
    info!("Found {} rows in prediction_logs", rows.len());

    let entries: Vec<_> = rows
        .into_iter()
        .map(|row| (row.request, row.predictions))
        .collect();
    let (pairs, skipped) = metrics::collect_pairs(&entries);
    for skip in &skipped {
        warn!("Skipping log entry {}: {:?}", skip.index, skip.reason);
    }
    info!(
        "{} usable (ground truth, prediction) pairs, {} skipped",
        pairs.len(),
        skipped.len()
    );

    let values = metrics::compute(&pairs)?;
    let snapshot = metrics::write_snapshot(&paths.metrics(), &values)?;
    db::insert_evaluation(pool, &snapshot.last_updated, &values).await?;

    info!(
        "Metrics: accuracy {:.3}, auc {:.3}, precision {:.3}, recall {:.3}",
        values.accuracy, values.auc, values.precision, values.recall
    );
    Ok(snapshot)
}
