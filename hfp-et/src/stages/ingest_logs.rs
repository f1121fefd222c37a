//! Ingest-logs stage: load the serving log into the database
//!
//! Reads `logs/api/predictions.log` and appends every entry to the
//! `prediction_logs` table. A missing log file is a no-op with a warning,
//! not an error (the serving side may simply not have run yet).

use std::path::Path;

use tracing::{info, warn};

use hfp_common::config::Paths;
use hfp_common::{db, logstore, Result};

/// Run the ingest-logs stage; returns the number of entries inserted
pub async fn ingest_logs(paths: &Paths, db_path: &Path) -> Result<usize> {
    let log_path = paths.prediction_log();
    if !log_path.exists() {
        warn!("No prediction log found at {}", log_path.display());
        return Ok(0);
    }

    let entries = logstore::read_entries(&log_path)?;
    info!(
        "Read {} log entries from {}",
        entries.len(),
        log_path.display()
    );

    let pool = db::init_database(db_path).await?;
    let result = async {
        for entry in &entries {
            db::insert_prediction_log(&pool, entry).await?;
        }
        Ok(entries.len())
    }
    .await;
    // Release connections on every exit path
    pool.close().await;

    if let Ok(count) = &result {
        info!("Inserted {} prediction log rows", count);
    }
    result
}
