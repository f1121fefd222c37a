//! Append-only prediction log
//!
//! One newline-delimited JSON entry per request batch. Concurrent appends
//! are serialized behind a single writer lock so entries can never
//! interleave or truncate each other.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{Error, Result};

/// One persisted (request batch, prediction batch, timestamp) triple
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionLogEntry {
    /// ISO-8601 timestamp of the request
    pub timestamp: String,
    /// The request payload as received: one record object or an array
    pub request: Value,
    /// Predicted labels, aligned positionally with the request records
    pub predictions: Vec<i64>,
}

/// Append-only NDJSON sink for prediction log entries
pub struct PredictionLog {
    path: PathBuf,
    writer: Mutex<()>,
}

impl PredictionLog {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a single line.
    ///
    /// The line is serialized up front and written with one `write_all`
    /// under the writer lock, so concurrent callers cannot corrupt the file.
    pub async fn append(&self, entry: &PredictionLogEntry) -> Result<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let _guard = self.writer.lock().await;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&line)?;
        Ok(())
    }
}

/// Read every entry from a prediction log file.
///
/// Fails with `ArtifactNotFound` when the file does not exist; callers that
/// treat a missing log as a no-op check for existence first.
pub fn read_entries(path: &Path) -> Result<Vec<PredictionLogEntry>> {
    if !path.exists() {
        return Err(Error::ArtifactNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(Error::from))
        .collect()
}
