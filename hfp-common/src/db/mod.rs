//! Database access for the ETL path
//!
//! Two append-only tables: `prediction_logs` (ingested from the serving
//! log) and `evaluations` (metrics history). No updates or deletes.

mod init;
mod logs;

pub use init::init_database;
pub use logs::{
    count_evaluations, fetch_prediction_logs, insert_evaluation, insert_prediction_log,
    PredictionLogRow,
};
