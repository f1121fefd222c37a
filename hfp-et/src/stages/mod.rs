//! Pipeline stages
//!
//! Linear flow: preprocess -> train -> predict produce the CSV and model
//! artifacts; ingest-logs and evaluate drive the metrics path through the
//! database.

mod evaluate;
mod ingest_logs;
mod predict;
mod preprocess;
mod train;

pub use evaluate::evaluate;
pub use ingest_logs::ingest_logs;
pub use predict::predict;
pub use preprocess::preprocess;
pub use train::{train, TrainReport};
