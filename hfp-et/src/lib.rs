//! hfp-et library - ETL pipeline stages
//!
//! Each pipeline stage is an explicit named function over typed data; an
//! external orchestrator (or the `hfp-et` CLI) sequences them:
//! preprocess -> train -> predict, and ingest-logs -> evaluate on the
//! metrics path.

pub mod csvio;
pub mod stages;
