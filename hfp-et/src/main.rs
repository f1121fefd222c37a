//! hfp-et (ETL) - Heart failure pipeline stage runner
//!
//! Runs one pipeline stage per invocation; an external orchestrator (cron,
//! CI, a workflow engine) sequences the stages.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use hfp_common::config::{resolve_root_folder, Paths};
use hfp_et::stages;

#[derive(Parser, Debug)]
#[command(name = "hfp-et", about = "Heart failure prediction ETL pipeline")]
struct Cli {
    /// Root folder holding models/, logs/ and data/
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and encode data/heart.csv into data/processed_data.csv
    Preprocess,
    /// Fit the classifier and persist the model artifact plus hold-out data
    Train,
    /// Batch-predict over data/test_data.csv into data/predictions.csv
    Predict,
    /// Load logs/api/predictions.log into the prediction_logs table
    IngestLogs {
        /// Database path (defaults to <root>/hfp.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Recompute metrics from prediction_logs and persist them
    Evaluate {
        /// Database path (defaults to <root>/hfp.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting HFP ETL (hfp-et) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let root = resolve_root_folder(cli.root_folder.as_deref());
    let paths = Paths::new(root);
    paths.ensure_directories()?;
    info!("Root folder: {}", paths.root().display());

    match cli.command {
        Command::Preprocess => {
            let rows = stages::preprocess(&paths)?;
            info!("Preprocess complete: {} rows", rows);
        }
        Command::Train => {
            let report = stages::train(&paths)?;
            info!(
                "Training complete: {} rows ({} train / {} hold-out), accuracy {:.3}",
                report.rows, report.train_rows, report.test_rows, report.holdout_accuracy
            );
        }
        Command::Predict => {
            let rows = stages::predict(&paths)?;
            info!("Prediction complete: {} rows", rows);
        }
        Command::IngestLogs { db } => {
            let db_path = db.unwrap_or_else(|| paths.database());
            let rows = stages::ingest_logs(&paths, &db_path).await?;
            info!("Log ingestion complete: {} rows", rows);
        }
        Command::Evaluate { db } => {
            let db_path = db.unwrap_or_else(|| paths.database());
            let snapshot = stages::evaluate(&paths, &db_path).await?;
            info!(
                "Evaluation complete: accuracy {:.3} (updated {})",
                snapshot.accuracy, snapshot.last_updated
            );
        }
    }

    Ok(())
}
