//! hfp-sv (Prediction Serving) - Heart failure risk serving microservice
//!
//! Loads the trained model artifact at startup (fatal if missing) and
//! serves predictions, the liveness endpoint and the current metrics
//! snapshot over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use hfp_common::config::{resolve_root_folder, Paths};
use hfp_common::{ModelArtifact, PredictionLog};
use hfp_sv::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "hfp-sv", about = "Heart failure prediction serving service")]
struct Args {
    /// Root folder holding models/, logs/ and data/
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    listen: SocketAddr,
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
        "Starting HFP Prediction Serving (hfp-sv) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let root = resolve_root_folder(args.root_folder.as_deref());
    let paths = Paths::new(root);
    paths.ensure_directories()?;
    info!("Root folder: {}", paths.root().display());

    // Missing model artifact is a deployment fault: fatal at startup,
    // never a per-request error.
    let model_path = paths.model();
    let model = match ModelArtifact::load(&model_path) {
        Ok(model) => {
            info!(
                "✓ Loaded trained model ({} expected features)",
                model.expected_features.len()
            );
            model
        }
        Err(e) => {
            error!("Failed to load model artifact: {}", e);
            return Err(e.into());
        }
    };

    let log = PredictionLog::new(paths.prediction_log());
    let state = AppState::new(model, log, paths.metrics());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("hfp-sv listening on http://{}", args.listen);
    info!("Health check: http://{}/health", args.listen);

    axum::serve(listener, app).await?;

    Ok(())
}
