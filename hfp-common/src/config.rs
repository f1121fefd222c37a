//! Configuration loading and root folder resolution
//!
//! All persisted state (model artifact, logs, CSV artifacts, database) lives
//! under one root folder, resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. `HFP_ROOT` environment variable
//! 3. TOML config file (`root_folder` key)
//! 4. Current directory (fallback)

use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;

/// Environment variable naming the root folder
pub const ROOT_ENV_VAR: &str = "HFP_ROOT";

/// Resolve the root folder from CLI argument, environment, config file or
/// the compiled default, in that order.
pub fn resolve_root_folder(cli_arg: Option<&Path>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(config_path) = config_file_path() {
        if let Ok(content) = fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&content) {
                if let Some(root) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root);
                }
            }
        }
    }

    // Priority 4: Current directory
    PathBuf::from(".")
}

/// Platform config file location (`<config dir>/hfp/config.toml`)
fn config_file_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("hfp").join("config.toml");
    path.exists().then_some(path)
}

/// Well-known paths under the root folder
#[derive(Debug, Clone)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serialized classifier plus expected-feature list
    pub fn model(&self) -> PathBuf {
        self.root.join("models").join("trained_model.json")
    }

    /// Current metrics snapshot, overwritten each recompute
    pub fn metrics(&self) -> PathBuf {
        self.root.join("logs").join("metrics.json")
    }

    /// Append-only newline-delimited prediction log
    pub fn prediction_log(&self) -> PathBuf {
        self.root.join("logs").join("api").join("predictions.log")
    }

    /// SQLite database holding prediction_logs / evaluations
    pub fn database(&self) -> PathBuf {
        self.root.join("hfp.db")
    }

    /// Raw input dataset
    pub fn raw_data(&self) -> PathBuf {
        self.root.join("data").join("heart.csv")
    }

    /// Encoded dataset, output of the preprocess stage
    pub fn processed_data(&self) -> PathBuf {
        self.root.join("data").join("processed_data.csv")
    }

    /// Hold-out rows written by the train stage
    pub fn test_data(&self) -> PathBuf {
        self.root.join("data").join("test_data.csv")
    }

    /// Batch predictions written by the predict stage
    pub fn predictions(&self) -> PathBuf {
        self.root.join("data").join("predictions.csv")
    }

    /// Create the data/logs/models directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(self.root.join("data"))?;
        fs::create_dir_all(self.root.join("models"))?;
        fs::create_dir_all(self.root.join("logs").join("api"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let root = resolve_root_folder(Some(Path::new("/tmp/hfp-test")));
        assert_eq!(root, PathBuf::from("/tmp/hfp-test"));
    }

    #[test]
    fn paths_follow_the_persisted_state_layout() {
        let paths = Paths::new(PathBuf::from("/srv/hfp"));
        assert_eq!(paths.model(), PathBuf::from("/srv/hfp/models/trained_model.json"));
        assert_eq!(paths.metrics(), PathBuf::from("/srv/hfp/logs/metrics.json"));
        assert_eq!(
            paths.prediction_log(),
            PathBuf::from("/srv/hfp/logs/api/predictions.log")
        );
        assert_eq!(paths.raw_data(), PathBuf::from("/srv/hfp/data/heart.csv"));
    }

    #[test]
    fn ensure_directories_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::new(dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        paths.ensure_directories().unwrap();
        assert!(dir.path().join("data").is_dir());
        assert!(dir.path().join("logs/api").is_dir());
    }
}
