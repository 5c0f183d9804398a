// ============================================================
// Layer 6 — Run Directory
// ============================================================
// Every run gets its own folder under the configured log_dir:
//
//   .logs/
//     default-20240101-120000/
//       config.json     ← the resolved configuration
//       train/          ← EventWriter for the training stream
//       val/            ← EventWriter for the validation stream
//
// config.json is written before training starts so a run's
// curves can always be traced back to its hyperparameters.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::config::Config;

/// `mkdir -p parent/child` and return the joined path.
pub fn get_or_create_dir(parent: impl AsRef<Path>, child: &str) -> Result<PathBuf> {
    let dir = parent.as_ref().join(child);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;
    Ok(dir)
}

pub struct RunDirectory {
    root: PathBuf,
}

impl RunDirectory {
    /// Create `<log_dir>/<run_name>`.
    pub fn create(log_dir: impl AsRef<Path>, run_name: &str) -> Result<Self> {
        let root = get_or_create_dir(log_dir, run_name)?;
        tracing::info!("Run directory: '{}'", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for one event stream, e.g. "train" or "val".
    pub fn stream(&self, name: &str) -> Result<PathBuf> {
        get_or_create_dir(&self.root, name)
    }

    /// Write the configuration to `config.json`.
    pub fn save_config(&self, config: &Config) -> Result<()> {
        let path = self.root.join("config.json");
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved run config to '{}'", path.display());
        Ok(())
    }
}
