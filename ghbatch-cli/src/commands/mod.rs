pub mod lists;
pub mod reconcile;
pub mod scan;

use std::path::PathBuf;

use anyhow::{Context, Result};

use ghbatch_core::{Config, ConfigOverrides, EnvSnapshot};

/// Resolve the run configuration from the process environment and CLI overrides.
pub fn load_config(workspace_dir: Option<PathBuf>, scan_root: Option<PathBuf>) -> Result<Config> {
    let overrides = ConfigOverrides {
        workspace_dir,
        scan_root,
    };
    let config = Config::load(&EnvSnapshot::from_process(), &overrides)
        .context("failed to load configuration")?;
    tracing::debug!(?config, "configuration resolved");
    Ok(config)
}
