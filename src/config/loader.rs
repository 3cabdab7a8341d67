//! Configuration loading with defaults

use std::path::Path;

use crate::errors::{Result, WorkgateError};
use crate::fs;
use crate::schemas::EngineConfig;

/// Load engine configuration for the workspace containing `cwd`.
///
/// Outside a workspace, or when `.workgate/config.json` does not exist, the
/// defaults are returned. A config file that parses but holds out-of-range
/// values is a `ConfigError`.
pub fn load_config(cwd: &Path) -> Result<EngineConfig> {
    let root = match fs::find_workspace_root(cwd) {
        Ok(root) => root,
        Err(WorkgateError::WorkspaceNotFound(reason)) => {
            tracing::debug!(%reason, "no workspace found; using default configuration");
            return Ok(EngineConfig::default());
        }
        Err(e) => return Err(e),
    };

    let config = fs::read_config(&root)?;
    config.validate().map_err(WorkgateError::ConfigError)?;
    tracing::debug!(root = %root.display(), "loaded configuration");
    Ok(config)
}

/// Write a default configuration file under `root`, returning its path.
///
/// An existing file is left alone unless `force` is set.
pub fn init_config(root: &Path, force: bool) -> Result<std::path::PathBuf> {
    let path = fs::get_config_path(root);
    if path.exists() && !force {
        return Err(WorkgateError::ConfigError(format!(
            "{} already exists; use --force to overwrite it",
            path.display()
        )));
    }
    fs::write_json(&path, &EngineConfig::default())?;
    Ok(path)
}
