//! Init command - Write a default workgate configuration

use std::path::Path;

use crate::config::init_config;
use crate::errors::Result;
use crate::fs::resolve_cwd;

/// Create `.workgate/config.json` with default values
pub fn run(cwd: Option<&Path>, force: bool) -> Result<()> {
    let root = resolve_cwd(cwd);
    let path = init_config(&root, force)?;
    tracing::info!(path = %path.display(), "wrote default configuration");
    println!("Initialized {}", path.display());
    Ok(())
}
