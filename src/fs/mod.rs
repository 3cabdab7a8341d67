//! File system utilities for workgate
//!
//! Provides path resolution and JSON file operations.

mod json;
mod paths;

pub use json::{read_config, read_fixture, read_json, write_json};
pub use paths::{
    find_workspace_root, get_config_path, get_workgate_dir, resolve_cwd, resolve_path, WORKGATE_DIR,
};
