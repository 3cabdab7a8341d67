//! Path resolution utilities for workgate
//!
//! Locates the workspace (the nearest directory holding `.workgate`) and
//! builds paths to the files inside it.

use std::path::{Path, PathBuf};

use crate::errors::{Result, WorkgateError};

/// Name of the workspace directory
pub const WORKGATE_DIR: &str = ".workgate";

/// Find the nearest ancestor of `start_cwd` (inclusive) containing `.workgate`.
///
/// # Errors
/// * `WorkspaceNotFound` - If the path cannot be resolved or no ancestor has `.workgate`
pub fn find_workspace_root(start_cwd: &Path) -> Result<PathBuf> {
    let mut current = start_cwd
        .canonicalize()
        .map_err(|e| WorkgateError::WorkspaceNotFound(format!("Cannot resolve path: {}", e)))?;

    loop {
        if current.join(WORKGATE_DIR).is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(WorkgateError::WorkspaceNotFound(format!(
                    "Could not find a {} directory above {}",
                    WORKGATE_DIR,
                    start_cwd.display()
                )));
            }
        }
    }
}

/// Resolve the current working directory, optionally using an override.
pub fn resolve_cwd(cwd_option: Option<&Path>) -> PathBuf {
    match cwd_option {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Resolve `path` against `cwd` unless it is already absolute.
pub fn resolve_path(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Get the path to the .workgate directory.
pub fn get_workgate_dir(root: &Path) -> PathBuf {
    root.join(WORKGATE_DIR)
}

/// Get the path to the config.json file.
pub fn get_config_path(root: &Path) -> PathBuf {
    get_workgate_dir(root).join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_workspace() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(WORKGATE_DIR)).unwrap();
        temp
    }

    #[test]
    fn test_find_workspace_root_from_root() {
        let temp = setup_workspace();
        let root = find_workspace_root(temp.path()).unwrap();
        assert_eq!(root, temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_find_workspace_root_from_subdir() {
        let temp = setup_workspace();
        let subdir = temp.path().join("services").join("billing");
        std::fs::create_dir_all(&subdir).unwrap();

        let root = find_workspace_root(&subdir).unwrap();
        assert_eq!(root, temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_workgate_file_is_not_a_workspace() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(WORKGATE_DIR), "").unwrap();

        let result = find_workspace_root(temp.path());
        assert!(matches!(result, Err(WorkgateError::WorkspaceNotFound(_))));
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = find_workspace_root(&temp.path().join("does-not-exist"));
        assert!(result.unwrap_err().to_string().contains("Cannot resolve path"));
    }

    #[test]
    fn test_get_config_path() {
        let root = PathBuf::from("/repo");
        assert_eq!(get_workgate_dir(&root), PathBuf::from("/repo/.workgate"));
        assert_eq!(get_config_path(&root), PathBuf::from("/repo/.workgate/config.json"));
    }

    #[test]
    fn test_resolve_path() {
        let cwd = PathBuf::from("/work");
        assert_eq!(resolve_path(&cwd, Path::new("fixture.json")), PathBuf::from("/work/fixture.json"));
        assert_eq!(resolve_path(&cwd, Path::new("/tmp/f.json")), PathBuf::from("/tmp/f.json"));
    }

    #[test]
    fn test_resolve_cwd_with_override() {
        let path = PathBuf::from("/custom/path");
        assert_eq!(resolve_cwd(Some(&path)), path);
    }

    #[test]
    fn test_resolve_cwd_without_override() {
        assert!(!resolve_cwd(None).as_os_str().is_empty());
    }
}
