//! Error types for workgate
//!
//! These cover the I/O surface around the engine (config, fixtures, collaborator
//! queries). A rejected transition is never an error: it is a
//! [`ValidationResult`](crate::domain::ValidationResult) with `valid == false`.

use thiserror::Error;

/// Result type alias for workgate operations
pub type Result<T> = std::result::Result<T, WorkgateError>;

/// Main error type for all workgate operations
#[derive(Debug, Error)]
pub enum WorkgateError {
    /// Workspace not found - no .workgate directory above the start path
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    /// Invalid JSON format
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Fixture references a record that does not exist
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// A collaborator query failed
    #[error("Query failed: {0}")]
    Query(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error with context
    #[error("{context}: {message}")]
    Wrapped { context: String, message: String },
}

impl WorkgateError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            WorkgateError::WorkspaceNotFound(_) => "WORKSPACE_NOT_FOUND",
            WorkgateError::InvalidJson(_) => "INVALID_JSON",
            WorkgateError::FileNotFound(_) => "FILE_NOT_FOUND",
            WorkgateError::ConfigError(_) => "CONFIG_ERROR",
            WorkgateError::RecordNotFound(_) => "RECORD_NOT_FOUND",
            WorkgateError::Query(_) => "QUERY_FAILED",
            WorkgateError::Io(_) => "IO_ERROR",
            WorkgateError::Wrapped { .. } => "WRAPPED_ERROR",
        }
    }

    /// Wrap an error with additional context
    pub fn wrap<E: std::fmt::Display>(error: E, context: impl Into<String>) -> Self {
        WorkgateError::Wrapped {
            context: context.into(),
            message: error.to_string(),
        }
    }
}

/// Exit code used when a transition was evaluated and rejected.
pub const EXIT_REJECTED: i32 = 2;

/// Convert an error to an appropriate exit code
pub fn to_exit_code(_error: &WorkgateError) -> i32 {
    1
}
