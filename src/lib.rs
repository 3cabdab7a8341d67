//! Workgate - a workflow validation engine
//!
//! Decides whether a proposed status or phase change of a project, work item
//! or task is allowed, and explains why not when it isn't. This library
//! provides:
//! - Schema definitions for snapshots, statuses, phases and configuration
//! - The validation engine and the checks it composes
//! - The query trait the engine reads related records through
//! - An in-memory store loaded from JSON fixtures
//! - File system helpers and the CLI

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fs;
pub mod schemas;
pub mod store;

// Re-export commonly used types
pub use domain::{TransitionRequest, ValidationEngine, ValidationResult, WorkflowQueries};
pub use errors::{Result, WorkgateError};
pub use schemas::{EngineConfig, EntityKind, Status};
