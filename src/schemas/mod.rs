//! Schema types for workgate
//!
//! Snapshots, enumerations, metadata accessors and configuration.

mod config;
mod entities;
mod fixture;
mod metadata;
mod status;
mod types;

pub use config::EngineConfig;
pub use entities::{
    Blocker, DependencyEdge, DependencyKind, EntityId, EvidenceRecord, ProjectSnapshot,
    TaskSnapshot, WorkItemSnapshot,
};
pub use fixture::{Fixture, RuleOverride};
pub use metadata::{as_number, value_has_content, Metadata};
pub use status::{EntityKind, Status};
pub use types::{Phase, TaskType, WorkItemType};
