//! Entity snapshots - read-only views of the records the engine evaluates
//!
//! Snapshots are loaded by the persistence layer and handed to the engine as-is.
//! Metadata documents stay as raw JSON text so that a malformed document can be
//! reported as a validation failure instead of failing the load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{EntityKind, Status};
use super::types::{Phase, TaskType, WorkItemType};

/// Record identifier as assigned by the persistence layer
pub type EntityId = i64;

/// A project snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub id: EntityId,
    pub name: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProjectSnapshot {
    /// Create a new project in the `initiated` state
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        ProjectSnapshot {
            id,
            name: name.into(),
            status: Status::Initiated,
            description: None,
            created_at: Utc::now(),
        }
    }

    /// Return a new snapshot with the given status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// A work item snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItemSnapshot {
    pub id: EntityId,
    pub project_id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: WorkItemType,
    pub status: Status,

    /// Canonical phase; `None` for items that predate the phase field
    #[serde(default)]
    pub phase: Option<Phase>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Legacy free-text business justification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_context: Option<String>,

    /// Structured business justification document (JSON text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,

    /// Free-form metadata (JSON text); carries the legacy gate map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,

    /// Ownership, scope and artifact metadata (JSON text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_metadata: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl WorkItemSnapshot {
    /// Create a new draft work item with no optional fields set
    pub fn new(id: EntityId, project_id: EntityId, name: impl Into<String>, item_type: WorkItemType) -> Self {
        WorkItemSnapshot {
            id,
            project_id,
            name: name.into(),
            item_type,
            status: Status::Draft,
            phase: None,
            description: None,
            business_context: None,
            justification: None,
            metadata: None,
            quality_metadata: None,
            created_at: Utc::now(),
        }
    }

    // ===== IMMUTABLE BUILDER METHODS =====

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_phase(mut self, phase: Option<Phase>) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_business_context(mut self, context: impl Into<String>) -> Self {
        self.business_context = Some(context.into());
        self
    }

    pub fn with_justification(mut self, document: impl Into<String>) -> Self {
        self.justification = Some(document.into());
        self
    }

    pub fn with_metadata(mut self, document: impl Into<String>) -> Self {
        self.metadata = Some(document.into());
        self
    }

    pub fn with_quality_metadata(mut self, document: impl Into<String>) -> Self {
        self.quality_metadata = Some(document.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A task snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: EntityId,
    pub work_item_id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub status: Status,

    /// Phase mirrored from the parent work item
    #[serde(default)]
    pub phase: Option<Phase>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Estimated effort; must be set before time-boxing can pass
    #[serde(default)]
    pub effort_hours: Option<f64>,

    /// Type-specific quality metadata (JSON text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_metadata: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl TaskSnapshot {
    /// Create a new draft task with no optional fields set
    pub fn new(id: EntityId, work_item_id: EntityId, name: impl Into<String>, task_type: TaskType) -> Self {
        TaskSnapshot {
            id,
            work_item_id,
            name: name.into(),
            task_type,
            status: Status::Draft,
            phase: None,
            description: None,
            effort_hours: None,
            quality_metadata: None,
            created_at: Utc::now(),
        }
    }

    // ===== IMMUTABLE BUILDER METHODS =====

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_phase(mut self, phase: Option<Phase>) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_effort(mut self, hours: Option<f64>) -> Self {
        self.effort_hours = hours;
        self
    }

    pub fn with_quality_metadata(mut self, document: impl Into<String>) -> Self {
        self.quality_metadata = Some(document.into());
        self
    }
}

/// Strength of a dependency edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Blocks starting the dependent task until the target is done
    Hard,
    /// Only produces a warning
    Soft,
}

/// `task_id` depends on `depends_on_task_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub task_id: EntityId,
    pub depends_on_task_id: EntityId,
    pub kind: DependencyKind,
}

/// An impediment attached to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blocker {
    pub id: EntityId,
    pub task_id: EntityId,
    pub description: String,

    /// Set when the impediment is another task rather than something external
    #[serde(default)]
    pub blocking_task_id: Option<EntityId>,

    #[serde(default)]
    pub resolved: bool,
}

/// A piece of evidence recorded against an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub id: EntityId,
    pub entity_kind: EntityKind,
    pub entity_id: EntityId,
    pub title: String,
    #[serde(default)]
    pub source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_deserializes_with_type_key() {
        let json = r#"{
            "id": 7,
            "project_id": 1,
            "name": "Login page",
            "type": "feature",
            "status": "draft",
            "phase": "D1_DISCOVERY",
            "created_at": "2025-03-01T10:00:00Z"
        }"#;
        let item: WorkItemSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(item.item_type, WorkItemType::Feature);
        assert_eq!(item.phase, Some(Phase::Discovery));
        assert!(item.metadata.is_none());
    }

    #[test]
    fn test_task_unknown_type_is_rejected_at_load() {
        let json = r#"{
            "id": 1, "work_item_id": 1, "name": "x", "type": "wizardry",
            "status": "draft", "created_at": "2025-03-01T10:00:00Z"
        }"#;
        assert!(serde_json::from_str::<TaskSnapshot>(json).is_err());
    }

    #[test]
    fn test_builders_leave_original_untouched() {
        let task = TaskSnapshot::new(1, 1, "Write parser", TaskType::Implementation);
        let started = task.clone().with_status(Status::Active).with_effort(Some(3.0));
        assert_eq!(task.status, Status::Draft);
        assert_eq!(task.effort_hours, None);
        assert_eq!(started.status, Status::Active);
    }

    #[test]
    fn test_blocker_defaults_to_unresolved() {
        let json = r#"{"id": 1, "task_id": 2, "description": "Waiting on vendor API key"}"#;
        let blocker: Blocker = serde_json::from_str(json).unwrap();
        assert!(!blocker.resolved);
        assert!(blocker.blocking_task_id.is_none());
    }
}
