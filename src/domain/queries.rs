//! Narrow read interface the engine uses to look at related records
//!
//! Implementations are snapshot reads supplied by the persistence layer. The
//! engine never writes through this trait.

use serde_json::Value;

use crate::errors::Result;
use crate::schemas::{
    Blocker, DependencyEdge, EntityId, EntityKind, EvidenceRecord, TaskSnapshot, TaskType,
    WorkItemSnapshot,
};

use super::rules::ProjectRule;

/// Record queries consumed by the validation engine
pub trait WorkflowQueries {
    /// Child tasks of a work item
    fn list_child_tasks(&self, work_item_id: EntityId) -> Result<Vec<TaskSnapshot>>;

    /// A single task, if it exists
    fn get_task(&self, task_id: EntityId) -> Result<Option<TaskSnapshot>>;

    /// Hard and soft edges where `task_id` is the dependent task
    fn list_dependencies(&self, task_id: EntityId) -> Result<Vec<DependencyEdge>>;

    /// Blockers on a task that are not resolved
    fn list_unresolved_blockers(&self, task_id: EntityId) -> Result<Vec<Blocker>>;

    /// Evidence recorded against an entity
    fn list_evidence(&self, kind: EntityKind, entity_id: EntityId) -> Result<Vec<EvidenceRecord>>;

    /// Work items of a project
    fn list_project_work_items(&self, project_id: EntityId) -> Result<Vec<WorkItemSnapshot>>;

    /// Context confidence score in `0.0..=1.0`; `None` when no score exists
    fn evaluate_context_confidence(&self, _task_id: EntityId) -> Result<Option<f64>> {
        Ok(None)
    }

    /// Measured test coverage percentage for a task
    fn measure_coverage(&self, _task_id: EntityId) -> Result<Option<f64>> {
        Ok(None)
    }

    /// Per-project override of a rule field for a task type
    fn lookup_rule_override(&self, _task_type: TaskType, _field: &str) -> Option<Value> {
        None
    }

    /// Enforcement rules configured for an entity kind
    fn list_rules(&self, _kind: EntityKind) -> Result<Vec<ProjectRule>> {
        Ok(Vec::new())
    }
}
