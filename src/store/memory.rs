//! In-memory snapshot store backed by a fixture

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::domain::{ProjectRule, WorkflowQueries};
use crate::errors::{Result, WorkgateError};
use crate::fs;
use crate::schemas::{
    Blocker, DependencyEdge, EntityId, EntityKind, EvidenceRecord, Fixture, ProjectSnapshot,
    TaskSnapshot, TaskType, WorkItemSnapshot,
};

/// Read-only store answering engine queries from a loaded fixture
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    fixture: Fixture,
    overrides: HashMap<(TaskType, String), Value>,
}

impl MemoryStore {
    pub fn from_fixture(fixture: Fixture) -> Self {
        let overrides = fixture
            .rule_overrides
            .iter()
            .map(|o| ((o.task_type, o.field.clone()), o.value.clone()))
            .collect();
        MemoryStore { fixture, overrides }
    }

    /// Load a fixture file
    pub fn load(path: &Path) -> Result<Self> {
        let fixture = fs::read_fixture(path)?;
        tracing::debug!(
            path = %path.display(),
            projects = fixture.projects.len(),
            work_items = fixture.work_items.len(),
            tasks = fixture.tasks.len(),
            "loaded fixture"
        );
        Ok(Self::from_fixture(fixture))
    }

    pub fn project(&self, id: EntityId) -> Result<&ProjectSnapshot> {
        self.fixture
            .projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| WorkgateError::RecordNotFound(format!("project #{}", id)))
    }

    pub fn work_item(&self, id: EntityId) -> Result<&WorkItemSnapshot> {
        self.fixture
            .work_items
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| WorkgateError::RecordNotFound(format!("work item #{}", id)))
    }

    pub fn task(&self, id: EntityId) -> Result<&TaskSnapshot> {
        self.fixture
            .tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| WorkgateError::RecordNotFound(format!("task #{}", id)))
    }
}

impl WorkflowQueries for MemoryStore {
    fn list_child_tasks(&self, work_item_id: EntityId) -> Result<Vec<TaskSnapshot>> {
        Ok(self
            .fixture
            .tasks
            .iter()
            .filter(|t| t.work_item_id == work_item_id)
            .cloned()
            .collect())
    }

    fn get_task(&self, task_id: EntityId) -> Result<Option<TaskSnapshot>> {
        Ok(self.fixture.tasks.iter().find(|t| t.id == task_id).cloned())
    }

    fn list_dependencies(&self, task_id: EntityId) -> Result<Vec<DependencyEdge>> {
        Ok(self
            .fixture
            .dependencies
            .iter()
            .filter(|d| d.task_id == task_id)
            .cloned()
            .collect())
    }

    fn list_unresolved_blockers(&self, task_id: EntityId) -> Result<Vec<Blocker>> {
        Ok(self
            .fixture
            .blockers
            .iter()
            .filter(|b| b.task_id == task_id && !b.resolved)
            .cloned()
            .collect())
    }

    fn list_evidence(&self, kind: EntityKind, entity_id: EntityId) -> Result<Vec<EvidenceRecord>> {
        Ok(self
            .fixture
            .evidence
            .iter()
            .filter(|e| e.entity_kind == kind && e.entity_id == entity_id)
            .cloned()
            .collect())
    }

    fn list_project_work_items(&self, project_id: EntityId) -> Result<Vec<WorkItemSnapshot>> {
        Ok(self
            .fixture
            .work_items
            .iter()
            .filter(|w| w.project_id == project_id)
            .cloned()
            .collect())
    }

    fn evaluate_context_confidence(&self, task_id: EntityId) -> Result<Option<f64>> {
        Ok(self.fixture.context_confidence.get(&task_id).copied())
    }

    fn measure_coverage(&self, task_id: EntityId) -> Result<Option<f64>> {
        Ok(self.fixture.coverage.get(&task_id).copied())
    }

    fn lookup_rule_override(&self, task_type: TaskType, field: &str) -> Option<Value> {
        self.overrides.get(&(task_type, field.to_string())).cloned()
    }

    fn list_rules(&self, kind: EntityKind) -> Result<Vec<ProjectRule>> {
        Ok(self
            .fixture
            .rules
            .iter()
            .filter(|r| r.applies_to == kind)
            .cloned()
            .collect())
    }
}
