//! Fixture schema - a JSON snapshot of every record the engine may query

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ProjectRule;

use super::entities::{
    Blocker, DependencyEdge, EntityId, EvidenceRecord, ProjectSnapshot, TaskSnapshot,
    WorkItemSnapshot,
};
use super::types::TaskType;

/// A per-project override of a rule field, e.g. a custom time-box limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOverride {
    pub task_type: TaskType,
    pub field: String,
    pub value: Value,
}

/// Records loaded into the in-memory store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub projects: Vec<ProjectSnapshot>,

    #[serde(default)]
    pub work_items: Vec<WorkItemSnapshot>,

    #[serde(default)]
    pub tasks: Vec<TaskSnapshot>,

    #[serde(default)]
    pub dependencies: Vec<DependencyEdge>,

    #[serde(default)]
    pub blockers: Vec<Blocker>,

    #[serde(default)]
    pub evidence: Vec<EvidenceRecord>,

    /// Context confidence scores by task id
    #[serde(default)]
    pub context_confidence: HashMap<EntityId, f64>,

    /// Measured coverage percentages by task id
    #[serde(default)]
    pub coverage: HashMap<EntityId, f64>,

    #[serde(default)]
    pub rule_overrides: Vec<RuleOverride>,

    #[serde(default)]
    pub rules: Vec<ProjectRule>,
}
