//! The validation engine
//!
//! Composes every check in a fixed order; the first failure wins. The engine is
//! built once from an [`EngineConfig`] and holds only immutable tables, so a
//! single instance can be shared across threads.

use crate::schemas::{
    as_number, EngineConfig, EntityId, EntityKind, Metadata, Phase, ProjectSnapshot, Status,
    TaskSnapshot, TaskType, WorkItemSnapshot, WorkItemType,
};

use super::composition::CompositionRules;
use super::dependencies::{validate_completion, validate_dependencies, ChildStatus};
use super::documentation::{validate_task_documentation, validate_work_item_documentation};
use super::gates::PhaseGates;
use super::justification::validate_justification;
use super::phases::PhaseSequences;
use super::quality::{QualitySchedule, TimeBoxLimits};
use super::queries::WorkflowQueries;
use super::requirements::RequirementRegistry;
use super::rules::{validate_rules, RuleSubject};
use super::transitions::TransitionTable;
use super::validation::{validate_transition, TransitionRequest, ValidationResult};

/// Rule override field consulted for per-project time-box limits
pub const MAX_EFFORT_OVERRIDE: &str = "max_effort_hours";

/// An entity of any kind, for callers that dispatch on kind at runtime
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Project(&'a ProjectSnapshot),
    WorkItem(&'a WorkItemSnapshot),
    Task(&'a TaskSnapshot),
}

impl EntityRef<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Project(_) => EntityKind::Project,
            EntityRef::WorkItem(_) => EntityKind::WorkItem,
            EntityRef::Task(_) => EntityKind::Task,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            EntityRef::Project(p) => p.id,
            EntityRef::WorkItem(w) => w.id,
            EntityRef::Task(t) => t.id,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            EntityRef::Project(p) => p.status,
            EntityRef::WorkItem(w) => w.status,
            EntityRef::Task(t) => t.status,
        }
    }
}

type Check = std::result::Result<(), String>;

/// Workflow validation engine
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    config: EngineConfig,
    transitions: TransitionTable,
    sequences: PhaseSequences,
    requirements: RequirementRegistry,
    gates: PhaseGates,
    time_boxes: TimeBoxLimits,
    quality: QualitySchedule,
    composition: CompositionRules,
}

impl ValidationEngine {
    pub fn new(config: EngineConfig) -> Self {
        ValidationEngine {
            transitions: TransitionTable::standard(),
            sequences: PhaseSequences::standard(),
            requirements: RequirementRegistry::standard(),
            gates: PhaseGates::standard(config.legacy_gate_cutover),
            time_boxes: TimeBoxLimits::new(&config.time_box_hours),
            quality: QualitySchedule::standard(config.min_test_coverage),
            composition: CompositionRules::standard(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn sequences(&self) -> &PhaseSequences {
        &self.sequences
    }

    pub fn requirements(&self) -> &RequirementRegistry {
        &self.requirements
    }

    /// The phase a work item may move into next, if any
    pub fn next_allowed_phase(&self, item: &WorkItemSnapshot) -> Option<Phase> {
        self.sequences.next_allowed_phase(item)
    }

    /// Validate a phase change of a work item
    pub fn validate_phase_progression(
        &self,
        item_type: WorkItemType,
        current: Option<Phase>,
        target: Phase,
    ) -> ValidationResult {
        self.sequences.validate_progression(item_type, current, target)
    }

    /// Validate a status change of any entity
    pub fn validate_entity_transition(
        &self,
        entity: EntityRef<'_>,
        request: impl Into<TransitionRequest>,
        queries: &dyn WorkflowQueries,
    ) -> ValidationResult {
        match entity {
            EntityRef::Project(project) => self.validate_project_transition(project, request, queries),
            EntityRef::WorkItem(item) => self.validate_work_item_transition(item, request, queries),
            EntityRef::Task(task) => self.validate_task_transition(task, request, queries),
        }
    }

    /// Validate a status change of a work item
    pub fn validate_work_item_transition(
        &self,
        item: &WorkItemSnapshot,
        request: impl Into<TransitionRequest>,
        queries: &dyn WorkflowQueries,
    ) -> ValidationResult {
        let request = request.into();
        let result: ValidationResult = self.check_work_item(item, &request, queries).into();
        log_decision(EntityKind::WorkItem, item.id, item.status, request.target, &result);
        result
    }

    /// Validate a status change of a task
    pub fn validate_task_transition(
        &self,
        task: &TaskSnapshot,
        request: impl Into<TransitionRequest>,
        queries: &dyn WorkflowQueries,
    ) -> ValidationResult {
        let request = request.into();
        let result: ValidationResult = self.check_task(task, &request, queries).into();
        log_decision(EntityKind::Task, task.id, task.status, request.target, &result);
        result
    }

    /// Validate a status change of a project
    pub fn validate_project_transition(
        &self,
        project: &ProjectSnapshot,
        request: impl Into<TransitionRequest>,
        queries: &dyn WorkflowQueries,
    ) -> ValidationResult {
        let request = request.into();
        let result: ValidationResult = self.check_project(project, &request, queries).into();
        log_decision(EntityKind::Project, project.id, project.status, request.target, &result);
        result
    }

    fn check_work_item(
        &self,
        item: &WorkItemSnapshot,
        request: &TransitionRequest,
        queries: &dyn WorkflowQueries,
    ) -> Check {
        let target = request.target;
        validate_transition(&self.transitions, EntityKind::WorkItem, item.status, request).into_result()?;

        if item.item_type == WorkItemType::Unknown {
            return Err(format!(
                "work item #{} has an unrecognised type; no workflow rules apply to it",
                item.id
            ));
        }

        if target == Status::Ready {
            validate_justification(item).into_result()?;
        }

        self.gates
            .validate_gates(item, target, &self.sequences, &self.requirements)
            .into_result()?;

        if target == Status::Ready && item.item_type == WorkItemType::Research {
            let evidence = queries
                .list_evidence(EntityKind::WorkItem, item.id)
                .map_err(|e| format!("cannot verify evidence of work item #{}: {}", item.id, e))?;
            if evidence.is_empty() {
                return Err(format!(
                    "research work item #{} needs at least one evidence record before it can be ready",
                    item.id
                ));
            }
        }

        if target == Status::Ready {
            validate_work_item_documentation(item, self.config.min_description_length).into_result()?;

            let tasks = child_tasks(item.id, queries)?;
            self.composition.validate_composition(item, &tasks).into_result()?;
        }

        if matches!(target, Status::Review | Status::Done) {
            let tasks = child_tasks(item.id, queries)?;
            let children: Vec<ChildStatus> = tasks
                .into_iter()
                .map(|t| ChildStatus {
                    name: t.name,
                    status: t.status,
                })
                .collect();
            validate_completion(
                "work item",
                item.id,
                target,
                "task",
                &children,
                self.config.completion_threshold_percent,
            )
            .into_result()?;
        }

        self.check_rules(EntityKind::WorkItem, &RuleSubject::for_work_item(item, target), queries)
    }

    fn check_task(&self, task: &TaskSnapshot, request: &TransitionRequest, queries: &dyn WorkflowQueries) -> Check {
        let target = request.target;
        validate_transition(&self.transitions, EntityKind::Task, task.status, request).into_result()?;

        if task.task_type == TaskType::Unknown {
            return Err(format!(
                "task #{} has an unrecognised type; no workflow rules apply to it",
                task.id
            ));
        }

        self.gates.validate_task_gate(task, target).into_result()?;

        if target == Status::Ready {
            validate_task_documentation(task, self.config.min_description_length).into_result()?;
        }

        validate_dependencies(task.id, task.status, target, queries).into_result()?;

        if matches!(target, Status::Ready | Status::Active) {
            let project_limit = match queries.lookup_rule_override(task.task_type, MAX_EFFORT_OVERRIDE) {
                Some(value) => Some(as_number(&value).ok_or_else(|| {
                    format!(
                        "project {} override for {} tasks is not a number: {}",
                        MAX_EFFORT_OVERRIDE, task.task_type, value
                    )
                })?),
                None => None,
            };
            self.time_boxes
                .validate_time_box(task.task_type, task.effort_hours, project_limit)
                .into_result()?;
        }

        if matches!(target, Status::Ready | Status::Active | Status::Review) {
            let metadata = Metadata::parse(task.quality_metadata.as_deref())
                .map_err(|e| format!("quality metadata of task #{} is malformed: {}", task.id, e))?;
            self.quality
                .validate_quality_metadata(task.task_type, &metadata, target, &|| {
                    queries.measure_coverage(task.id)
                })
                .into_result()?;
        }

        if target == Status::Active {
            self.check_context_confidence(task.id, queries)?;
        }

        self.check_rules(EntityKind::Task, &RuleSubject::for_task(task, target), queries)
    }

    fn check_project(
        &self,
        project: &ProjectSnapshot,
        request: &TransitionRequest,
        queries: &dyn WorkflowQueries,
    ) -> Check {
        let target = request.target;
        validate_transition(&self.transitions, EntityKind::Project, project.status, request).into_result()?;

        if target == Status::Completed {
            let items = queries
                .list_project_work_items(project.id)
                .map_err(|e| format!("cannot list work items of project #{}: {}", project.id, e))?;
            let children: Vec<ChildStatus> = items
                .into_iter()
                .map(|w| ChildStatus {
                    name: w.name,
                    status: w.status,
                })
                .collect();
            validate_completion(
                "project",
                project.id,
                target,
                "work item",
                &children,
                self.config.completion_threshold_percent,
            )
            .into_result()?;
        }

        self.check_rules(EntityKind::Project, &RuleSubject::for_project(project, target), queries)
    }

    /// Advisory: an unavailable score skips the check
    fn check_context_confidence(&self, task_id: EntityId, queries: &dyn WorkflowQueries) -> Check {
        let threshold = self.config.context_confidence_threshold;
        match queries.evaluate_context_confidence(task_id) {
            Ok(Some(score)) if score < threshold => Err(format!(
                "context confidence for task #{} is {:.2}, at least {:.2} is required to start",
                task_id, score, threshold
            )),
            Ok(Some(_)) => Ok(()),
            Ok(None) => {
                tracing::debug!(task = task_id, "no context confidence score; skipping check");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(task = task_id, error = %e, "context confidence unavailable; skipping check");
                Ok(())
            }
        }
    }

    fn check_rules(&self, kind: EntityKind, subject: &RuleSubject, queries: &dyn WorkflowQueries) -> Check {
        let rules = queries
            .list_rules(kind)
            .map_err(|e| format!("cannot load {} rules: {}", kind, e))?;
        validate_rules(&rules, kind, subject).into_result()
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        ValidationEngine::new(EngineConfig::default())
    }
}

fn child_tasks(work_item_id: EntityId, queries: &dyn WorkflowQueries) -> std::result::Result<Vec<TaskSnapshot>, String> {
    queries
        .list_child_tasks(work_item_id)
        .map_err(|e| format!("cannot list tasks of work item #{}: {}", work_item_id, e))
}

fn log_decision(kind: EntityKind, id: EntityId, from: Status, to: Status, result: &ValidationResult) {
    match &result.reason {
        None => tracing::debug!(%kind, id, %from, %to, "transition allowed"),
        Some(reason) => tracing::debug!(%kind, id, %from, %to, %reason, "transition rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Result, WorkgateError};
    use crate::schemas::{Blocker, DependencyEdge, DependencyKind, EvidenceRecord, Fixture};
    use crate::store::MemoryStore;
    use crate::domain::rules::ProjectRule;

    const DESCRIPTION: &str = "Add a CSV export button to the report page that streams rows for large datasets";
    const ITEM_METADATA: &str = r#"{"ownership": "reports", "scope": "report page",
        "artifacts": {"code_paths": ["src/reports/export.rs"]}}"#;
    const JUSTIFICATION: &str = r#"{"problem": "No export", "desired_outcome": "CSV export",
        "business_impact": "Fewer tickets", "target_metrics": ["tickets -20%"]}"#;

    fn ready_feature() -> WorkItemSnapshot {
        WorkItemSnapshot::new(1, 1, "Export", WorkItemType::Feature)
            .with_phase(Some(Phase::Discovery))
            .with_description(DESCRIPTION)
            .with_justification(JUSTIFICATION)
            .with_quality_metadata(ITEM_METADATA)
    }

    fn feature_tasks(statuses: &[Status]) -> Vec<TaskSnapshot> {
        let types = [
            TaskType::Design,
            TaskType::Implementation,
            TaskType::Testing,
            TaskType::Documentation,
            TaskType::Review,
        ];
        statuses
            .iter()
            .zip(types.iter().cycle())
            .enumerate()
            .map(|(i, (status, t))| {
                TaskSnapshot::new(i as i64 + 1, 1, format!("Task {}", i + 1), *t).with_status(*status)
            })
            .collect()
    }

    fn store(tasks: Vec<TaskSnapshot>) -> MemoryStore {
        MemoryStore::from_fixture(Fixture {
            tasks,
            ..Default::default()
        })
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValidationEngine>();
    }

    #[test]
    fn test_work_item_ready_happy_path() {
        let engine = ValidationEngine::default();
        let tasks = feature_tasks(&[Status::Draft; 4]);
        let result = engine.validate_work_item_transition(&ready_feature(), Status::Ready, &store(tasks));
        assert!(result.valid, "{:?}", result.reason);
    }

    #[test]
    fn test_state_machine_runs_first() {
        let engine = ValidationEngine::default();
        let item = ready_feature().with_justification("{broken");
        let result = engine.validate_work_item_transition(&item, Status::Done, &store(vec![]));
        assert!(result.reason.unwrap().contains("cannot skip"));
    }

    #[test]
    fn test_justification_before_gate() {
        let engine = ValidationEngine::default();
        let item = WorkItemSnapshot::new(1, 1, "Export", WorkItemType::Feature);
        let reason = engine
            .validate_work_item_transition(&item, Status::Ready, &store(vec![]))
            .reason
            .unwrap();
        assert!(reason.contains("business justification"));
    }

    #[test]
    fn test_gate_before_documentation() {
        let engine = ValidationEngine::default();
        let item = ready_feature().with_status(Status::Ready).with_description("short");
        let reason = engine
            .validate_work_item_transition(&item, Status::Active, &store(vec![]))
            .reason
            .unwrap();
        assert!(reason.contains("plan phase must be complete"));
    }

    #[test]
    fn test_research_needs_evidence() {
        let engine = ValidationEngine::default();
        let item = WorkItemSnapshot::new(7, 1, "Spike", WorkItemType::Research)
            .with_phase(Some(Phase::Discovery))
            .with_description(DESCRIPTION)
            .with_justification(JUSTIFICATION)
            .with_quality_metadata(r#"{"ownership": "a", "scope": "b", "artifacts": {"notes": "c"}}"#);
        let tasks = vec![
            TaskSnapshot::new(1, 7, "Investigate", TaskType::Research),
            TaskSnapshot::new(2, 7, "Write up", TaskType::Documentation),
        ];

        let without = MemoryStore::from_fixture(Fixture {
            tasks: tasks.clone(),
            ..Default::default()
        });
        let reason = engine
            .validate_work_item_transition(&item, Status::Ready, &without)
            .reason
            .unwrap();
        assert!(reason.contains("evidence"));

        let with = MemoryStore::from_fixture(Fixture {
            tasks,
            evidence: vec![EvidenceRecord {
                id: 1,
                entity_kind: EntityKind::WorkItem,
                entity_id: 7,
                title: "Benchmark results".into(),
                source: None,
            }],
            ..Default::default()
        });
        let result = engine.validate_work_item_transition(&item, Status::Ready, &with);
        assert!(result.valid, "{:?}", result.reason);
    }

    #[test]
    fn test_composition_checked_on_ready() {
        let engine = ValidationEngine::default();
        let tasks = feature_tasks(&[Status::Draft; 2]);
        let reason = engine
            .validate_work_item_transition(&ready_feature(), Status::Ready, &store(tasks))
            .reason
            .unwrap();
        assert!(reason.contains("missing: testing, documentation"));
    }

    #[test]
    fn test_completion_threshold_scenarios() {
        use Status::*;
        let engine = ValidationEngine::default();
        let item = ready_feature().with_status(Review).with_phase(Some(Phase::Review));

        let pass = engine.validate_work_item_transition(&item, Done, &store(feature_tasks(&[Done, Done, Done, Done, Cancelled])));
        assert!(pass.valid, "{:?}", pass.reason);

        let unfinished = engine
            .validate_work_item_transition(&item, Done, &store(feature_tasks(&[Done, Done, Done, Done, Active])))
            .reason
            .unwrap();
        assert!(unfinished.contains("4/5 (80%)"));

        let sixty = engine
            .validate_work_item_transition(&item, Done, &store(feature_tasks(&[Done, Done, Done, Cancelled, Cancelled])))
            .reason
            .unwrap();
        assert!(sixty.contains("3/5 (60%)"));
    }

    #[test]
    fn test_rework_requires_justification() {
        let engine = ValidationEngine::default();
        let item = ready_feature().with_status(Status::Review).with_phase(Some(Phase::Implementation));
        let tasks = store(feature_tasks(&[Status::Active; 4]));

        let reason = engine
            .validate_work_item_transition(&item, Status::Active, &tasks)
            .reason
            .unwrap();
        assert!(reason.contains("justification"));

        let request = TransitionRequest::to(Status::Active).with_justification("review found a data race");
        assert!(engine.validate_work_item_transition(&item, request, &tasks).valid);
    }

    fn ready_task() -> TaskSnapshot {
        TaskSnapshot::new(10, 1, "Build exporter", TaskType::Implementation)
            .with_status(Status::Ready)
            .with_description(DESCRIPTION)
            .with_effort(Some(3.0))
            .with_quality_metadata(r#"{"acceptance_criteria": [{"name": "streams rows"}]}"#)
    }

    #[test]
    fn test_task_start_happy_path() {
        let engine = ValidationEngine::default();
        let result = engine.validate_task_transition(&ready_task(), Status::Active, &store(vec![ready_task()]));
        assert!(result.valid, "{:?}", result.reason);
    }

    #[test]
    fn test_task_time_box_and_override() {
        let engine = ValidationEngine::default();
        let task = ready_task().with_effort(Some(5.0));

        let reason = engine
            .validate_task_transition(&task, Status::Active, &store(vec![]))
            .reason
            .unwrap();
        assert!(reason.contains("exceeds the 4h time-box"));

        let overridden = MemoryStore::from_fixture(Fixture {
            rule_overrides: vec![crate::schemas::RuleOverride {
                task_type: TaskType::Implementation,
                field: MAX_EFFORT_OVERRIDE.into(),
                value: serde_json::json!(6),
            }],
            ..Default::default()
        });
        assert!(engine.validate_task_transition(&task, Status::Active, &overridden).valid);
    }

    #[test]
    fn test_task_dependencies_before_time_box() {
        let engine = ValidationEngine::default();
        let task = ready_task().with_effort(None);
        let queries = MemoryStore::from_fixture(Fixture {
            tasks: vec![TaskSnapshot::new(11, 1, "Schema", TaskType::Design).with_status(Status::Active)],
            dependencies: vec![DependencyEdge {
                task_id: 10,
                depends_on_task_id: 11,
                kind: DependencyKind::Hard,
            }],
            ..Default::default()
        });
        let reason = engine
            .validate_task_transition(&task, Status::Active, &queries)
            .reason
            .unwrap();
        assert!(reason.contains("hard dependency"));
    }

    #[test]
    fn test_task_starts_once_hard_dependency_done() {
        let engine = ValidationEngine::default();
        let queries = MemoryStore::from_fixture(Fixture {
            tasks: vec![TaskSnapshot::new(11, 1, "Schema", TaskType::Design).with_status(Status::Done)],
            dependencies: vec![DependencyEdge {
                task_id: 10,
                depends_on_task_id: 11,
                kind: DependencyKind::Hard,
            }],
            ..Default::default()
        });
        let result = engine.validate_task_transition(&ready_task(), Status::Active, &queries);
        assert!(result.valid, "{:?}", result.reason);
    }

    #[test]
    fn test_non_numeric_time_box_override_denies() {
        let engine = ValidationEngine::default();
        let task = TaskSnapshot::new(20, 1, "Rename flag", TaskType::Simple)
            .with_status(Status::Ready)
            .with_effort(Some(0.25));
        let queries = MemoryStore::from_fixture(Fixture {
            rule_overrides: vec![crate::schemas::RuleOverride {
                task_type: TaskType::Simple,
                field: MAX_EFFORT_OVERRIDE.into(),
                value: serde_json::json!("half an hour"),
            }],
            ..Default::default()
        });
        let reason = engine
            .validate_task_transition(&task, Status::Active, &queries)
            .reason
            .unwrap();
        assert!(reason.contains("not a number"));
        assert!(reason.contains("half an hour"));
    }

    #[test]
    fn test_unrecognised_types_are_denied() {
        let engine = ValidationEngine::default();
        let task = ready_task();
        let epic = TaskSnapshot {
            task_type: TaskType::Unknown,
            ..task.clone()
        };
        let reason = engine
            .validate_task_transition(&epic, Status::Active, &store(vec![]))
            .reason
            .unwrap();
        assert!(reason.contains("unrecognised type"));
        assert!(engine.validate_task_transition(&task, Status::Active, &store(vec![])).valid);

        let item = WorkItemSnapshot::new(5, 1, "Initiative", WorkItemType::Unknown);
        let reason = engine
            .validate_work_item_transition(&item, Status::Ready, &store(vec![]))
            .reason
            .unwrap();
        assert!(reason.contains("work item #5 has an unrecognised type"));
    }

    #[test]
    fn test_rework_limited_to_entity_kind() {
        let engine = ValidationEngine::default();
        let queries = store(vec![]);

        let project = ProjectSnapshot::new(1, "Reports").with_status(Status::Active);
        let request = TransitionRequest::to(Status::Ready).with_justification("rescope");
        assert!(!engine.validate_project_transition(&project, request, &queries).valid);

        let parked = ready_task().with_status(Status::OnHold);
        let request = TransitionRequest::to(Status::Initiated).with_justification("x");
        assert!(!engine.validate_task_transition(&parked, request, &queries).valid);

        let on_hold = project.clone().with_status(Status::OnHold);
        let request = TransitionRequest::to(Status::Initiated).with_justification("rescope");
        assert!(engine.validate_project_transition(&on_hold, request, &queries).valid);
    }

    #[test]
    fn test_task_review_blocked() {
        let engine = ValidationEngine::default();
        let task = ready_task().with_status(Status::Active);
        let queries = MemoryStore::from_fixture(Fixture {
            blockers: vec![Blocker {
                id: 1,
                task_id: 10,
                description: "Staging database down".into(),
                blocking_task_id: None,
                resolved: false,
            }],
            ..Default::default()
        });
        let reason = engine
            .validate_task_transition(&task, Status::Review, &queries)
            .reason
            .unwrap();
        assert!(reason.contains("Staging database down"));
    }

    struct FailingScores;

    impl WorkflowQueries for FailingScores {
        fn list_child_tasks(&self, _: EntityId) -> Result<Vec<TaskSnapshot>> {
            Ok(Vec::new())
        }
        fn get_task(&self, _: EntityId) -> Result<Option<TaskSnapshot>> {
            Ok(None)
        }
        fn list_dependencies(&self, _: EntityId) -> Result<Vec<DependencyEdge>> {
            Ok(Vec::new())
        }
        fn list_unresolved_blockers(&self, _: EntityId) -> Result<Vec<Blocker>> {
            Ok(Vec::new())
        }
        fn list_evidence(&self, _: EntityKind, _: EntityId) -> Result<Vec<EvidenceRecord>> {
            Ok(Vec::new())
        }
        fn list_project_work_items(&self, _: EntityId) -> Result<Vec<WorkItemSnapshot>> {
            Err(WorkgateError::Query("store offline".into()))
        }
        fn evaluate_context_confidence(&self, _: EntityId) -> Result<Option<f64>> {
            Err(WorkgateError::Query("scorer offline".into()))
        }
        fn list_rules(&self, _: EntityKind) -> Result<Vec<ProjectRule>> {
            Err(WorkgateError::Query("rules offline".into()))
        }
    }

    #[test]
    fn test_collaborator_failure_policy() {
        let engine = ValidationEngine::default();

        // confidence errors are skipped, the rules listing error is not
        let reason = engine
            .validate_task_transition(&ready_task(), Status::Active, &FailingScores)
            .reason
            .unwrap();
        assert!(reason.contains("rules offline"));

        let project = ProjectSnapshot::new(1, "Reports").with_status(Status::Active);
        let reason = engine
            .validate_project_transition(&project, Status::Completed, &FailingScores)
            .reason
            .unwrap();
        assert!(reason.contains("store offline"));
    }

    #[test]
    fn test_low_context_confidence_blocks_start() {
        let engine = ValidationEngine::default();
        let queries = MemoryStore::from_fixture(Fixture {
            context_confidence: [(10, 0.4)].into_iter().collect(),
            ..Default::default()
        });
        let reason = engine
            .validate_task_transition(&ready_task(), Status::Active, &queries)
            .reason
            .unwrap();
        assert!(reason.contains("context confidence"));
    }

    #[test]
    fn test_project_completion_and_rules() {
        let engine = ValidationEngine::default();
        let project = ProjectSnapshot::new(1, "Reports").with_status(Status::Active);
        let items = vec![
            WorkItemSnapshot::new(1, 1, "Export", WorkItemType::Feature).with_status(Status::Done),
            WorkItemSnapshot::new(2, 1, "Import", WorkItemType::Feature).with_status(Status::Done),
        ];

        let queries = MemoryStore::from_fixture(Fixture {
            work_items: items.clone(),
            ..Default::default()
        });
        assert!(engine
            .validate_entity_transition(EntityRef::Project(&project), Status::Completed, &queries)
            .valid);

        let frozen = MemoryStore::from_fixture(Fixture {
            work_items: items,
            rules: vec![ProjectRule {
                id: "freeze".into(),
                applies_to: EntityKind::Project,
                condition: "target != completed".into(),
                message: "project is frozen".into(),
            }],
            ..Default::default()
        });
        let reason = engine
            .validate_entity_transition(EntityRef::Project(&project), Status::Completed, &frozen)
            .reason
            .unwrap();
        assert!(reason.contains("project is frozen"));
    }

    #[test]
    fn test_phase_passthroughs() {
        let engine = ValidationEngine::default();
        let item = WorkItemSnapshot::new(2, 1, "Crash on save", WorkItemType::Bugfix);
        assert_eq!(engine.next_allowed_phase(&item), Some(Phase::Implementation));
        assert!(engine
            .validate_phase_progression(WorkItemType::Bugfix, None, Phase::Implementation)
            .valid);
        assert!(!engine
            .validate_phase_progression(WorkItemType::Bugfix, None, Phase::Discovery)
            .valid);
    }

    #[test]
    fn test_idempotent() {
        let engine = ValidationEngine::default();
        let queries = store(feature_tasks(&[Status::Draft; 3]));
        let first = engine.validate_work_item_transition(&ready_feature(), Status::Ready, &queries);
        let second = engine.validate_work_item_transition(&ready_feature(), Status::Ready, &queries);
        assert_eq!(first, second);
    }
}
