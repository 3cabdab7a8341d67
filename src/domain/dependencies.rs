//! Dependency, blocker and completion checks

use crate::schemas::{DependencyKind, EntityId, Status};

use super::queries::WorkflowQueries;
use super::validation::ValidationResult;

/// How many names a failure lists before summarising the rest
const MAX_LISTED: usize = 3;

/// Validate dependencies and blockers for a task moving `current -> target`.
///
/// - leaving `blocked` needs every blocker resolved;
/// - entering `active` needs every hard dependency done (soft ones only warn);
/// - entering `review` or `done` needs every blocker resolved.
///
/// Query failures fail the transition.
pub fn validate_dependencies(
    task_id: EntityId,
    current: Status,
    target: Status,
    queries: &dyn WorkflowQueries,
) -> ValidationResult {
    let leaving_blocked = current == Status::Blocked && target != Status::Blocked;

    if leaving_blocked || matches!(target, Status::Review | Status::Done) {
        if let Err(reason) = check_blockers(task_id, target, queries) {
            return ValidationResult::failure(reason);
        }
    }

    if target == Status::Active {
        if let Err(reason) = check_hard_dependencies(task_id, queries) {
            return ValidationResult::failure(reason);
        }
    }

    ValidationResult::success()
}

fn check_blockers(task_id: EntityId, target: Status, queries: &dyn WorkflowQueries) -> Result<(), String> {
    let blockers = queries
        .list_unresolved_blockers(task_id)
        .map_err(|e| format!("cannot verify blockers of task #{}: {}", task_id, e))?;

    let open: Vec<&str> = blockers
        .iter()
        .filter(|b| !b.resolved)
        .map(|b| b.description.as_str())
        .collect();

    if open.is_empty() {
        return Ok(());
    }
    Err(format!(
        "task #{} cannot move to {}: {} unresolved blocker{}: {}",
        task_id,
        target,
        open.len(),
        if open.len() == 1 { "" } else { "s" },
        open.join("; ")
    ))
}

fn check_hard_dependencies(task_id: EntityId, queries: &dyn WorkflowQueries) -> Result<(), String> {
    let edges = queries
        .list_dependencies(task_id)
        .map_err(|e| format!("cannot verify dependencies of task #{}: {}", task_id, e))?;

    let mut incomplete_hard = Vec::new();
    for edge in edges.iter().filter(|e| e.task_id == task_id) {
        let dependency = queries
            .get_task(edge.depends_on_task_id)
            .map_err(|e| format!("cannot load dependency #{} of task #{}: {}", edge.depends_on_task_id, task_id, e))?;

        let (label, done) = match &dependency {
            Some(dep) => (format!("'{}' ({})", dep.name, dep.status), dep.status == Status::Done),
            None => (format!("#{} (missing)", edge.depends_on_task_id), false),
        };
        if done {
            continue;
        }

        match edge.kind {
            DependencyKind::Hard => incomplete_hard.push(label),
            DependencyKind::Soft => {
                tracing::warn!(task = task_id, dependency = %label, "starting task before soft dependency is done");
            }
        }
    }

    if incomplete_hard.is_empty() {
        return Ok(());
    }
    Err(format!(
        "cannot start task #{}: {} hard {} not done: {}",
        task_id,
        incomplete_hard.len(),
        if incomplete_hard.len() == 1 { "dependency is" } else { "dependencies are" },
        summarize(&incomplete_hard)
    ))
}

/// A child record as seen by the completion rule
#[derive(Debug, Clone)]
pub struct ChildStatus {
    pub name: String,
    pub status: Status,
}

/// Validate the completion ratio of a parent's children.
///
/// Every child must be terminal and at least `threshold_percent` of them must
/// have succeeded (not merely been cancelled or archived).
pub fn validate_completion(
    parent: &str,
    parent_id: EntityId,
    target: Status,
    child_noun: &str,
    children: &[ChildStatus],
    threshold_percent: u32,
) -> ValidationResult {
    let total = children.len();
    if total == 0 {
        return ValidationResult::failure(format!(
            "{} #{} has no {}s; it cannot move to {}",
            parent, parent_id, child_noun, target
        ));
    }

    let succeeded = children.iter().filter(|c| c.status.is_terminal_success()).count();
    let ratio = format!(
        "{}/{} ({}%) {}s done, at least {}% required",
        succeeded,
        total,
        succeeded * 100 / total,
        child_noun,
        threshold_percent
    );

    let unfinished: Vec<String> = children
        .iter()
        .filter(|c| !c.status.is_terminal())
        .map(|c| format!("'{}' ({})", c.name, c.status))
        .collect();
    if !unfinished.is_empty() {
        return ValidationResult::failure(format!(
            "cannot move {} #{} to {}: {} of {} {}s not finished: {}; {}",
            parent,
            parent_id,
            target,
            unfinished.len(),
            total,
            child_noun,
            summarize(&unfinished),
            ratio
        ));
    }

    if (succeeded as u64) * 100 < u64::from(threshold_percent) * total as u64 {
        return ValidationResult::failure(format!(
            "cannot move {} #{} to {}: only {}",
            parent, parent_id, target, ratio
        ));
    }

    ValidationResult::success()
}

fn summarize(labels: &[String]) -> String {
    let listed = labels
        .iter()
        .take(MAX_LISTED)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if labels.len() > MAX_LISTED {
        format!("{} and {} more", listed, labels.len() - MAX_LISTED)
    } else {
        listed
    }
}
