//! Phase gates
//!
//! A status can only be entered once a minimum phase is complete. Items with a
//! phase are compared by rank; items without one go through the legacy gate
//! record in `legacy_gates`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::schemas::{Phase, Status, TaskSnapshot, WorkItemSnapshot};

use super::phases::PhaseSequences;
use super::requirements::RequirementRegistry;
use super::validation::ValidationResult;

/// Minimum completed phase per target status
#[derive(Debug, Clone)]
pub struct PhaseGates {
    required: HashMap<Status, Phase>,
    legacy_cutover: DateTime<Utc>,
}

impl PhaseGates {
    /// Standard gates; `legacy_cutover` separates grandfathered items from new ones
    pub fn standard(legacy_cutover: DateTime<Utc>) -> Self {
        let required = HashMap::from([
            (Status::Ready, Phase::Discovery),
            (Status::Active, Phase::Plan),
            (Status::Review, Phase::Implementation),
            (Status::Done, Phase::Review),
        ]);
        PhaseGates {
            required,
            legacy_cutover,
        }
    }

    /// The phase that must be complete before entering `target`
    pub fn required_phase(&self, target: Status) -> Option<Phase> {
        self.required.get(&target).copied()
    }

    /// Validate a work item entering `target`
    pub fn validate_gates(
        &self,
        item: &WorkItemSnapshot,
        target: Status,
        sequences: &PhaseSequences,
        requirements: &RequirementRegistry,
    ) -> ValidationResult {
        let Some(required) = self.required_phase(target) else {
            return ValidationResult::success();
        };

        match item.phase {
            Some(current) => {
                compare_phase("work item", item.id, current, required, target, || {
                    requirements
                        .requirements_for(item.item_type, required)
                        .map(|r| r.criteria_summary())
                })
            }
            None => self.validate_legacy(item, target, required, sequences),
        }
    }

    #[allow(deprecated)]
    fn validate_legacy(
        &self,
        item: &WorkItemSnapshot,
        target: Status,
        required: Phase,
        sequences: &PhaseSequences,
    ) -> ValidationResult {
        super::legacy_gates::validate_legacy_gates(
            item,
            target,
            required,
            sequences.sequence(item.item_type),
            self.legacy_cutover,
        )
    }

    /// Validate a task entering `target`.
    ///
    /// Tasks carry their work item's phase; a task without one is not gated.
    pub fn validate_task_gate(&self, task: &TaskSnapshot, target: Status) -> ValidationResult {
        match (task.phase, self.required_phase(target)) {
            (Some(current), Some(required)) => {
                compare_phase("task", task.id, current, required, target, || None)
            }
            _ => ValidationResult::success(),
        }
    }
}

fn compare_phase(
    noun: &str,
    id: i64,
    current: Phase,
    required: Phase,
    target: Status,
    outstanding: impl FnOnce() -> Option<String>,
) -> ValidationResult {
    if current.rank() >= required.rank() {
        return ValidationResult::success();
    }

    let mut reason = format!(
        "cannot move {} #{} to {}: {} phase must be complete, current phase is {}",
        noun, id, target, required, current
    );
    if let Some(criteria) = outstanding() {
        reason.push_str(&format!(" (outstanding: {})", criteria));
    }
    ValidationResult::failure(reason)
}
