//! Per-type phase sequences
//!
//! Each work item type walks its own ordered subset of the canonical phases:
//! a bugfix only goes implementation -> review, a feature goes through all six.

use std::collections::HashMap;

use crate::schemas::{Phase, WorkItemSnapshot, WorkItemType};

use super::validation::ValidationResult;

/// Immutable map from work item type to its ordered phase list
#[derive(Debug, Clone)]
pub struct PhaseSequences {
    sequences: HashMap<WorkItemType, Vec<Phase>>,
}

impl PhaseSequences {
    /// The standard sequence for every work item type
    pub fn standard() -> Self {
        use Phase::*;

        let sequences = HashMap::from([
            (
                WorkItemType::Feature,
                vec![Discovery, Plan, Implementation, Review, Operations, Evolution],
            ),
            (
                WorkItemType::Enhancement,
                vec![Discovery, Plan, Implementation, Review, Operations],
            ),
            (WorkItemType::Bugfix, vec![Implementation, Review]),
            (WorkItemType::Research, vec![Discovery, Plan, Review]),
            (WorkItemType::Planning, vec![Discovery, Plan]),
            (WorkItemType::Refactoring, vec![Plan, Implementation, Review]),
            (
                WorkItemType::Infrastructure,
                vec![Plan, Implementation, Review, Operations],
            ),
        ]);

        PhaseSequences { sequences }
    }

    /// Build from explicit sequences. Types left out have no phases and fail
    /// every progression check.
    pub fn from_sequences(sequences: HashMap<WorkItemType, Vec<Phase>>) -> Self {
        PhaseSequences { sequences }
    }

    /// Ordered phases for a type; empty when the type is not registered
    pub fn sequence(&self, item_type: WorkItemType) -> &[Phase] {
        self.sequences
            .get(&item_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Validate moving from `current` to `target` within the type's sequence.
    pub fn validate_progression(
        &self,
        item_type: WorkItemType,
        current: Option<Phase>,
        target: Phase,
    ) -> ValidationResult {
        let sequence = self.sequence(item_type);
        if sequence.is_empty() {
            return ValidationResult::failure(format!(
                "unknown work item type {}: no phase sequence is defined",
                item_type
            ));
        }

        let target_index = match sequence.iter().position(|&p| p == target) {
            Some(index) => index,
            None => {
                return ValidationResult::failure(format!(
                    "phase {} is not part of the {} lifecycle; allowed phases: {}",
                    target,
                    item_type,
                    join_phases(sequence)
                ));
            }
        };

        let current = match current {
            Some(phase) => phase,
            None => {
                return if target_index == 0 {
                    ValidationResult::success()
                } else {
                    ValidationResult::failure(format!(
                        "a {} with no phase must start at {}, not {}",
                        item_type, sequence[0], target
                    ))
                };
            }
        };

        let current_index = match sequence.iter().position(|&p| p == current) {
            Some(index) => index,
            None => {
                return ValidationResult::failure(format!(
                    "current phase {} is not part of the {} lifecycle; allowed phases: {}",
                    current,
                    item_type,
                    join_phases(sequence)
                ));
            }
        };

        if target_index == current_index {
            return ValidationResult::failure(format!("already in phase {}", current));
        }
        if target_index < current_index {
            return ValidationResult::failure(format!(
                "cannot go backwards from {} to {}",
                current, target
            ));
        }
        if target_index > current_index + 1 {
            let skipped = &sequence[current_index + 1..target_index];
            return ValidationResult::failure(format!(
                "cannot skip from {} to {}; complete {} first",
                current,
                target,
                join_phases(skipped)
            ));
        }

        ValidationResult::success()
    }

    /// The single legal next phase for an item, used to suggest a value.
    ///
    /// An item with no phase starts at the first phase of its sequence; an item
    /// whose phase is outside its sequence, or already last, has none.
    pub fn next_allowed_phase(&self, item: &WorkItemSnapshot) -> Option<Phase> {
        let sequence = self.sequence(item.item_type);
        match item.phase {
            None => sequence.first().copied(),
            Some(phase) => {
                let index = sequence.iter().position(|&p| p == phase)?;
                sequence.get(index + 1).copied()
            }
        }
    }
}

impl Default for PhaseSequences {
    fn default() -> Self {
        PhaseSequences::standard()
    }
}

pub(crate) fn join_phases(phases: &[Phase]) -> String {
    phases
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
