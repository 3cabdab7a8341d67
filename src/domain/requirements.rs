//! Phase completion requirements
//!
//! What "phase complete" means for each phase, with per-type additions. Gate
//! failures quote the outstanding criteria so callers know what to record.

use std::collections::HashMap;

use crate::schemas::{Phase, WorkItemType};

/// A named completion criterion
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub name: &'static str,
    pub description: &'static str,
    /// The criterion must be backed by an evidence record
    pub requires_evidence: bool,
}

/// Everything required to call a phase complete for a given type
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseRequirements {
    pub phase: Phase,
    pub criteria: Vec<Criterion>,
    pub instructions: &'static str,
    pub estimated_hours: f64,
}

impl PhaseRequirements {
    /// Criterion names, comma separated
    pub fn criteria_summary(&self) -> String {
        self.criteria
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

const fn criterion(name: &'static str, description: &'static str, requires_evidence: bool) -> Criterion {
    Criterion {
        name,
        description,
        requires_evidence,
    }
}

/// Immutable registry of per-phase, per-type requirements
#[derive(Debug, Clone)]
pub struct RequirementRegistry {
    base: HashMap<Phase, PhaseRequirements>,
    additions: HashMap<(Phase, WorkItemType), Vec<Criterion>>,
}

impl RequirementRegistry {
    pub fn standard() -> Self {
        let base = HashMap::from([
            (
                Phase::Discovery,
                PhaseRequirements {
                    phase: Phase::Discovery,
                    criteria: vec![
                        criterion("problem_statement", "The problem is written down and agreed", false),
                        criterion("stakeholders", "Stakeholders are identified", false),
                        criterion("user_research", "User or market evidence is attached", true),
                    ],
                    instructions: "Describe the problem, who has it and how we know.",
                    estimated_hours: 4.0,
                },
            ),
            (
                Phase::Plan,
                PhaseRequirements {
                    phase: Phase::Plan,
                    criteria: vec![
                        criterion("approach", "The solution approach is chosen", false),
                        criterion("task_breakdown", "Work is broken into time-boxed tasks", false),
                        criterion("risks", "Known risks and mitigations are listed", false),
                    ],
                    instructions: "Pick an approach and decompose it into tasks.",
                    estimated_hours: 3.0,
                },
            ),
            (
                Phase::Implementation,
                PhaseRequirements {
                    phase: Phase::Implementation,
                    criteria: vec![
                        criterion("code_complete", "All implementation tasks are done", false),
                        criterion("tests_written", "Automated tests cover the change", true),
                    ],
                    instructions: "Build the change and its tests.",
                    estimated_hours: 16.0,
                },
            ),
            (
                Phase::Review,
                PhaseRequirements {
                    phase: Phase::Review,
                    criteria: vec![
                        criterion("peer_review", "Changes are peer reviewed", false),
                        criterion("acceptance", "Acceptance criteria are verified", true),
                    ],
                    instructions: "Review the change against its acceptance criteria.",
                    estimated_hours: 2.0,
                },
            ),
            (
                Phase::Operations,
                PhaseRequirements {
                    phase: Phase::Operations,
                    criteria: vec![
                        criterion("deployed", "The change is deployed", true),
                        criterion("monitoring", "Monitoring and alerts are in place", false),
                    ],
                    instructions: "Ship the change and watch it run.",
                    estimated_hours: 2.0,
                },
            ),
            (
                Phase::Evolution,
                PhaseRequirements {
                    phase: Phase::Evolution,
                    criteria: vec![
                        criterion("metrics_reviewed", "Target metrics are measured", true),
                        criterion("lessons_learned", "Follow-ups are captured", false),
                    ],
                    instructions: "Measure outcomes and capture what to improve.",
                    estimated_hours: 2.0,
                },
            ),
        ]);

        let additions = HashMap::from([
            (
                (Phase::Implementation, WorkItemType::Bugfix),
                vec![criterion("root_cause", "The root cause is identified", false)],
            ),
            (
                (Phase::Review, WorkItemType::Research),
                vec![criterion("findings", "Findings are documented with sources", true)],
            ),
            (
                (Phase::Operations, WorkItemType::Infrastructure),
                vec![criterion("runbook", "An operational runbook exists", false)],
            ),
        ]);

        RequirementRegistry { base, additions }
    }

    /// Requirements for a phase as they apply to a work item type
    pub fn requirements_for(&self, item_type: WorkItemType, phase: Phase) -> Option<PhaseRequirements> {
        let mut requirements = self.base.get(&phase)?.clone();
        if let Some(extra) = self.additions.get(&(phase, item_type)) {
            requirements.criteria.extend(extra.iter().cloned());
        }
        Some(requirements)
    }
}

impl Default for RequirementRegistry {
    fn default() -> Self {
        RequirementRegistry::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_phase_has_requirements() {
        let registry = RequirementRegistry::standard();
        for phase in Phase::ORDER {
            let reqs = registry
                .requirements_for(WorkItemType::Feature, phase)
                .unwrap();
            assert_eq!(reqs.phase, phase);
            assert!(!reqs.criteria.is_empty());
            assert!(reqs.estimated_hours > 0.0);
        }
    }

    #[test]
    fn test_type_specific_additions() {
        let registry = RequirementRegistry::standard();
        let feature = registry
            .requirements_for(WorkItemType::Feature, Phase::Implementation)
            .unwrap();
        let bugfix = registry
            .requirements_for(WorkItemType::Bugfix, Phase::Implementation)
            .unwrap();
        assert_eq!(bugfix.criteria.len(), feature.criteria.len() + 1);
        assert!(bugfix.criteria_summary().contains("root_cause"));
        assert!(!feature.criteria_summary().contains("root_cause"));
    }
}
