//! Domain logic for workflow transitions and the checks that gate them

mod composition;
mod dependencies;
mod documentation;
mod engine;
mod gates;
mod justification;
mod legacy_gates;
mod phases;
mod quality;
mod queries;
mod requirements;
mod rules;
mod transitions;
mod validation;


pub use composition::{CompositionRule, CompositionRules};
pub use dependencies::{validate_completion, validate_dependencies, ChildStatus};
pub use documentation::{find_placeholder, validate_task_documentation, validate_work_item_documentation};
pub use engine::{EntityRef, ValidationEngine, MAX_EFFORT_OVERRIDE};
pub use gates::PhaseGates;
pub use justification::{validate_justification, JUSTIFICATION_FIELDS};
pub use phases::PhaseSequences;
pub use quality::{FieldRequirement, QualitySchedule, TimeBoxLimits};
pub use queries::WorkflowQueries;
pub use requirements::{Criterion, PhaseRequirements, RequirementRegistry};
pub use rules::{evaluate_condition, validate_rules, ProjectRule, RuleSubject, RuleValue};
pub use transitions::TransitionTable;
pub use validation::{validate_transition, TransitionRequest, ValidationResult};
