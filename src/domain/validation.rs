//! Validation results and the state-machine admission check

use serde::Serialize;

use crate::schemas::{EntityKind, Status};

use super::transitions::TransitionTable;

/// Result of a validation check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// Reason for failure (present iff valid is false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        ValidationResult {
            valid: true,
            reason: None,
        }
    }

    /// Create a failed validation result
    pub fn failure(reason: impl Into<String>) -> Self {
        ValidationResult {
            valid: false,
            reason: Some(reason.into()),
        }
    }

    /// Check if the validation passed
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Convert into a `Result` so checks can be chained with `?`
    pub fn into_result(self) -> Result<(), String> {
        if self.valid {
            Ok(())
        } else {
            Err(self
                .reason
                .unwrap_or_else(|| "validation failed".to_string()))
        }
    }
}

impl From<Result<(), String>> for ValidationResult {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => ValidationResult::success(),
            Err(reason) => ValidationResult::failure(reason),
        }
    }
}

/// A proposed status change, optionally carrying a rework justification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    /// Target status
    pub target: Status,

    /// Required when the transition is a backward (rework) move
    pub justification: Option<String>,
}

impl TransitionRequest {
    /// Request a move to `target` without justification
    pub fn to(target: Status) -> Self {
        TransitionRequest {
            target,
            justification: None,
        }
    }

    /// Attach a rework justification
    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = Some(justification.into());
        self
    }
}

impl From<Status> for TransitionRequest {
    fn from(target: Status) -> Self {
        TransitionRequest::to(target)
    }
}

/// Validate a status change against the transition table.
///
/// Forbidden moves fail with their fixed reason. Forward moves pass. Backward
/// moves pass only with a justification. Anything else fails and lists the
/// legal targets.
pub fn validate_transition(
    table: &TransitionTable,
    kind: EntityKind,
    current: Status,
    request: &TransitionRequest,
) -> ValidationResult {
    let target = request.target;

    if let Some(reason) = table.is_forbidden(current, target) {
        return ValidationResult::failure(reason);
    }

    if table.can_transition(kind, current, target) {
        return ValidationResult::success();
    }

    if table.is_backward(kind, current, target) {
        return table
            .backward_allowed(kind, current, target, request.justification.as_deref())
            .into();
    }

    let valid = table.valid_transitions(kind, current);
    if valid.is_empty() {
        return ValidationResult::failure(format!(
            "cannot transition {} from {} to {}: no transitions are allowed from {}",
            kind, current, target, current
        ));
    }
    ValidationResult::failure(format!(
        "cannot transition {} from {} to {}; valid transitions: {}",
        kind,
        current,
        target,
        join_statuses(&valid)
    ))
}

fn join_statuses(statuses: &[Status]) -> String {
    statuses
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
