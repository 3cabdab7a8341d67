//! Legacy gate records
//!
//! Before the phase field existed, phase completion was stored as a gate map in
//! the work item's metadata:
//!
//! ```json
//! {"gates": {"D1": {"status": "completed", "completion": 100}}}
//! ```
//!
//! This module is the only place that reads it. Delete it, and the single call
//! in `gates.rs`, once no work item without a phase remains.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::schemas::{as_number, Metadata, Phase, Status, WorkItemSnapshot};

use super::validation::ValidationResult;

/// Validate `target` for an item without a phase, using its legacy gate map.
///
/// Every phase of the item's sequence up to and including `required` must have
/// a gate entry with `status == "completed"` or `completion >= 100`. Items with
/// no gate map pass only when created before `cutover`.
#[deprecated(since = "0.1.0", note = "gate maps are superseded by the phase field")]
pub fn validate_legacy_gates(
    item: &WorkItemSnapshot,
    target: Status,
    required: Phase,
    sequence: &[Phase],
    cutover: DateTime<Utc>,
) -> ValidationResult {
    let metadata = match Metadata::parse(item.metadata.as_deref()) {
        Ok(metadata) => metadata,
        Err(e) => {
            return ValidationResult::failure(format!(
                "cannot read gate record of work item #{}: {}",
                item.id, e
            ))
        }
    };

    let gates = match metadata.get("gates") {
        None | Some(Value::Null) => None,
        Some(Value::Object(gates)) if gates.is_empty() => None,
        Some(Value::Object(gates)) => Some(gates),
        Some(_) => {
            return ValidationResult::failure(format!(
                "gate record of work item #{} must be an object keyed by gate code",
                item.id
            ))
        }
    };

    let gates = match gates {
        Some(gates) => gates,
        None if item.created_at < cutover => {
            tracing::warn!(
                work_item = item.id,
                "work item predates the phase field and has no gate record; allowing {} without gate checks",
                target
            );
            return ValidationResult::success();
        }
        None => {
            return ValidationResult::failure(format!(
                "work item #{} has neither a phase nor a gate record; set its phase before moving to {}",
                item.id, target
            ));
        }
    };

    tracing::warn!(
        work_item = item.id,
        "evaluating deprecated gate record; migrate this work item to the phase field"
    );

    let incomplete: Vec<&str> = sequence
        .iter()
        .filter(|phase| phase.rank() <= required.rank())
        .map(|phase| phase.gate_code())
        .filter(|code| !gate_complete(gates.get(*code)))
        .collect();

    if incomplete.is_empty() {
        ValidationResult::success()
    } else {
        ValidationResult::failure(format!(
            "cannot move work item #{} to {}: gates not completed: {}",
            item.id,
            target,
            incomplete.join(", ")
        ))
    }
}

fn gate_complete(entry: Option<&Value>) -> bool {
    let Some(entry) = entry.and_then(Value::as_object) else {
        return false;
    };
    let completed = entry.get("status").and_then(Value::as_str) == Some("completed");
    let full = entry
        .get("completion")
        .and_then(as_number)
        .is_some_and(|pct| pct >= 100.0);
    completed || full
}
