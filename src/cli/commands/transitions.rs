//! Transitions command - List legal moves from a status

use serde::Serialize;

use crate::domain::TransitionTable;
use crate::errors::{Result, WorkgateError};
use crate::schemas::{EntityKind, Status};

#[derive(Debug, Serialize, PartialEq)]
pub struct TransitionListing {
    pub kind: EntityKind,
    pub from: Status,
    pub forward: Vec<Status>,
    /// Backward moves that need a justification
    pub rework: Vec<Status>,
}

pub fn listing(table: &TransitionTable, kind: EntityKind, from: Status) -> TransitionListing {
    TransitionListing {
        kind,
        from,
        forward: table.valid_transitions(kind, from),
        rework: table.rework_targets(kind, from),
    }
}

/// Print the legal targets for `kind` from `from`
pub fn run(kind: EntityKind, from: Status, json: bool) -> Result<()> {
    let listing = listing(&TransitionTable::standard(), kind, from);

    if json {
        let output = serde_json::to_string_pretty(&listing)
            .map_err(|e| WorkgateError::InvalidJson(e.to_string()))?;
        println!("{}", output);
        return Ok(());
    }

    if listing.forward.is_empty() && listing.rework.is_empty() {
        println!("{} {}: no transitions allowed", kind, from);
        return Ok(());
    }
    println!("{} {}:", kind, from);
    for status in &listing.forward {
        println!("  -> {}", status);
    }
    for status in &listing.rework {
        println!("  -> {} (rework, needs --justification)", status);
    }
    Ok(())
}
