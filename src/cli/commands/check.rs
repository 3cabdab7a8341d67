//! Check command - Validate one transition against a fixture

use std::path::Path;

use serde::Serialize;

use crate::config::load_config;
use crate::domain::{EntityRef, TransitionRequest, ValidationEngine, ValidationResult};
use crate::errors::{Result, WorkgateError};
use crate::fs::{resolve_cwd, resolve_path};
use crate::schemas::{EntityId, EntityKind, Status};
use crate::store::MemoryStore;

/// A validation decision as printed by the CLI
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub kind: EntityKind,
    pub id: EntityId,
    pub from: Status,
    pub to: Status,
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Validate moving the selected entity to `to` and print the decision
pub fn run(
    cwd: Option<&Path>,
    fixture: &Path,
    kind: EntityKind,
    id: EntityId,
    to: Status,
    justification: Option<&str>,
    json: bool,
) -> Result<ValidationResult> {
    let cwd = resolve_cwd(cwd);
    let config = load_config(&cwd)?;
    let store = MemoryStore::load(&resolve_path(&cwd, fixture))?;
    let engine = ValidationEngine::new(config);

    let entity = match kind {
        EntityKind::Project => EntityRef::Project(store.project(id)?),
        EntityKind::WorkItem => EntityRef::WorkItem(store.work_item(id)?),
        EntityKind::Task => EntityRef::Task(store.task(id)?),
    };

    let mut request = TransitionRequest::to(to);
    if let Some(text) = justification {
        request = request.with_justification(text);
    }

    let result = engine.validate_entity_transition(entity, request, &store);
    let report = CheckReport {
        kind,
        id,
        from: entity.status(),
        to,
        result,
    };

    if json {
        let output = serde_json::to_string_pretty(&report)
            .map_err(|e| WorkgateError::InvalidJson(e.to_string()))?;
        println!("{}", output);
    } else {
        print_report(&report);
    }

    Ok(report.result)
}

fn print_report(report: &CheckReport) {
    let subject = format!("{} #{}: {} -> {}", report.kind, report.id, report.from, report.to);
    match &report.result.reason {
        None => println!("allowed  {}", subject),
        Some(reason) => {
            println!("rejected {}", subject);
            println!("  {}", reason);
        }
    }
}
