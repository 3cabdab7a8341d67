//! Next-phase command - Suggest the phase a work item may enter next

use std::path::Path;

use serde::Serialize;

use crate::config::load_config;
use crate::domain::ValidationEngine;
use crate::errors::{Result, WorkgateError};
use crate::fs::{resolve_cwd, resolve_path};
use crate::schemas::{EntityId, Phase, WorkItemType};
use crate::store::MemoryStore;

#[derive(Debug, Serialize)]
pub struct NextPhaseReport {
    pub work_item: EntityId,
    pub item_type: WorkItemType,
    pub current: Option<Phase>,
    pub next: Option<Phase>,
    /// False when the current phase is not part of the type's lifecycle
    pub in_sequence: bool,
    /// Criteria that make the next phase complete
    pub criteria: Vec<String>,
}

pub fn run(cwd: Option<&Path>, fixture: &Path, work_item: EntityId, json: bool) -> Result<()> {
    let cwd = resolve_cwd(cwd);
    let engine = ValidationEngine::new(load_config(&cwd)?);
    let store = MemoryStore::load(&resolve_path(&cwd, fixture))?;
    let item = store.work_item(work_item)?;

    let next = engine.next_allowed_phase(item);
    let sequence = engine.sequences().sequence(item.item_type);
    let in_sequence = item.phase.map_or(!sequence.is_empty(), |phase| sequence.contains(&phase));
    let criteria = next
        .and_then(|phase| engine.requirements().requirements_for(item.item_type, phase))
        .map(|r| r.criteria.iter().map(|c| c.name.to_string()).collect())
        .unwrap_or_default();

    let report = NextPhaseReport {
        work_item,
        item_type: item.item_type,
        current: item.phase,
        next,
        in_sequence,
        criteria,
    };

    if json {
        let output = serde_json::to_string_pretty(&report)
            .map_err(|e| WorkgateError::InvalidJson(e.to_string()))?;
        println!("{}", output);
        return Ok(());
    }

    let current = report.current.map(|p| p.to_string()).unwrap_or_else(|| "none".to_string());
    match report.next {
        _ if !report.in_sequence => println!(
            "work_item #{} ({}): phase {} is not part of the {} lifecycle",
            work_item, report.item_type, current, report.item_type
        ),
        Some(phase) => {
            println!("work_item #{} ({}): {} -> {}", work_item, report.item_type, current, phase);
            if !report.criteria.is_empty() {
                println!("  complete: {}", report.criteria.join(", "));
            }
        }
        None => println!(
            "work_item #{} ({}): {} is the last phase of its lifecycle",
            work_item, report.item_type, current
        ),
    }
    Ok(())
}
