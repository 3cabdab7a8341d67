//! Documentation standards checked when work enters `ready`

use regex::Regex;

use crate::schemas::{value_has_content, Metadata, TaskSnapshot, WorkItemSnapshot, WorkItemType};

use super::validation::ValidationResult;

lazy_static::lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex = Regex::new(
        r"(?i)\b(?:todo|tbd|fixme|xxx)\b|lorem\s+ipsum|\bplaceholder\b|<\s*insert[^>]*>|\[\s*insert[^\]]*\]"
    ).unwrap();
}

/// Quality metadata sections every work item documents
const WORK_ITEM_SECTIONS: [&str; 3] = ["ownership", "scope", "artifacts"];

/// First placeholder token found in `text`, if any
pub fn find_placeholder(text: &str) -> Option<&str> {
    PLACEHOLDER_REGEX.find(text).map(|m| m.as_str())
}

fn check_description(noun: &str, id: i64, description: Option<&str>, min_length: usize) -> Result<(), String> {
    let description = description.map(str::trim).unwrap_or_default();
    if description.is_empty() {
        return Err(format!("{} #{} has no description", noun, id));
    }

    let length = description.chars().count();
    if length < min_length {
        return Err(format!(
            "description of {} #{} is too short ({} characters, at least {} required)",
            noun, id, length, min_length
        ));
    }

    if let Some(token) = find_placeholder(description) {
        return Err(format!(
            "description of {} #{} contains placeholder text '{}'",
            noun, id, token
        ));
    }
    Ok(())
}

/// Validate a work item's description and documentation metadata
pub fn validate_work_item_documentation(item: &WorkItemSnapshot, min_length: usize) -> ValidationResult {
    if let Err(reason) = check_description("work item", item.id, item.description.as_deref(), min_length) {
        return ValidationResult::failure(reason);
    }

    let metadata = match Metadata::parse(item.quality_metadata.as_deref()) {
        Ok(metadata) => metadata,
        Err(e) => {
            return ValidationResult::failure(format!(
                "quality metadata of work item #{} is malformed: {}",
                item.id, e
            ))
        }
    };

    let missing: Vec<&str> = WORK_ITEM_SECTIONS
        .iter()
        .copied()
        .filter(|section| !metadata.has_content(section))
        .collect();
    if !missing.is_empty() {
        return ValidationResult::failure(format!(
            "work item #{} is missing documentation: {}",
            item.id,
            missing.join(", ")
        ));
    }

    if matches!(item.item_type, WorkItemType::Feature | WorkItemType::Enhancement) {
        let has_code_paths = metadata
            .object("artifacts")
            .and_then(|artifacts| artifacts.get("code_paths"))
            .and_then(|paths| paths.as_array())
            .is_some_and(|paths| paths.iter().any(value_has_content));
        if !has_code_paths {
            return ValidationResult::failure(format!(
                "{} work item #{} must list artifacts.code_paths",
                item.item_type, item.id
            ));
        }
    }

    ValidationResult::success()
}

/// Validate a task's description
pub fn validate_task_documentation(task: &TaskSnapshot, min_length: usize) -> ValidationResult {
    check_description("task", task.id, task.description.as_deref(), min_length).into()
}
