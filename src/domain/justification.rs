//! Business justification for work items entering `ready`

use crate::schemas::{Metadata, WorkItemSnapshot};

use super::validation::ValidationResult;

/// Fields a structured justification document must fill in
pub const JUSTIFICATION_FIELDS: [&str; 4] =
    ["problem", "desired_outcome", "business_impact", "target_metrics"];

/// Validate the business justification of a work item.
///
/// A structured document in `justification` wins. Without one, the free-text
/// `business_context` field is still accepted, with a deprecation warning.
pub fn validate_justification(item: &WorkItemSnapshot) -> ValidationResult {
    let structured = item
        .justification
        .as_deref()
        .filter(|raw| !raw.trim().is_empty());

    if let Some(raw) = structured {
        let doc = match Metadata::parse(Some(raw)) {
            Ok(doc) => doc,
            Err(e) => {
                return ValidationResult::failure(format!(
                    "business justification of work item #{} is malformed: {}",
                    item.id, e
                ))
            }
        };

        let missing: Vec<&str> = JUSTIFICATION_FIELDS
            .iter()
            .copied()
            .filter(|field| !doc.has_content(field))
            .collect();
        if missing.is_empty() {
            return ValidationResult::success();
        }
        return ValidationResult::failure(format!(
            "business justification of work item #{} is incomplete; missing: {}",
            item.id,
            missing.join(", ")
        ));
    }

    let legacy = item
        .business_context
        .as_deref()
        .is_some_and(|text| !text.trim().is_empty());
    if legacy {
        tracing::warn!(
            work_item = item.id,
            "business_context is deprecated; record a structured justification instead"
        );
        return ValidationResult::success();
    }

    ValidationResult::failure(format!(
        "work item #{} needs a business justification ({}) before it can be ready",
        item.id,
        JUSTIFICATION_FIELDS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::WorkItemType;

    fn item() -> WorkItemSnapshot {
        WorkItemSnapshot::new(4, 1, "Export", WorkItemType::Feature)
    }

    #[test]
    fn test_structured_justification_passes() {
        let it = item().with_justification(
            r#"{"problem": "Users cannot export", "desired_outcome": "CSV export",
                "business_impact": "Fewer support tickets", "target_metrics": ["tickets -20%"]}"#,
        );
        assert!(validate_justification(&it).valid);
    }

    #[test]
    fn test_missing_fields_are_named() {
        let it = item().with_justification(r#"{"problem": "Users cannot export", "target_metrics": []}"#);
        let reason = validate_justification(&it).reason.unwrap();
        assert!(reason.contains("desired_outcome"));
        assert!(reason.contains("business_impact"));
        assert!(reason.contains("target_metrics"));
        assert!(!reason.contains("problem,"));
    }

    #[test]
    fn test_legacy_context_passes() {
        let it = item().with_business_context("Customers keep asking for exports");
        assert!(validate_justification(&it).valid);
    }

    #[test]
    fn test_malformed_document_fails_even_with_legacy_context() {
        let it = item()
            .with_business_context("Customers keep asking")
            .with_justification("{not json");
        let reason = validate_justification(&it).reason.unwrap();
        assert!(reason.contains("malformed"));
    }

    #[test]
    fn test_nothing_recorded_fails() {
        let it = item().with_business_context("   ");
        let reason = validate_justification(&it).reason.unwrap();
        assert!(reason.contains("needs a business justification"));
    }
}
