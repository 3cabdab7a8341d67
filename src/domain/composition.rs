//! Task-type composition of work items

use std::collections::{BTreeSet, HashMap};

use crate::schemas::{TaskSnapshot, TaskType, WorkItemSnapshot, WorkItemType};

use super::validation::ValidationResult;

/// Task types a work item type must and must not contain
#[derive(Debug, Clone, Default)]
pub struct CompositionRule {
    pub required: Vec<TaskType>,
    pub forbidden: Vec<TaskType>,
}

#[derive(Debug, Clone)]
pub struct CompositionRules {
    rules: HashMap<WorkItemType, CompositionRule>,
}

impl CompositionRules {
    pub fn standard() -> Self {
        use TaskType::*;

        let rule = |required: &[TaskType], forbidden: &[TaskType]| CompositionRule {
            required: required.to_vec(),
            forbidden: forbidden.to_vec(),
        };

        let rules = HashMap::from([
            (WorkItemType::Feature, rule(&[Design, Implementation, Testing, Documentation], &[])),
            (WorkItemType::Enhancement, rule(&[Implementation, Testing], &[])),
            (WorkItemType::Bugfix, rule(&[Bugfix, Testing], &[])),
            (WorkItemType::Research, rule(&[Research, Documentation], &[Deployment])),
            (WorkItemType::Planning, rule(&[Planning], &[Implementation, Deployment])),
            (WorkItemType::Refactoring, rule(&[Refactoring, Testing], &[])),
            (WorkItemType::Infrastructure, rule(&[Deployment, Documentation], &[])),
        ]);
        CompositionRules { rules }
    }

    pub fn rule_for(&self, item_type: WorkItemType) -> Option<&CompositionRule> {
        self.rules.get(&item_type)
    }

    /// Validate the task types of `tasks` against the rule for `item`'s type
    pub fn validate_composition(&self, item: &WorkItemSnapshot, tasks: &[TaskSnapshot]) -> ValidationResult {
        let Some(rule) = self.rule_for(item.item_type) else {
            return ValidationResult::success();
        };

        let present: BTreeSet<TaskType> = tasks.iter().map(|t| t.task_type).collect();

        let missing: Vec<&str> = rule
            .required
            .iter()
            .filter(|t| !present.contains(t))
            .map(|t| t.as_str())
            .collect();
        if !missing.is_empty() {
            return ValidationResult::failure(format!(
                "{} work item #{} needs {} tasks before it can be ready; missing: {}",
                item.item_type,
                item.id,
                rule.required
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                missing.join(", ")
            ));
        }

        let unexpected: Vec<&str> = rule
            .forbidden
            .iter()
            .filter(|t| present.contains(t))
            .map(|t| t.as_str())
            .collect();
        if !unexpected.is_empty() {
            return ValidationResult::failure(format!(
                "{} work item #{} must not contain {} tasks",
                item.item_type,
                item.id,
                unexpected.join(", ")
            ));
        }

        ValidationResult::success()
    }
}

impl Default for CompositionRules {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks(types: &[TaskType]) -> Vec<TaskSnapshot> {
        types
            .iter()
            .enumerate()
            .map(|(i, t)| TaskSnapshot::new(i as i64 + 1, 1, format!("Task {}", i + 1), *t))
            .collect()
    }

    #[test]
    fn test_every_type_has_a_rule() {
        let rules = CompositionRules::standard();
        for item_type in WorkItemType::ALL {
            assert!(rules.rule_for(item_type).is_some(), "{}", item_type);
        }
    }

    #[test]
    fn test_feature_requires_full_set() {
        use TaskType::*;
        let rules = CompositionRules::standard();
        let item = WorkItemSnapshot::new(1, 1, "Export", WorkItemType::Feature);

        let reason = rules
            .validate_composition(&item, &tasks(&[Design, Implementation]))
            .reason
            .unwrap();
        assert!(reason.contains("missing: testing, documentation"));

        assert!(rules
            .validate_composition(&item, &tasks(&[Design, Implementation, Testing, Documentation, Review]))
            .valid);
    }

    #[test]
    fn test_forbidden_types() {
        use TaskType::*;
        let rules = CompositionRules::standard();
        let item = WorkItemSnapshot::new(1, 1, "Roadmap", WorkItemType::Planning);

        let reason = rules
            .validate_composition(&item, &tasks(&[Planning, Implementation]))
            .reason
            .unwrap();
        assert!(reason.contains("must not contain implementation tasks"));
    }
}
