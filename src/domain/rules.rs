//! Project enforcement rules
//!
//! A rule is a single comparison over a named field of the entity being moved,
//! for example `effort_hours <= 6` or `target != done`. The rule passes when
//! the comparison holds. Anything the evaluator does not understand denies.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schemas::{EntityKind, ProjectSnapshot, Status, TaskSnapshot, WorkItemSnapshot};

use super::validation::ValidationResult;

lazy_static::lazy_static! {
    static ref CONDITION_REGEX: Regex = Regex::new(
        r#"^\s*(?P<field>[a-z_]+)\s*(?P<op><=|>=|==|!=|<|>)\s*(?P<value>"[^"]*"|'[^']*'|[^\s"']+)\s*$"#
    ).unwrap();
}

/// A per-project enforcement rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRule {
    pub id: String,
    pub applies_to: EntityKind,
    pub condition: String,
    pub message: String,
}

/// A field value a condition can compare against
#[derive(Debug, Clone, PartialEq)]
pub enum RuleValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Number(n) => write!(f, "{}", n),
            RuleValue::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Operator {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "<" => Some(Operator::Lt),
            "<=" => Some(Operator::Le),
            ">" => Some(Operator::Gt),
            ">=" => Some(Operator::Ge),
            "==" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            _ => None,
        }
    }
}

/// The fields of one entity that rules may reference
#[derive(Debug, Clone, Default)]
pub struct RuleSubject {
    fields: HashMap<&'static str, RuleValue>,
}

impl RuleSubject {
    fn common(status: Status, target: Status, name: &str, description: Option<&str>) -> Self {
        let mut subject = RuleSubject::default();
        subject.text("status", status.as_str());
        subject.text("target", target.as_str());
        subject.text("name", name);
        subject.number(
            "description_length",
            description.map(|d| d.trim().chars().count()).unwrap_or(0) as f64,
        );
        subject
    }

    pub fn for_project(project: &ProjectSnapshot, target: Status) -> Self {
        Self::common(project.status, target, &project.name, project.description.as_deref())
    }

    pub fn for_work_item(item: &WorkItemSnapshot, target: Status) -> Self {
        let mut subject = Self::common(item.status, target, &item.name, item.description.as_deref());
        subject.text("type", item.item_type.as_str());
        if let Some(phase) = item.phase {
            subject.text("phase", phase.as_str());
        }
        subject
    }

    pub fn for_task(task: &TaskSnapshot, target: Status) -> Self {
        let mut subject = Self::common(task.status, target, &task.name, task.description.as_deref());
        subject.text("type", task.task_type.as_str());
        if let Some(phase) = task.phase {
            subject.text("phase", phase.as_str());
        }
        if let Some(hours) = task.effort_hours {
            subject.number("effort_hours", hours);
        }
        subject
    }

    fn text(&mut self, field: &'static str, value: &str) {
        self.fields.insert(field, RuleValue::Text(value.to_string()));
    }

    fn number(&mut self, field: &'static str, value: f64) {
        self.fields.insert(field, RuleValue::Number(value));
    }

    pub fn get(&self, field: &str) -> Option<&RuleValue> {
        self.fields.get(field)
    }
}

/// Evaluate a condition. `Err` carries why the condition could not be evaluated.
pub fn evaluate_condition(condition: &str, subject: &RuleSubject) -> Result<bool, String> {
    let caps = CONDITION_REGEX
        .captures(condition)
        .ok_or_else(|| format!("unparsable condition '{}'", condition))?;

    let field = &caps["field"];
    let op = Operator::parse(&caps["op"]).ok_or_else(|| format!("unknown operator '{}'", &caps["op"]))?;
    let expected = parse_literal(&caps["value"]);

    let actual = subject
        .get(field)
        .ok_or_else(|| format!("unknown or unset field '{}'", field))?;

    match (actual, &expected) {
        (RuleValue::Number(a), RuleValue::Number(b)) => Ok(match op {
            Operator::Lt => a < b,
            Operator::Le => a <= b,
            Operator::Gt => a > b,
            Operator::Ge => a >= b,
            Operator::Eq => a == b,
            Operator::Ne => a != b,
        }),
        (RuleValue::Text(a), RuleValue::Text(b)) => match op {
            Operator::Eq => Ok(a == b),
            Operator::Ne => Ok(a != b),
            _ => Err(format!("operator '{}' needs a numeric field", &caps["op"])),
        },
        _ => Err(format!(
            "cannot compare field '{}' ({}) with '{}'",
            field, actual, expected
        )),
    }
}

fn parse_literal(raw: &str) -> RuleValue {
    let quoted = (raw.starts_with('"') && raw.ends_with('"') && raw.len() >= 2)
        || (raw.starts_with('\'') && raw.ends_with('\'') && raw.len() >= 2);
    if quoted {
        return RuleValue::Text(raw[1..raw.len() - 1].to_string());
    }
    match raw.parse::<f64>() {
        Ok(n) => RuleValue::Number(n),
        Err(_) => RuleValue::Text(raw.to_string()),
    }
}

/// Evaluate every rule that applies to `kind`; the first violated or
/// unevaluable rule fails.
pub fn validate_rules(rules: &[ProjectRule], kind: EntityKind, subject: &RuleSubject) -> ValidationResult {
    for rule in rules.iter().filter(|r| r.applies_to == kind) {
        match evaluate_condition(&rule.condition, subject) {
            Ok(true) => {}
            Ok(false) => {
                return ValidationResult::failure(format!("rule {} violated: {}", rule.id, rule.message))
            }
            Err(e) => {
                tracing::warn!(rule = %rule.id, error = %e, "denying transition on unevaluable rule");
                return ValidationResult::failure(format!(
                    "rule {} cannot be evaluated ({}); denying transition",
                    rule.id, e
                ));
            }
        }
    }
    ValidationResult::success()
}
