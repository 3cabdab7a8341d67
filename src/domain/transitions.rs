//! Status transition tables
//!
//! Three static maps decide whether a status change is structurally legal:
//!
//! - forward adjacency, one map per entity kind;
//! - backward ("rework") moves, which need a justification;
//! - forbidden moves, which are never allowed and carry a fixed explanation.
//!
//! The forbidden map is kind agnostic. A rework move only applies to a kind
//! whose forward map knows both of its statuses.

use std::collections::HashMap;

use crate::schemas::{EntityKind, Status};

/// Forward adjacency for work items and tasks
const ITEM_FORWARD: &[(Status, &[Status])] = &[
    (Status::Draft, &[Status::Ready, Status::Cancelled]),
    (Status::Ready, &[Status::Active, Status::Blocked, Status::Cancelled]),
    (Status::Active, &[Status::Review, Status::Blocked, Status::Cancelled]),
    (Status::Review, &[Status::Done, Status::Blocked, Status::Cancelled]),
    (
        Status::Blocked,
        &[Status::Ready, Status::Active, Status::Review, Status::Cancelled],
    ),
    (Status::Done, &[Status::Archived]),
    (Status::Cancelled, &[Status::Archived]),
];

/// Forward adjacency for projects
const PROJECT_FORWARD: &[(Status, &[Status])] = &[
    (Status::Initiated, &[Status::Active, Status::Cancelled]),
    (
        Status::Active,
        &[Status::OnHold, Status::Completed, Status::Cancelled],
    ),
    (Status::OnHold, &[Status::Active, Status::Cancelled]),
    (Status::Completed, &[Status::Archived]),
    (Status::Cancelled, &[Status::Archived]),
];

/// Rework moves and what they mean
const BACKWARD: &[(Status, Status, &str)] = &[
    (Status::Review, Status::Active, "review found issues that need rework"),
    (Status::Active, Status::Ready, "work must be re-planned before continuing"),
    (Status::Ready, Status::Draft, "requirements need to be revisited"),
    (Status::OnHold, Status::Initiated, "project needs to be re-scoped"),
];

/// Statuses that count as "already finished" for the reopen rule
const CLOSED: [Status; 3] = [Status::Done, Status::Completed, Status::Cancelled];

/// Immutable transition tables, built once and shared
#[derive(Debug, Clone)]
pub struct TransitionTable {
    forward: HashMap<EntityKind, HashMap<Status, Vec<Status>>>,
    backward: HashMap<(Status, Status), &'static str>,
    forbidden: HashMap<(Status, Status), String>,
}

impl TransitionTable {
    /// The standard tables for every entity kind
    pub fn standard() -> Self {
        let mut forward = HashMap::new();
        forward.insert(EntityKind::Project, adjacency(PROJECT_FORWARD));
        forward.insert(EntityKind::WorkItem, adjacency(ITEM_FORWARD));
        forward.insert(EntityKind::Task, adjacency(ITEM_FORWARD));

        let backward = BACKWARD
            .iter()
            .map(|&(from, to, meaning)| ((from, to), meaning))
            .collect();

        TransitionTable {
            forward,
            backward,
            forbidden: forbidden_transitions(),
        }
    }

    /// Tables with no forward transitions for any kind; every request is denied.
    pub fn empty() -> Self {
        TransitionTable {
            forward: HashMap::new(),
            backward: HashMap::new(),
            forbidden: forbidden_transitions(),
        }
    }

    /// Whether `current -> target` is a legal forward move for `kind`.
    ///
    /// A kind the table does not know is never allowed to move.
    pub fn can_transition(&self, kind: EntityKind, current: Status, target: Status) -> bool {
        if self.forbidden.contains_key(&(current, target)) {
            return false;
        }
        self.forward
            .get(&kind)
            .and_then(|map| map.get(&current))
            .is_some_and(|targets| targets.contains(&target))
    }

    /// Legal forward targets from `current`
    pub fn valid_transitions(&self, kind: EntityKind, current: Status) -> Vec<Status> {
        self.forward
            .get(&kind)
            .and_then(|map| map.get(&current))
            .cloned()
            .unwrap_or_default()
    }

    /// Whether `current -> target` is a rework move for `kind`
    pub fn is_backward(&self, kind: EntityKind, current: Status, target: Status) -> bool {
        self.backward.contains_key(&(current, target))
            && self.applies_to(kind, current)
            && self.applies_to(kind, target)
    }

    /// Rework targets reachable from `current` for `kind`, sorted
    pub fn rework_targets(&self, kind: EntityKind, current: Status) -> Vec<Status> {
        let mut targets: Vec<Status> = self
            .backward
            .keys()
            .filter(|&&(from, to)| from == current && self.is_backward(kind, from, to))
            .map(|(_, to)| *to)
            .collect();
        targets.sort();
        targets
    }

    fn applies_to(&self, kind: EntityKind, status: Status) -> bool {
        self.forward
            .get(&kind)
            .is_some_and(|map| map.contains_key(&status))
    }

    /// Check a rework move. A blank justification is a failure, not a silent allow.
    pub fn backward_allowed(
        &self,
        kind: EntityKind,
        current: Status,
        target: Status,
        justification: Option<&str>,
    ) -> Result<(), String> {
        let meaning = self
            .backward
            .get(&(current, target))
            .filter(|_| self.is_backward(kind, current, target))
            .ok_or_else(|| {
                format!(
                    "{} -> {} is not a permitted rework transition for a {}",
                    current, target, kind
                )
            })?;

        match justification.map(str::trim) {
            Some(text) if !text.is_empty() => Ok(()),
            _ => Err(format!(
                "moving back from {} to {} ({}) requires a justification",
                current, target, meaning
            )),
        }
    }

    /// The fixed reason a move is never allowed, if it is forbidden
    pub fn is_forbidden(&self, current: Status, target: Status) -> Option<String> {
        self.forbidden.get(&(current, target)).cloned()
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        TransitionTable::standard()
    }
}

fn adjacency(entries: &[(Status, &[Status])]) -> HashMap<Status, Vec<Status>> {
    entries
        .iter()
        .map(|(from, targets)| (*from, targets.to_vec()))
        .collect()
}

fn forbidden_transitions() -> HashMap<(Status, Status), String> {
    let mut forbidden = HashMap::new();

    for target in [Status::Active, Status::Review, Status::Done] {
        forbidden.insert(
            (Status::Draft, target),
            format!("cannot skip ready: a draft must be marked ready before it can move to {}", target),
        );
    }
    for target in [Status::Review, Status::Done] {
        forbidden.insert(
            (Status::Ready, target),
            format!("cannot skip active: work must be started before it can move to {}", target),
        );
    }
    forbidden.insert(
        (Status::Active, Status::Done),
        "cannot skip review: active work must be reviewed before it is done".to_string(),
    );

    for closed in CLOSED {
        for target in Status::ALL {
            if target == closed || target == Status::Archived {
                continue;
            }
            forbidden.insert(
                (closed, target),
                format!(
                    "{} entities cannot be reopened; create a new entity instead",
                    closed
                ),
            );
        }
    }

    for target in Status::ALL {
        if target != Status::Archived {
            forbidden.insert(
                (Status::Archived, target),
                "archived entities cannot be reopened; create a new entity instead".to_string(),
            );
        }
    }

    forbidden
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_happy_path() {
        let table = TransitionTable::standard();
        let path = [
            Status::Draft,
            Status::Ready,
            Status::Active,
            Status::Review,
            Status::Done,
            Status::Archived,
        ];
        for kind in [EntityKind::WorkItem, EntityKind::Task] {
            for pair in path.windows(2) {
                assert!(
                    table.can_transition(kind, pair[0], pair[1]),
                    "{} {} -> {}",
                    kind,
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn test_project_lifecycle() {
        let table = TransitionTable::standard();
        assert!(table.can_transition(EntityKind::Project, Status::Initiated, Status::Active));
        assert!(table.can_transition(EntityKind::Project, Status::Active, Status::OnHold));
        assert!(table.can_transition(EntityKind::Project, Status::OnHold, Status::Active));
        assert!(table.can_transition(EntityKind::Project, Status::Active, Status::Completed));
        assert!(table.can_transition(EntityKind::Project, Status::Completed, Status::Archived));
        assert!(!table.can_transition(EntityKind::Project, Status::Draft, Status::Ready));
        assert!(!table.can_transition(EntityKind::Task, Status::Active, Status::OnHold));
    }

    #[test]
    fn test_valid_transitions() {
        let table = TransitionTable::standard();
        assert_eq!(
            table.valid_transitions(EntityKind::Task, Status::Draft),
            vec![Status::Ready, Status::Cancelled]
        );
        assert!(table.valid_transitions(EntityKind::Task, Status::Archived).is_empty());
        assert!(table
            .valid_transitions(EntityKind::Task, Status::Initiated)
            .is_empty());
    }

    #[test]
    fn test_backward_requires_justification() {
        let table = TransitionTable::standard();
        let task = EntityKind::Task;
        assert!(table.is_backward(task, Status::Review, Status::Active));
        assert!(!table.is_backward(task, Status::Active, Status::Review));

        assert!(table
            .backward_allowed(task, Status::Review, Status::Active, Some("failing tests"))
            .is_ok());
        assert!(table
            .backward_allowed(task, Status::Review, Status::Active, Some("   "))
            .is_err());
        assert!(table
            .backward_allowed(task, Status::Review, Status::Active, None)
            .unwrap_err()
            .contains("requires a justification"));
        assert!(table
            .backward_allowed(task, Status::Done, Status::Active, Some("oops"))
            .unwrap_err()
            .contains("not a permitted rework"));
    }

    #[test]
    fn test_rework_stays_within_kind() {
        let table = TransitionTable::standard();
        assert!(!table.is_backward(EntityKind::Project, Status::Active, Status::Ready));
        assert!(!table.is_backward(EntityKind::Task, Status::OnHold, Status::Initiated));
        assert!(!table.is_backward(EntityKind::WorkItem, Status::OnHold, Status::Initiated));
        assert!(table.is_backward(EntityKind::Project, Status::OnHold, Status::Initiated));
        assert!(table.is_backward(EntityKind::WorkItem, Status::Active, Status::Ready));

        assert!(table
            .backward_allowed(EntityKind::Project, Status::Active, Status::Ready, Some("rescope"))
            .unwrap_err()
            .contains("not a permitted rework"));
    }

    #[test]
    fn test_rework_targets() {
        let table = TransitionTable::standard();
        assert_eq!(table.rework_targets(EntityKind::Task, Status::Review), vec![Status::Active]);
        assert_eq!(
            table.rework_targets(EntityKind::Project, Status::OnHold),
            vec![Status::Initiated]
        );
        assert!(table.rework_targets(EntityKind::Task, Status::OnHold).is_empty());
        assert!(table.rework_targets(EntityKind::Task, Status::Done).is_empty());
    }

    #[test]
    fn test_forbidden_reasons() {
        let table = TransitionTable::standard();
        assert!(table
            .is_forbidden(Status::Ready, Status::Done)
            .unwrap()
            .contains("cannot skip"));
        assert!(table
            .is_forbidden(Status::Done, Status::Active)
            .unwrap()
            .contains("cannot be reopened"));
        assert!(table
            .is_forbidden(Status::Cancelled, Status::Ready)
            .unwrap()
            .contains("cannot be reopened"));
        assert!(table
            .is_forbidden(Status::Archived, Status::Draft)
            .unwrap()
            .contains("cannot be reopened"));
        assert!(table.is_forbidden(Status::Done, Status::Archived).is_none());
        assert!(table.is_forbidden(Status::Draft, Status::Ready).is_none());
    }

    #[test]
    fn test_forbidden_never_overlaps_allowed_moves() {
        let table = TransitionTable::standard();
        for kind in EntityKind::ALL {
            for from in Status::ALL {
                for to in table.valid_transitions(kind, from) {
                    assert!(table.is_forbidden(from, to).is_none(), "{} -> {}", from, to);
                }
            }
        }
        for &(from, to, _) in BACKWARD {
            assert!(table.is_forbidden(from, to).is_none(), "{} -> {}", from, to);
        }
    }

    #[test]
    fn test_empty_table_denies_everything() {
        let table = TransitionTable::empty();
        for kind in EntityKind::ALL {
            assert!(!table.can_transition(kind, Status::Draft, Status::Ready));
            assert!(!table.can_transition(kind, Status::Initiated, Status::Active));
        }
    }
}
