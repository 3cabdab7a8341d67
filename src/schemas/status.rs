//! Status schema - lifecycle states shared by every entity kind

use serde::{Deserialize, Serialize};

/// The kind of entity a transition applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A project owning work items
    Project,
    /// A deliverable unit of scope owning tasks
    WorkItem,
    /// The smallest tracked unit of work
    Task,
}

impl EntityKind {
    /// All entity kinds
    pub const ALL: [EntityKind; 3] = [EntityKind::Project, EntityKind::WorkItem, EntityKind::Task];
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Project => write!(f, "project"),
            EntityKind::WorkItem => write!(f, "work_item"),
            EntityKind::Task => write!(f, "task"),
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(EntityKind::Project),
            "work_item" | "work-item" | "workitem" => Ok(EntityKind::WorkItem),
            "task" => Ok(EntityKind::Task),
            _ => Err(format!("Unknown entity kind: {}", s)),
        }
    }
}

/// Lifecycle status.
///
/// One enumeration covers every kind so that the forbidden-transition table can
/// be consulted without knowing the kind. Work items and tasks use
/// draft..archived plus `blocked` and `cancelled`; projects use
/// initiated, active, on_hold, completed, archived and `cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Captured but not yet ready for work
    Draft,
    /// Fully specified and ready to start
    Ready,
    /// Work in progress
    Active,
    /// Awaiting review
    Review,
    /// Completed successfully
    Done,
    /// Retired from the active views
    Archived,
    /// Waiting on an impediment
    Blocked,
    /// Abandoned
    Cancelled,
    /// Project created, not yet started
    Initiated,
    /// Project paused
    OnHold,
    /// Project completed
    Completed,
}

impl Status {
    /// Every status value
    pub const ALL: [Status; 11] = [
        Status::Draft,
        Status::Ready,
        Status::Active,
        Status::Review,
        Status::Done,
        Status::Archived,
        Status::Blocked,
        Status::Cancelled,
        Status::Initiated,
        Status::OnHold,
        Status::Completed,
    ];

    /// No forward movement back into work is possible from a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Status::Done | Status::Completed | Status::Cancelled | Status::Archived
        )
    }

    /// Terminal and successful (as opposed to cancelled or archived).
    pub fn is_terminal_success(self) -> bool {
        matches!(self, Status::Done | Status::Completed)
    }

    /// The string form used in messages and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Ready => "ready",
            Status::Active => "active",
            Status::Review => "review",
            Status::Done => "done",
            Status::Archived => "archived",
            Status::Blocked => "blocked",
            Status::Cancelled => "cancelled",
            Status::Initiated => "initiated",
            Status::OnHold => "on_hold",
            Status::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}
