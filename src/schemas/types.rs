//! Type enumerations keying every per-type table: phases, work item types and task types

use serde::{Deserialize, Serialize};

/// Lifecycle phase, independent of status.
///
/// Variants are declared in canonical order; `rank()` is the position in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Understand the problem
    #[serde(alias = "D1_DISCOVERY")]
    Discovery,
    /// Decide the approach
    #[serde(alias = "P1_PLAN")]
    Plan,
    /// Build it
    #[serde(alias = "I1_IMPLEMENTATION")]
    Implementation,
    /// Verify it
    #[serde(alias = "R1_REVIEW")]
    Review,
    /// Ship and run it
    #[serde(alias = "O1_OPERATIONS")]
    Operations,
    /// Learn and improve
    #[serde(alias = "E1_EVOLUTION")]
    Evolution,
}

impl Phase {
    /// Canonical phase ordering
    pub const ORDER: [Phase; 6] = [
        Phase::Discovery,
        Phase::Plan,
        Phase::Implementation,
        Phase::Review,
        Phase::Operations,
        Phase::Evolution,
    ];

    /// 0-based position in the canonical ordering
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Snake-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Discovery => "discovery",
            Phase::Plan => "plan",
            Phase::Implementation => "implementation",
            Phase::Review => "review",
            Phase::Operations => "operations",
            Phase::Evolution => "evolution",
        }
    }

    /// The pre-migration phase code (`D1_DISCOVERY`, ...)
    pub fn legacy_code(self) -> &'static str {
        match self {
            Phase::Discovery => "D1_DISCOVERY",
            Phase::Plan => "P1_PLAN",
            Phase::Implementation => "I1_IMPLEMENTATION",
            Phase::Review => "R1_REVIEW",
            Phase::Operations => "O1_OPERATIONS",
            Phase::Evolution => "E1_EVOLUTION",
        }
    }

    /// Gate code used as the key of the legacy gate map (`D1`, `P1`, ...)
    pub fn gate_code(self) -> &'static str {
        let code = self.legacy_code();
        &code[..2]
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ORDER
            .iter()
            .copied()
            .find(|p| p.as_str() == s || p.legacy_code() == s)
            .ok_or_else(|| format!("Unknown phase: {}", s))
    }
}

/// Work item type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemType {
    Feature,
    Enhancement,
    Bugfix,
    Research,
    Planning,
    Refactoring,
    Infrastructure,
    /// A value this build does not recognise; every transition is denied
    #[serde(other)]
    Unknown,
}

impl WorkItemType {
    pub const ALL: [WorkItemType; 7] = [
        WorkItemType::Feature,
        WorkItemType::Enhancement,
        WorkItemType::Bugfix,
        WorkItemType::Research,
        WorkItemType::Planning,
        WorkItemType::Refactoring,
        WorkItemType::Infrastructure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkItemType::Feature => "feature",
            WorkItemType::Enhancement => "enhancement",
            WorkItemType::Bugfix => "bugfix",
            WorkItemType::Research => "research",
            WorkItemType::Planning => "planning",
            WorkItemType::Refactoring => "refactoring",
            WorkItemType::Infrastructure => "infrastructure",
            WorkItemType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for WorkItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkItemType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown work item type: {}", s))
    }
}

/// Task type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Design,
    Implementation,
    Testing,
    Documentation,
    Bugfix,
    Research,
    Analysis,
    Planning,
    Deployment,
    Review,
    Refactoring,
    /// Lowest-ceremony task; exempt from structural metadata checks
    Simple,
    /// A value this build does not recognise; every transition is denied
    #[serde(other)]
    Unknown,
}

impl TaskType {
    pub const ALL: [TaskType; 12] = [
        TaskType::Design,
        TaskType::Implementation,
        TaskType::Testing,
        TaskType::Documentation,
        TaskType::Bugfix,
        TaskType::Research,
        TaskType::Analysis,
        TaskType::Planning,
        TaskType::Deployment,
        TaskType::Review,
        TaskType::Refactoring,
        TaskType::Simple,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Design => "design",
            TaskType::Implementation => "implementation",
            TaskType::Testing => "testing",
            TaskType::Documentation => "documentation",
            TaskType::Bugfix => "bugfix",
            TaskType::Research => "research",
            TaskType::Analysis => "analysis",
            TaskType::Planning => "planning",
            TaskType::Deployment => "deployment",
            TaskType::Review => "review",
            TaskType::Refactoring => "refactoring",
            TaskType::Simple => "simple",
            TaskType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown task type: {}", s))
    }
}
