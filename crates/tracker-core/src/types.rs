use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Sentinels
// ---------------------------------------------------------------------------

pub const NOT_SET: &str = "not set";
pub const UNKNOWN: &str = "unknown";

// ---------------------------------------------------------------------------
// WorkItemKind
// ---------------------------------------------------------------------------

/// Classification of a work item, derived from its resolved type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemKind {
    Requirement,
    UserStory,
    Task,
    Bug,
    Epic,
    Other,
}

impl WorkItemKind {
    /// Resolve a numeric tracker type code.
    pub fn from_code(code: i64) -> Self {
        match code {
            2 => WorkItemKind::Requirement,
            3 => WorkItemKind::UserStory,
            4 => WorkItemKind::Task,
            5 => WorkItemKind::Bug,
            6 => WorkItemKind::Epic,
            _ => WorkItemKind::Other,
        }
    }

    /// Classify a resolved type label. Labels that came from an embedded
    /// type object are matched case-insensitively, with `-`/`_` treated as
    /// spaces.
    pub fn from_label(label: &str) -> Self {
        let norm = label.trim().to_lowercase().replace(['-', '_'], " ");
        match norm.as_str() {
            "requirement" => WorkItemKind::Requirement,
            "user story" | "story" => WorkItemKind::UserStory,
            "task" => WorkItemKind::Task,
            "bug" | "defect" => WorkItemKind::Bug,
            "epic" => WorkItemKind::Epic,
            _ => WorkItemKind::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkItemKind::Requirement => "requirement",
            WorkItemKind::UserStory => "user story",
            WorkItemKind::Task => "task",
            WorkItemKind::Bug => "bug",
            WorkItemKind::Epic => "epic",
            WorkItemKind::Other => "work item",
        }
    }

    /// Conventional change-log prefix for commits closing this kind of item.
    pub fn commit_prefix(self) -> &'static str {
        match self {
            WorkItemKind::Bug => "fix",
            WorkItemKind::Requirement | WorkItemKind::UserStory | WorkItemKind::Epic => "feat",
            WorkItemKind::Task | WorkItemKind::Other => "chore",
        }
    }
}

impl fmt::Display for WorkItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// StateCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateCategory {
    Pending,
    InProgress,
    Done,
    Closed,
}

impl StateCategory {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(StateCategory::Pending),
            2 => Some(StateCategory::InProgress),
            3 => Some(StateCategory::Done),
            4 => Some(StateCategory::Closed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StateCategory::Pending => "pending",
            StateCategory::InProgress => "in progress",
            StateCategory::Done => "done",
            StateCategory::Closed => "closed",
        }
    }
}

impl fmt::Display for StateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Built-in priority ids shipped with every tracker tenant.
const PRIORITIES: &[(&str, &str)] = &[
    ("5cb9466afda1ce4ca0090001", "urgent"),
    ("5cb9466afda1ce4ca0090002", "high"),
    ("5cb9466afda1ce4ca0090003", "medium"),
    ("5cb9466afda1ce4ca0090004", "low"),
];

pub fn priority_label(id: &str) -> Option<&'static str> {
    PRIORITIES
        .iter()
        .find(|(pid, _)| *pid == id)
        .map(|(_, label)| *label)
}

// ---------------------------------------------------------------------------
// ReleaseState
// ---------------------------------------------------------------------------

pub fn release_state_label(code: i64) -> &'static str {
    match code {
        1 => "pending",
        2 => "in progress",
        3 => "released",
        4 => "closed",
        _ => UNKNOWN,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
