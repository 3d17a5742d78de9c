//! Task snapshots and identifiers.
//!
//! A task is an immutable value snapshot of a store row: the session never
//! mutates one in place, it rebuilds the visible list through the reducer.
//! Identity is the store-assigned id; two snapshots describe the same entity
//! iff their ids are equal (after reconciliation, see `remap`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Store-assigned task identifier.
///
/// Minted by the store on creation and never reused. Identifiers recorded in
/// historical action payloads can go stale once a task is recreated by an
/// undo or redo; `remap::IdMap` translates them back to live ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for TaskId {
    fn from(raw: i64) -> Self {
        TaskId(raw)
    }
}

/// A task as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
        }
    }
}

/// Partial update sent to the store; absent fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Patch carrying only a new title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    /// Patch carrying only a new completion flag.
    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

/// Trim a candidate title, rejecting titles that are empty after the trim.
///
/// Runs before any remote call; a rejected title never produces an action.
pub fn normalize_title(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(normalize_title("  Buy milk  ").unwrap(), "Buy milk");
    }

    #[test]
    fn normalize_rejects_blank_titles() {
        assert!(matches!(normalize_title(""), Err(Error::EmptyTitle)));
        assert!(matches!(normalize_title("   "), Err(Error::EmptyTitle)));
        assert!(matches!(normalize_title("\t\n"), Err(Error::EmptyTitle)));
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = TaskPatch::completed(true);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "completed": true }));

        let patch = TaskPatch::title("Walk the dog");
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "Walk the dog" }));
    }

    #[test]
    fn task_id_round_trips_as_plain_number() {
        let id: TaskId = serde_json::from_str("17").unwrap();
        assert_eq!(id, TaskId(17));
        assert_eq!(serde_json::to_string(&id).unwrap(), "17");
    }
}
