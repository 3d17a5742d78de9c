//! Mutation actions recorded in the session history.
//!
//! Every store-confirmed mutation is captured as one of these variants and
//! folded into the projection by the reducer. The same values replay during
//! undo and redo, so payloads carry full snapshots of the affected tasks as
//! they were when the action applied.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// A confirmed mutation, tagged for replay.
///
/// `Load` replaces the projection wholesale on the initial fetch and is
/// never recorded in history; the other five kinds are undoable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Action {
    Load {
        tasks: Vec<Task>,
    },

    /// The task as materialized by the store after creation.
    Add {
        task: Task,
    },

    /// Snapshot of the task at the time of deletion.
    Delete {
        task: Task,
    },

    /// `task` is the pre-update snapshot; only the changed field is present
    /// as the new value.
    Update {
        task: Task,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        completed: Option<bool>,
    },

    /// Snapshots of every task removed by the batch delete.
    ClearCompleted {
        tasks: Vec<Task>,
    },

    /// `completed` is the new value applied to all listed tasks.
    ToggleStatuses {
        tasks: Vec<Task>,
        completed: bool,
    },
}

impl Action {
    /// Stable tag for logs and previews.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Load { .. } => "load",
            Action::Add { .. } => "add",
            Action::Delete { .. } => "delete",
            Action::Update { .. } => "update",
            Action::ClearCompleted { .. } => "clearCompleted",
            Action::ToggleStatuses { .. } => "toggleStatuses",
        }
    }

    /// Load actions bypass the history entirely.
    pub fn is_recordable(&self) -> bool {
        !matches!(self, Action::Load { .. })
    }
}
