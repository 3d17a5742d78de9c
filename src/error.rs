//! Error types for tasklist
//!
//! Remote-call failures short-circuit before any local mutation: the action
//! log, reconciliation map, and task projection change only after the store
//! confirms the corresponding call.

use thiserror::Error;

use crate::task::TaskId;

/// Main error type for session operations
#[derive(Error, Debug)]
pub enum Error {
    // Rejected locally, before any remote call
    #[error("Task title must not be empty")]
    EmptyTitle,

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    // Store-side failures
    #[error("Batch status change raced with another mutation; refresh and retry")]
    Conflict,

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the failure happened before the request left the client.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::EmptyTitle
                | Error::TaskNotFound(_)
                | Error::NothingToUndo
                | Error::NothingToRedo
        )
    }
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, Error>;
