//! Remote mutation gateway consumed by the session.
//!
//! The transport (HTTP client, routing, auth) lives behind this trait; the
//! core only ever sees materialized tasks or failure signals. Every mutation
//! round-trips here before any local state changes.

use async_trait::async_trait;

use crate::error::Result;
use crate::task::{Task, TaskId, TaskPatch};

/// Store boundary for the session.
///
/// Calls are independent: the gateway guarantees neither ordering between
/// overlapping requests nor retries. A request, once issued, runs to
/// completion or failure.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// Fetch all tasks owned by the session.
    async fn list(&self) -> Result<Vec<Task>>;

    /// Create a task; the store mints the id.
    async fn create(&self, title: &str, completed: bool) -> Result<Task>;

    /// Partially update a task; absent patch fields stay unchanged.
    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task>;

    /// Delete a task.
    async fn delete(&self, id: TaskId) -> Result<()>;

    /// Delete the completed tasks among `ids`; other ids are skipped.
    async fn delete_completed(&self, ids: &[TaskId]) -> Result<()>;

    /// Set the completion flag on all of `ids`. Fails with
    /// [`Error::Conflict`](crate::Error::Conflict) when `ids` no longer
    /// matches the store's view of the affected partition (stale client).
    async fn set_statuses(&self, ids: &[TaskId], completed: bool) -> Result<()>;
}
