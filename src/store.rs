//! In-memory task store.
//!
//! Mirrors the observable behavior of the remote store for tests and local
//! development: monotonically minted ids, an `active` column whose negation
//! is the client-facing `completed` flag, and a freshness-checked batch
//! status update. State lives behind a `tokio` mutex so the store can be
//! shared across concurrent callers.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::gateway::TaskGateway;
use crate::task::{Task, TaskId, TaskPatch};

/// Persisted row shape. The store keeps `active` (pending = true); clients
/// see its negation as `completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: TaskId,
    pub title: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn to_task(&self) -> Task {
        Task {
            id: self.id,
            title: self.title.clone(),
            completed: !self.active,
        }
    }
}

#[derive(Debug)]
struct StoreState {
    rows: Vec<TaskRow>,
    next_id: i64,
    offline: bool,
}

impl StoreState {
    fn ensure_online(&self) -> Result<()> {
        if self.offline {
            return Err(Error::Transport("store offline".to_string()));
        }
        Ok(())
    }

    fn mint_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    fn row_mut(&mut self, id: TaskId) -> Result<&mut TaskRow> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(Error::TaskNotFound(id))
    }
}

/// In-memory implementation of the remote store boundary.
#[derive(Debug)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                rows: Vec::new(),
                next_id: 1,
                offline: false,
            }),
        }
    }

    /// Make every subsequent call fail with a transport error (and back).
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    /// Snapshot of the persisted rows, in creation order.
    pub async fn rows(&self) -> Vec<TaskRow> {
        self.state.lock().await.rows.clone()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskGateway for InMemoryStore {
    async fn list(&self) -> Result<Vec<Task>> {
        let state = self.state.lock().await;
        state.ensure_online()?;
        Ok(state.rows.iter().map(TaskRow::to_task).collect())
    }

    async fn create(&self, title: &str, completed: bool) -> Result<Task> {
        let mut state = self.state.lock().await;
        state.ensure_online()?;
        if title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }

        let now = Utc::now();
        let row = TaskRow {
            id: state.mint_id(),
            title: title.to_string(),
            active: !completed,
            created_at: now,
            updated_at: now,
        };
        let task = row.to_task();
        state.rows.push(row);
        Ok(task)
    }

    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        let mut state = self.state.lock().await;
        state.ensure_online()?;

        let row = state.row_mut(id)?;
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(Error::EmptyTitle);
            }
            row.title = title.clone();
        }
        if let Some(completed) = patch.completed {
            row.active = !completed;
        }
        row.updated_at = Utc::now();
        Ok(row.to_task())
    }

    async fn delete(&self, id: TaskId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_online()?;

        let before = state.rows.len();
        state.rows.retain(|row| row.id != id);
        if state.rows.len() == before {
            return Err(Error::TaskNotFound(id));
        }
        Ok(())
    }

    async fn delete_completed(&self, ids: &[TaskId]) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_online()?;

        // Ids that are missing or still pending are silently excluded.
        let requested: HashSet<TaskId> = ids.iter().copied().collect();
        state
            .rows
            .retain(|row| row.active || !requested.contains(&row.id));
        Ok(())
    }

    async fn set_statuses(&self, ids: &[TaskId], completed: bool) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_online()?;

        // Freshness check: the request must name exactly the tasks currently
        // in the source partition (pending when completing, completed when
        // reopening). Any mismatch means the client's view is stale.
        let source: HashSet<TaskId> = state
            .rows
            .iter()
            .filter(|row| row.active == completed)
            .map(|row| row.id)
            .collect();
        let requested: HashSet<TaskId> = ids.iter().copied().collect();
        if requested != source {
            return Err(Error::Conflict);
        }

        let now = Utc::now();
        for row in state.rows.iter_mut() {
            if requested.contains(&row.id) {
                row.active = !completed;
                row.updated_at = now;
            }
        }
        Ok(())
    }
}
