//! Session orchestration: forward mutations, undo, and redo.
//!
//! The session owns the visible projection, the action log, and the
//! reconciliation map. Every mutation round-trips through the gateway first;
//! the log, the map, and the projection change only after the store confirms
//! the call, so local state never runs ahead of the store on failure.
//!
//! Undo translates a historical action into its inverse remote mutation,
//! redo re-issues the forward one. Neither records history; they only move
//! the log cursor once the store has confirmed the replay.

use tracing::{debug, warn};

use crate::action::Action;
use crate::error::{Error, Result};
use crate::gateway::TaskGateway;
use crate::history::ActionLog;
use crate::reducer::reduce;
use crate::remap::IdMap;
use crate::task::{normalize_title, Task, TaskId, TaskPatch};

/// Visibility filter over the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
}

/// A single-user editing session over a remote task store.
pub struct TaskSession<G> {
    gateway: G,
    tasks: Vec<Task>,
    log: ActionLog,
    ids: IdMap,
}

impl<G: TaskGateway> TaskSession<G> {
    /// Start an empty session. Call [`load`](Self::load) to populate it.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            tasks: Vec::new(),
            log: ActionLog::new(),
            ids: IdMap::new(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Replace the projection with the store's current contents. Runs at
    /// session start and is never recorded in history.
    pub async fn load(&mut self) -> Result<()> {
        let tasks = confirmed("list", self.gateway.list().await)?;
        self.fold(Action::Load { tasks }, false);
        Ok(())
    }

    // Read surface

    /// The full projection, in order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn pending(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| !task.completed)
            .cloned()
            .collect()
    }

    pub fn completed(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.completed)
            .cloned()
            .collect()
    }

    pub fn visible(&self, filter: Filter) -> Vec<Task> {
        match filter {
            Filter::All => self.tasks.clone(),
            Filter::Pending => self.pending(),
            Filter::Completed => self.completed(),
        }
    }

    pub fn has_undo(&self) -> bool {
        self.log.has_undo()
    }

    pub fn has_redo(&self) -> bool {
        self.log.has_redo()
    }

    /// Read-only view of the action history.
    pub fn history(&self) -> &ActionLog {
        &self.log
    }

    /// JSON rendering of the action the next undo would revert, for display.
    pub fn undo_preview(&self) -> Result<Option<String>> {
        self.log
            .peek_undo()
            .map(serde_json::to_string_pretty)
            .transpose()
            .map_err(Error::from)
    }

    /// JSON rendering of the action the next redo would re-apply.
    pub fn redo_preview(&self) -> Result<Option<String>> {
        self.log
            .peek_redo()
            .map(serde_json::to_string_pretty)
            .transpose()
            .map_err(Error::from)
    }

    // Forward mutations

    /// Create a pending task from a raw title. Blank titles are rejected
    /// before any remote call.
    pub async fn add(&mut self, title: &str) -> Result<Task> {
        self.create_task(title, false, true).await
    }

    /// Delete a task from the visible list.
    pub async fn remove(&mut self, id: TaskId) -> Result<()> {
        let task = self.find_task(id)?.clone();
        self.delete_task(task, true).await
    }

    /// Change a task's title. Unchanged titles issue no remote call and
    /// record no history.
    pub async fn rename(&mut self, id: TaskId, new_title: &str) -> Result<()> {
        let new_title = normalize_title(new_title)?;
        let task = self.find_task(id)?.clone();
        if task.title == new_title {
            return Ok(());
        }
        self.change_title(task, new_title, true).await
    }

    /// Change a task's completion flag. Unchanged flags issue no remote call
    /// and record no history.
    pub async fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<()> {
        let task = self.find_task(id)?.clone();
        if task.completed == completed {
            return Ok(());
        }
        self.change_status(task, completed, true).await
    }

    /// Batch-delete every completed task. A no-op when nothing is completed.
    pub async fn clear_completed(&mut self) -> Result<()> {
        let targets = self.completed();
        if targets.is_empty() {
            return Ok(());
        }
        self.clear_tasks(targets, true).await
    }

    /// Mark every pending task completed (`completed = true`) or reopen
    /// every completed task (`completed = false`).
    ///
    /// Fails with [`Error::Conflict`] when the store's partition no longer
    /// matches this session's view; the caller should prompt for a refresh.
    pub async fn toggle_all(&mut self, completed: bool) -> Result<()> {
        let targets = if completed {
            self.pending()
        } else {
            self.completed()
        };
        self.toggle_tasks(targets, completed, true).await
    }

    // Undo / redo

    /// Revert the most recently applied action via its inverse remote
    /// mutation. The cursor moves only after the store confirms.
    pub async fn undo(&mut self) -> Result<()> {
        let action = self.log.peek_undo().cloned().ok_or(Error::NothingToUndo)?;
        debug!(kind = action.kind(), "undoing action");

        match action {
            // Load is never recorded; nothing to revert.
            Action::Load { .. } => {}

            Action::Add { task } => {
                if let Some(current) = self.resolve_task(&task) {
                    self.delete_task(current, false).await?;
                }
            }

            Action::Delete { task } => {
                let recreated = self
                    .create_task(&task.title, task.completed, false)
                    .await?;
                self.ids.remap(task.id, recreated.id);
            }

            Action::Update {
                task,
                title,
                completed,
            } => {
                if let Some(current) = self.resolve_task(&task) {
                    if title.is_some() {
                        self.change_title(current, task.title.clone(), false).await?;
                    } else if completed.is_some() {
                        self.change_status(current, task.completed, false).await?;
                    }
                }
            }

            Action::ClearCompleted { tasks } => {
                for task in &tasks {
                    let recreated = self
                        .create_task(&task.title, task.completed, false)
                        .await?;
                    self.ids.remap(task.id, recreated.id);
                }
            }

            Action::ToggleStatuses { tasks, completed } => {
                for task in &tasks {
                    if let Some(current) = self.resolve_task(task) {
                        self.change_status(current, !completed, false).await?;
                    }
                }
            }
        }

        self.log.step_back();
        Ok(())
    }

    /// Re-apply the most recently undone action. The cursor moves only after
    /// the store confirms.
    pub async fn redo(&mut self) -> Result<()> {
        let action = self.log.peek_redo().cloned().ok_or(Error::NothingToRedo)?;
        debug!(kind = action.kind(), "redoing action");

        match action {
            Action::Load { .. } => {}

            Action::Add { task } => {
                let recreated = self
                    .create_task(&task.title, task.completed, false)
                    .await?;
                self.ids.remap(task.id, recreated.id);
            }

            Action::Delete { task } => {
                if let Some(current) = self.resolve_task(&task) {
                    self.delete_task(current, false).await?;
                }
            }

            Action::Update {
                task,
                title,
                completed,
            } => {
                if let Some(current) = self.resolve_task(&task) {
                    if let Some(title) = title {
                        self.change_title(current, title, false).await?;
                    } else if let Some(completed) = completed {
                        self.change_status(current, completed, false).await?;
                    }
                }
            }

            // Re-collect the currently completed set rather than replaying
            // stale snapshots; ids may have been reconciled since.
            Action::ClearCompleted { .. } => {
                let targets = self.completed();
                if !targets.is_empty() {
                    self.clear_tasks(targets, false).await?;
                }
            }

            Action::ToggleStatuses { tasks, completed } => {
                for task in &tasks {
                    if let Some(current) = self.resolve_task(task) {
                        self.change_status(current, completed, false).await?;
                    }
                }
            }
        }

        self.log.step_forward();
        Ok(())
    }

    // Internals

    /// Apply a confirmed action to the projection, recording it unless the
    /// call is an undo/redo replay.
    fn fold(&mut self, action: Action, record: bool) {
        debug!(
            kind = action.kind(),
            record,
            tasks = self.tasks.len(),
            "folding action into projection"
        );
        self.tasks = reduce(&self.tasks, &action);
        if record && action.is_recordable() {
            self.log.push(action);
        }
    }

    fn find_task(&self, id: TaskId) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    /// Translate a historical snapshot into the live task it denotes, or
    /// `None` when that task no longer exists in the projection.
    fn resolve_task(&self, task: &Task) -> Option<Task> {
        let resolved = self.ids.resolve(task.id);
        let current = self.tasks.iter().find(|t| t.id == resolved).cloned();
        if current.is_none() {
            debug!(id = %task.id, resolved = %resolved, "task gone from projection; skipping");
        }
        current
    }

    async fn create_task(&mut self, title: &str, completed: bool, record: bool) -> Result<Task> {
        let title = normalize_title(title)?;
        let task = confirmed("create", self.gateway.create(&title, completed).await)?;
        self.fold(Action::Add { task: task.clone() }, record);
        Ok(task)
    }

    async fn delete_task(&mut self, task: Task, record: bool) -> Result<()> {
        confirmed("delete", self.gateway.delete(task.id).await)?;
        self.fold(Action::Delete { task }, record);
        Ok(())
    }

    async fn change_title(&mut self, task: Task, new_title: String, record: bool) -> Result<()> {
        let patch = TaskPatch::title(new_title.clone());
        confirmed("update", self.gateway.update(task.id, &patch).await)?;
        self.fold(
            Action::Update {
                task,
                title: Some(new_title),
                completed: None,
            },
            record,
        );
        Ok(())
    }

    async fn change_status(&mut self, task: Task, completed: bool, record: bool) -> Result<()> {
        let patch = TaskPatch::completed(completed);
        confirmed("update", self.gateway.update(task.id, &patch).await)?;
        self.fold(
            Action::Update {
                task,
                title: None,
                completed: Some(completed),
            },
            record,
        );
        Ok(())
    }

    async fn clear_tasks(&mut self, tasks: Vec<Task>, record: bool) -> Result<()> {
        let ids: Vec<TaskId> = tasks.iter().map(|task| task.id).collect();
        confirmed(
            "delete_completed",
            self.gateway.delete_completed(&ids).await,
        )?;
        self.fold(Action::ClearCompleted { tasks }, record);
        Ok(())
    }

    async fn toggle_tasks(&mut self, tasks: Vec<Task>, completed: bool, record: bool) -> Result<()> {
        let ids: Vec<TaskId> = tasks.iter().map(|task| task.id).collect();
        confirmed(
            "set_statuses",
            self.gateway.set_statuses(&ids, completed).await,
        )?;
        self.fold(Action::ToggleStatuses { tasks, completed }, record);
        Ok(())
    }
}

/// Log and pass through a remote-call result. A failure here means the
/// operation is abandoned with all local state untouched.
fn confirmed<T>(op: &'static str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        warn!(op, error = %err, "remote call failed; operation abandoned");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    async fn seeded() -> TaskSession<InMemoryStore> {
        let store = InMemoryStore::new();
        store.create("pending one", false).await.unwrap();
        store.create("done one", true).await.unwrap();
        store.create("pending two", false).await.unwrap();

        let mut session = TaskSession::new(store);
        session.load().await.unwrap();
        session
    }

    #[tokio::test]
    async fn load_populates_without_recording_history() {
        let session = seeded().await;
        assert_eq!(session.tasks().len(), 3);
        assert!(!session.has_undo());
        assert!(!session.has_redo());
    }

    #[tokio::test]
    async fn filters_partition_the_projection() {
        let session = seeded().await;
        assert_eq!(session.visible(Filter::All).len(), 3);
        assert_eq!(session.visible(Filter::Pending).len(), 2);
        assert_eq!(session.visible(Filter::Completed).len(), 1);

        let pending = session.pending();
        assert!(pending.iter().all(|task| !task.completed));
    }

    #[tokio::test]
    async fn blank_title_is_rejected_before_any_remote_call() {
        let mut session = seeded().await;
        session.gateway().set_offline(true).await;

        // The validation error wins over the transport error: nothing was
        // sent.
        let err = session.add("   ").await.unwrap_err();
        assert!(matches!(err, Error::EmptyTitle));
        assert!(!session.has_undo());
    }

    #[tokio::test]
    async fn unchanged_rename_is_a_local_no_op() {
        let mut session = seeded().await;
        let id = session.tasks()[0].id;
        let title = session.tasks()[0].title.clone();

        let completed = session.tasks()[0].completed;
        session.gateway().set_offline(true).await;
        session.rename(id, &title).await.unwrap();
        session.set_completed(id, completed).await.unwrap();
        assert!(!session.has_undo());
    }

    #[tokio::test]
    async fn previews_render_the_adjacent_actions() {
        let mut session = seeded().await;
        assert!(session.undo_preview().unwrap().is_none());

        session.add("Buy milk").await.unwrap();
        let preview = session.undo_preview().unwrap().unwrap();
        assert!(preview.contains("\"add\""));
        assert!(preview.contains("Buy milk"));
        assert!(session.redo_preview().unwrap().is_none());

        session.undo().await.unwrap();
        assert!(session.undo_preview().unwrap().is_none());
        let preview = session.redo_preview().unwrap().unwrap();
        assert!(preview.contains("\"add\""));
    }

    #[tokio::test]
    async fn undo_and_redo_on_empty_history_fail_fast() {
        let mut session = seeded().await;
        assert!(matches!(
            session.undo().await.unwrap_err(),
            Error::NothingToUndo
        ));
        assert!(matches!(
            session.redo().await.unwrap_err(),
            Error::NothingToRedo
        ));
    }
}
