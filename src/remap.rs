//! Identifier reconciliation across undo/redo recreations.
//!
//! Undoing a delete (or redoing an add) recreates the task remotely, and the
//! store mints a fresh id. The map records old -> new so identifiers embedded
//! in historical action payloads can be translated to ids that are valid in
//! the current task list. Repeated delete/undo cycles of the same logical
//! task chain the mappings; resolution follows the chain to its end. Chains
//! cannot cycle because every remap target is a freshly minted id.

use std::collections::HashMap;

use crate::task::TaskId;

#[derive(Debug, Clone, Default)]
pub struct IdMap {
    mappings: HashMap<TaskId, TaskId>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `old` is now known to the store as `new`.
    pub fn remap(&mut self, old: TaskId, new: TaskId) {
        self.mappings.insert(old, new);
    }

    /// Follow the remap chain from `id` to the most recent identifier.
    /// Ids that were never remapped resolve to themselves.
    pub fn resolve(&self, id: TaskId) -> TaskId {
        let mut current = id;
        while let Some(&next) = self.mappings.get(&current) {
            current = next;
        }
        current
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
