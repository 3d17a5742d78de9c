//! Pure projection of actions onto the visible task list.
//!
//! The reducer sees only store-confirmed data with already-reconciled ids;
//! it performs no identifier resolution and no remote calls. Normal
//! application and undo/redo replay both flow through the same function, so
//! the visible list is always a fold of confirmed actions, never a second
//! source of truth.

use crate::action::Action;
use crate::task::Task;

/// Fold one action into the task list, returning the next list.
pub fn reduce(state: &[Task], action: &Action) -> Vec<Task> {
    match action {
        Action::Load { tasks } => tasks.clone(),

        Action::Add { task } => {
            let mut next = state.to_vec();
            next.push(task.clone());
            next
        }

        Action::Delete { task } => state
            .iter()
            .filter(|current| current.id != task.id)
            .cloned()
            .collect(),

        Action::Update {
            task,
            title,
            completed,
        } => state
            .iter()
            .map(|current| {
                if current.id != task.id {
                    return current.clone();
                }
                let mut updated = current.clone();
                if let Some(title) = title {
                    updated.title = title.clone();
                }
                if let Some(completed) = *completed {
                    updated.completed = completed;
                }
                updated
            })
            .collect(),

        Action::ClearCompleted { tasks } => state
            .iter()
            .filter(|current| !contains(tasks, current))
            .cloned()
            .collect(),

        Action::ToggleStatuses { tasks, completed } => state
            .iter()
            .map(|current| {
                if contains(tasks, current) {
                    let mut updated = current.clone();
                    updated.completed = *completed;
                    updated
                } else {
                    current.clone()
                }
            })
            .collect(),
    }
}

/// Batch payloads match by id: snapshots are immutable values and ids are
/// unique within a list.
fn contains(tasks: &[Task], candidate: &Task) -> bool {
    tasks.iter().any(|task| task.id == candidate.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskId;

    fn task(id: i64, title: &str, completed: bool) -> Task {
        Task::new(TaskId(id), title, completed)
    }

    #[test]
    fn load_replaces_state_wholesale() {
        let state = vec![task(1, "old", false)];
        let loaded = vec![task(2, "a", false), task(3, "b", true)];
        let next = reduce(
            &state,
            &Action::Load {
                tasks: loaded.clone(),
            },
        );
        assert_eq!(next, loaded);
    }

    #[test]
    fn add_appends_at_the_end() {
        let state = vec![task(1, "first", false)];
        let next = reduce(
            &state,
            &Action::Add {
                task: task(2, "second", false),
            },
        );
        assert_eq!(next.len(), 2);
        assert_eq!(next[1].id, TaskId(2));
    }

    #[test]
    fn delete_removes_only_the_matching_id() {
        let state = vec![task(1, "keep", false), task(2, "drop", true)];
        let next = reduce(
            &state,
            &Action::Delete {
                task: task(2, "drop", true),
            },
        );
        assert_eq!(next, vec![task(1, "keep", false)]);
    }

    #[test]
    fn update_touches_only_fields_present_in_the_payload() {
        let state = vec![task(1, "a", false)];
        let next = reduce(
            &state,
            &Action::Update {
                task: task(1, "a", false),
                title: None,
                completed: Some(true),
            },
        );
        assert_eq!(next, vec![task(1, "a", true)]);

        let next = reduce(
            &next,
            &Action::Update {
                task: task(1, "a", true),
                title: Some("b".to_string()),
                completed: None,
            },
        );
        assert_eq!(next, vec![task(1, "b", true)]);
    }

    #[test]
    fn update_leaves_other_tasks_untouched() {
        let state = vec![task(1, "a", false), task(2, "b", false)];
        let next = reduce(
            &state,
            &Action::Update {
                task: task(1, "a", false),
                title: Some("renamed".to_string()),
                completed: None,
            },
        );
        assert_eq!(next[1], task(2, "b", false));
    }

    #[test]
    fn clear_completed_removes_exactly_the_payload_tasks() {
        let state = vec![
            task(1, "pending", false),
            task(2, "done", true),
            task(3, "also done", true),
        ];
        let next = reduce(
            &state,
            &Action::ClearCompleted {
                tasks: vec![task(2, "done", true), task(3, "also done", true)],
            },
        );
        assert_eq!(next, vec![task(1, "pending", false)]);
    }

    #[test]
    fn toggle_sets_the_flag_on_payload_tasks_only() {
        let state = vec![task(1, "a", false), task(2, "b", false), task(3, "c", true)];
        let next = reduce(
            &state,
            &Action::ToggleStatuses {
                tasks: vec![task(1, "a", false), task(2, "b", false)],
                completed: true,
            },
        );
        assert!(next[0].completed);
        assert!(next[1].completed);
        assert!(next[2].completed);

        let next = reduce(
            &next,
            &Action::ToggleStatuses {
                tasks: vec![task(3, "c", true)],
                completed: false,
            },
        );
        assert!(next[0].completed);
        assert!(!next[2].completed);
    }

    #[test]
    fn reduce_does_not_mutate_its_input() {
        let state = vec![task(1, "a", false)];
        let _ = reduce(
            &state,
            &Action::Delete {
                task: task(1, "a", false),
            },
        );
        assert_eq!(state, vec![task(1, "a", false)]);
    }
}
