//! Task operations.

use super::Store;
use crate::subscriptions::MutationKind;
use crate::types::{new_id, now_ms, ExtractedTask, Priority, SubTask, Task};
use anyhow::Result;
use tracing::debug;

/// Provenance tag stamped on tasks synthesized from journal content.
pub const JOURNAL_PROVENANCE: &str = "Generated from Journal";

impl Store {
    /// Create a task from user text and prepend it to the collection.
    pub fn create_task(&self, text: impl Into<String>) -> Result<Task> {
        let task = Task {
            id: new_id(),
            text: text.into(),
            completed: false,
            priority: Priority::Medium,
            created_at: now_ms(),
            subtasks: None,
            ai_analysis: None,
        };
        let created = task.clone();
        self.mutate(MutationKind::TaskChanged, move |inner| {
            inner.tasks.insert(0, task);
            ((), true)
        })?;
        Ok(created)
    }

    /// Flip a task's `completed` flag. Absent id is a no-op.
    pub fn toggle_task(&self, id: &str) -> Result<bool> {
        self.mutate(MutationKind::TaskChanged, |inner| {
            match inner.tasks.iter_mut().find(|t| t.id == id) {
                Some(task) => {
                    task.completed = !task.completed;
                    (true, true)
                }
                None => {
                    debug!(task_id = id, "toggle_task target absent");
                    (false, false)
                }
            }
        })
    }

    /// Remove a task by id. Absent id is a no-op.
    pub fn delete_task(&self, id: &str) -> Result<bool> {
        self.mutate(MutationKind::TaskChanged, |inner| {
            let before = inner.tasks.len();
            inner.tasks.retain(|t| t.id != id);
            let removed = inner.tasks.len() != before;
            (removed, removed)
        })
    }

    /// Replace the stored task with the same id wholesale. If the id no
    /// longer exists the update is dropped, never resurrecting a task that
    /// was deleted concurrently.
    pub fn update_task(&self, task: Task) -> Result<bool> {
        self.mutate(MutationKind::TaskChanged, move |inner| {
            match inner.tasks.iter_mut().find(|t| t.id == task.id) {
                Some(slot) => {
                    *slot = task;
                    (true, true)
                }
                None => {
                    debug!(task_id = %task.id, "update_task target absent, dropping");
                    (false, false)
                }
            }
        })
    }

    /// Advance a task's priority one step in the cycle. Returns the new
    /// priority, or `None` if the task is gone.
    pub fn cycle_task_priority(&self, id: &str) -> Result<Option<Priority>> {
        self.mutate(MutationKind::TaskChanged, |inner| {
            match inner.tasks.iter_mut().find(|t| t.id == id) {
                Some(task) => {
                    task.priority = task.priority.cycled();
                    (Some(task.priority), true)
                }
                None => (None, false),
            }
        })
    }

    /// Flip one subtask's `completed` flag. No-op if the task or subtask
    /// is absent.
    pub fn toggle_subtask(&self, task_id: &str, subtask_id: &str) -> Result<bool> {
        self.mutate(MutationKind::TaskChanged, |inner| {
            let Some(task) = inner.tasks.iter_mut().find(|t| t.id == task_id) else {
                return (false, false);
            };
            let Some(sub) = task
                .subtasks
                .as_mut()
                .and_then(|subs| subs.iter_mut().find(|s| s.id == subtask_id))
            else {
                return (false, false);
            };
            sub.completed = !sub.completed;
            (true, true)
        })
    }

    /// Create one task per extracted item, stamped with the journal
    /// provenance tag and prepended in order. Purely additive: calling this
    /// twice with the same items produces two sets of tasks (duplicate
    /// suppression is out of scope).
    pub fn append_extracted_tasks(&self, items: Vec<ExtractedTask>) -> Result<Vec<Task>> {
        let now = now_ms();
        let new_tasks: Vec<Task> = items
            .into_iter()
            .map(|item| Task {
                id: new_id(),
                text: item.text,
                completed: false,
                priority: item.priority,
                created_at: now,
                subtasks: None,
                ai_analysis: Some(JOURNAL_PROVENANCE.to_string()),
            })
            .collect();
        if new_tasks.is_empty() {
            return Ok(Vec::new());
        }
        let created = new_tasks.clone();
        self.mutate(MutationKind::TaskChanged, move |inner| {
            inner.tasks.splice(0..0, new_tasks);
            ((), true)
        })?;
        Ok(created)
    }

    /// Set a task's subtasks iff it currently has none (populate-once).
    /// Racing breakdown requests cannot double-populate: the second arrival
    /// finds the list set and drops its result.
    pub fn populate_subtasks(&self, task_id: &str, steps: Vec<String>) -> Result<bool> {
        self.mutate(MutationKind::TaskChanged, |inner| {
            let Some(task) = inner.tasks.iter_mut().find(|t| t.id == task_id) else {
                debug!(task_id, "populate_subtasks target absent");
                return (false, false);
            };
            if task.subtasks.as_ref().is_some_and(|s| !s.is_empty()) {
                debug!(task_id, "subtasks already populated, dropping breakdown");
                return (false, false);
            }
            task.subtasks = Some(
                steps
                    .into_iter()
                    .map(|text| SubTask {
                        id: new_id(),
                        text,
                        completed: false,
                    })
                    .collect(),
            );
            (true, true)
        })
    }

    /// Snapshot of all tasks, most-recently-created first.
    pub fn tasks(&self) -> Vec<Task> {
        self.read(|inner| inner.tasks.clone())
    }

    /// Look up a single task by id.
    pub fn get_task(&self, id: &str) -> Option<Task> {
        self.read(|inner| inner.tasks.iter().find(|t| t.id == id).cloned())
    }
}
