use std::sync::Arc;

use thiserror::Error;

use crate::id::TaskId;
use crate::task::{Task, TaskDraft};

/// Errors returned when a mutation addresses a task that is not there.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// No task carries the identifier.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// Position outside the sequence.
    #[error("index {index} is out of bounds for {len} task(s)")]
    IndexOutOfBounds {
        /// Requested position.
        index: usize,
        /// Length of the addressed sequence.
        len: usize,
    },
}

/// Ordered task list with copy-on-write mutations.
///
/// Every mutation builds a new sequence and swaps it in whole, so a
/// [`snapshot`](Self::snapshot) taken earlier keeps showing the state it was
/// taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskCollection {
    tasks: Arc<[Task]>,
}

impl From<Vec<Task>> for TaskCollection {
    fn from(tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks.into(),
        }
    }
}

impl TaskCollection {
    /// Empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the current sequence.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[Task]> {
        Arc::clone(&self.tasks)
    }

    /// Tasks in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the collection holds no task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look a task up by identifier.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Position of a task in insertion order.
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Identifier of the task at `index` in insertion order.
    ///
    /// # Errors
    /// Returns [`CollectionError::IndexOutOfBounds`] for positions past the end.
    pub fn id_at(&self, index: usize) -> Result<TaskId, CollectionError> {
        self.tasks
            .get(index)
            .map(|task| task.id)
            .ok_or(CollectionError::IndexOutOfBounds {
                index,
                len: self.tasks.len(),
            })
    }

    /// Append a new open task built from `draft`.
    ///
    /// Returns `None` without touching the collection when the draft lacks
    /// text or priority.
    pub fn add(&mut self, draft: &TaskDraft) -> Option<TaskId> {
        let (text, priority) = draft.ready_fields()?;
        let task = Task::new(text, priority, draft.due_date);
        let id = task.id;
        let mut next = self.tasks.to_vec();
        next.push(task);
        self.commit(next);
        Some(id)
    }

    /// Flip the completion flag and return the new value.
    ///
    /// # Errors
    /// Returns [`CollectionError::TaskNotFound`] when the task does not exist.
    pub fn toggle(&mut self, id: TaskId) -> Result<bool, CollectionError> {
        let index = self.require(id)?;
        let mut next = self.tasks.to_vec();
        let task = &mut next[index];
        task.completed = !task.completed;
        let completed = task.completed;
        self.commit(next);
        Ok(completed)
    }

    /// Remove a task, shifting later tasks back by one.
    ///
    /// # Errors
    /// Returns [`CollectionError::TaskNotFound`] when the task does not exist.
    pub fn delete(&mut self, id: TaskId) -> Result<Task, CollectionError> {
        let index = self.require(id)?;
        let mut next = self.tasks.to_vec();
        let removed = next.remove(index);
        self.commit(next);
        Ok(removed)
    }

    /// Drop every completed task and return how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        if !self.tasks.iter().any(|task| task.completed) {
            return 0;
        }
        let next: Vec<Task> = self.tasks.iter().filter(|task| !task.completed).cloned().collect();
        let removed = before - next.len();
        self.commit(next);
        removed
    }

    /// Replace text, priority and due date of a task, keeping its completion flag.
    ///
    /// Returns `Ok(true)` when a field changed. A draft without text or
    /// priority is ignored and yields `Ok(false)`.
    ///
    /// # Errors
    /// Returns [`CollectionError::TaskNotFound`] when the task does not exist.
    pub fn edit(&mut self, id: TaskId, draft: &TaskDraft) -> Result<bool, CollectionError> {
        let index = self.require(id)?;
        let Some((text, priority)) = draft.ready_fields() else {
            return Ok(false);
        };
        let current = &self.tasks[index];
        if current.text == text && current.priority == priority && current.due_date == draft.due_date {
            return Ok(false);
        }
        let mut next = self.tasks.to_vec();
        let task = &mut next[index];
        task.text = text;
        task.priority = priority;
        task.due_date = draft.due_date;
        self.commit(next);
        Ok(true)
    }

    fn require(&self, id: TaskId) -> Result<usize, CollectionError> {
        self.position(id).ok_or(CollectionError::TaskNotFound(id))
    }

    fn commit(&mut self, next: Vec<Task>) {
        self.tasks = next.into();
    }
}
