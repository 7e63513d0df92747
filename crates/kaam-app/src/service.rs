//! Synchronous service owning the task state and its persistence.

use kaam_core::{
    CollectionError, EditSession, Filter, SortOption, SubmitOutcome, Task, TaskCollection, TaskDraft,
    TaskId,
};
use tracing::{debug, info, warn};

use crate::config::ViewConfig;
use crate::state::{AppState, TaskRef};
use crate::task_store::TaskStore;

/// Service façade that encapsulates all task-related side effects.
///
/// Every successful mutation is followed by a best-effort save: a failing
/// store is logged and the in-memory state stays authoritative.
pub struct TaskService<S> {
    store: S,
    state: AppState,
}

impl<S: TaskStore> TaskService<S> {
    /// Load the persisted list once and start with the configured view.
    ///
    /// Missing data starts an empty list. Unreadable or malformed data is
    /// logged and also starts an empty list.
    pub fn open(store: S, view: ViewConfig) -> Self {
        let tasks = match store.load() {
            Ok(Some(tasks)) => tasks,
            Ok(None) => Vec::new(),
            Err(err) => {
                let err: anyhow::Error = err.into();
                warn!(error = %format!("{err:#}"), "Ignoring unreadable task list");
                Vec::new()
            }
        };
        info!(count = tasks.len(), "Loaded tasks");
        Self {
            store,
            state: AppState::new(TaskCollection::from(tasks), view.filter, view.sort),
        }
    }

    /// Append a task built from `draft`; `None` when text or priority is missing.
    pub fn add_task(&mut self, draft: &TaskDraft) -> Option<TaskId> {
        let Some(id) = self.state.collection.add(draft) else {
            debug!("Ignoring incomplete task draft");
            return None;
        };
        info!(task = %id, "Added task");
        self.persist();
        Some(id)
    }

    /// Flip completion of the referenced task, returning the new flag.
    ///
    /// # Errors
    /// Returns an error when the reference does not name a task.
    pub fn toggle_completion(&mut self, reference: TaskRef) -> Result<bool, CollectionError> {
        let id = self.state.resolve(reference)?;
        let completed = self.state.collection.toggle(id)?;
        info!(task = %id, completed, "Toggled task");
        self.persist();
        Ok(completed)
    }

    /// Remove the referenced task and return it.
    ///
    /// # Errors
    /// Returns an error when the reference does not name a task.
    pub fn delete_task(&mut self, reference: TaskRef) -> Result<Task, CollectionError> {
        let id = self.state.resolve(reference)?;
        let removed = self.state.collection.delete(id)?;
        info!(task = %id, "Deleted task");
        self.persist();
        Ok(removed)
    }

    /// Drop every completed task and return how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let removed = self.state.collection.clear_completed();
        if removed > 0 {
            info!(removed, "Cleared completed tasks");
            self.persist();
        }
        removed
    }

    /// Overwrite the fields of the referenced task without going through the
    /// edit session. Returns whether anything changed.
    ///
    /// # Errors
    /// Returns an error when the reference does not name a task.
    pub fn edit_task(&mut self, reference: TaskRef, draft: &TaskDraft) -> Result<bool, CollectionError> {
        let id = self.state.resolve(reference)?;
        let changed = self.state.collection.edit(id, draft)?;
        if changed {
            info!(task = %id, "Edited task");
            self.persist();
        }
        Ok(changed)
    }

    /// Put the form into edit mode for the referenced task.
    ///
    /// # Errors
    /// Returns an error when the reference does not name a task.
    pub fn begin_edit(&mut self, reference: TaskRef) -> Result<TaskId, CollectionError> {
        let id = self.state.resolve(reference)?;
        let task = self
            .state
            .collection
            .get(id)
            .ok_or(CollectionError::TaskNotFound(id))?;
        self.state.edit.begin_edit(task);
        debug!(task = %id, "Editing task");
        Ok(id)
    }

    /// Primary form action: add in idle mode, save in edit mode.
    ///
    /// # Errors
    /// Returns [`CollectionError::TaskNotFound`] when the edit target vanished.
    pub fn submit(&mut self) -> Result<SubmitOutcome, CollectionError> {
        let outcome = self.state.edit.submit(&mut self.state.collection)?;
        match outcome {
            SubmitOutcome::Created(id) => {
                info!(task = %id, "Added task");
                self.persist();
            }
            SubmitOutcome::Saved { id, changed: true } => {
                info!(task = %id, "Saved task");
                self.persist();
            }
            SubmitOutcome::Saved { changed: false, .. } | SubmitOutcome::Rejected => {}
        }
        Ok(outcome)
    }

    /// Leave edit mode and clear the form.
    pub fn cancel_edit(&mut self) {
        self.state.edit.cancel();
    }

    /// Resolve a reference against the current view.
    ///
    /// # Errors
    /// Returns an error when the reference does not name a task.
    pub fn resolve(&self, reference: TaskRef) -> Result<TaskId, CollectionError> {
        self.state.resolve(reference)
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(self.state.collection.as_slice()) {
            let err: anyhow::Error = err.into();
            warn!(error = %format!("{err:#}"), "Failed to save tasks");
        }
    }
}

impl<S> TaskService<S> {
    /// Change the filter stage.
    pub const fn set_filter(&mut self, filter: Filter) {
        self.state.filter = filter;
    }

    /// Change the sort stage.
    pub const fn set_sort(&mut self, sort: SortOption) {
        self.state.sort = sort;
    }

    /// Active filter.
    pub const fn filter(&self) -> Filter {
        self.state.filter
    }

    /// Active sort.
    pub const fn sort(&self) -> SortOption {
        self.state.sort
    }

    /// Displayed sequence.
    #[must_use]
    pub fn view(&self) -> Vec<&Task> {
        self.state.view()
    }

    /// Stored tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        self.state.collection.as_slice()
    }

    /// Whether any task is stored, regardless of the filter.
    #[must_use]
    pub fn has_tasks(&self) -> bool {
        !self.state.collection.is_empty()
    }

    /// Form fields and mode.
    pub const fn edit_session(&self) -> &EditSession {
        &self.state.edit
    }

    /// Mutable access to the form fields.
    pub const fn edit_session_mut(&mut self) -> &mut EditSession {
        &mut self.state.edit
    }

    /// Entire state, for rendering.
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}
