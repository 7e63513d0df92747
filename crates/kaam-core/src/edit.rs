//! Create/edit mode of the task form.

use crate::collection::{CollectionError, TaskCollection};
use crate::id::TaskId;
use crate::priority::Priority;
use crate::task::{Task, TaskDraft};

/// Whether the form creates a task or edits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// New-task mode.
    #[default]
    Idle,
    /// Editing the identified task.
    Editing(TaskId),
}

/// Result of the form's primary action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A task was appended.
    Created(TaskId),
    /// The edit target was written back; `changed` is false when every field matched.
    Saved {
        /// Edited task.
        id: TaskId,
        /// Whether a field differed from the stored task.
        changed: bool,
    },
    /// Text or priority was missing; nothing happened.
    Rejected,
}

/// Staged form fields plus the current mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    mode: EditMode,
    draft: TaskDraft,
}

impl EditSession {
    /// Idle session with empty fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> EditMode {
        self.mode
    }

    /// Task being edited, if any.
    #[must_use]
    pub const fn target(&self) -> Option<TaskId> {
        match self.mode {
            EditMode::Idle => None,
            EditMode::Editing(id) => Some(id),
        }
    }

    /// Whether the session is editing an existing task.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self.mode, EditMode::Editing(_))
    }

    /// Staged field values.
    #[must_use]
    pub const fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    /// Label of the primary action button.
    #[must_use]
    pub const fn primary_label(&self) -> &'static str {
        if self.is_editing() { "Save Task" } else { "Add Task" }
    }

    /// Stage a new text value.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    /// Stage a new priority (`None` is the empty choice).
    pub const fn set_priority(&mut self, priority: Option<Priority>) {
        self.draft.priority = priority;
    }

    /// Replace all staged fields at once.
    pub fn set_draft(&mut self, draft: TaskDraft) {
        self.draft = draft;
    }

    /// Enter edit mode for `task`, copying its fields over whatever was staged.
    pub fn begin_edit(&mut self, task: &Task) {
        self.mode = EditMode::Editing(task.id);
        self.draft = TaskDraft::from_task(task);
    }

    /// Leave edit mode and clear the staged fields.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Whether the staged fields would be accepted by [`submit`](Self::submit).
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.draft.is_ready()
    }

    /// Primary action: save when editing, otherwise add a new task.
    ///
    /// Incomplete drafts are ignored and leave the session untouched.
    ///
    /// # Errors
    /// Returns [`CollectionError::TaskNotFound`] when the edit target was
    /// removed in the meantime; the session is reset to idle in that case.
    pub fn submit(&mut self, collection: &mut TaskCollection) -> Result<SubmitOutcome, CollectionError> {
        if !self.draft.is_ready() {
            return Ok(SubmitOutcome::Rejected);
        }
        match self.mode {
            EditMode::Idle => {
                let Some(id) = collection.add(&self.draft) else {
                    return Ok(SubmitOutcome::Rejected);
                };
                self.draft.clear();
                Ok(SubmitOutcome::Created(id))
            }
            EditMode::Editing(id) => {
                let result = collection.edit(id, &self.draft);
                self.reset();
                let changed = result?;
                Ok(SubmitOutcome::Saved { id, changed })
            }
        }
    }

    fn reset(&mut self) {
        self.mode = EditMode::Idle;
        self.draft.clear();
    }
}
