//! Explicit application state shared by the CLI and TUI surfaces.

use std::{fmt, str::FromStr};

use kaam_core::{
    CollectionError, EditSession, Filter, SortOption, Task, TaskCollection, TaskId, derive,
};
use thiserror::Error;

/// Everything the surfaces render from.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Stored tasks in insertion order.
    pub collection: TaskCollection,
    /// Active filter.
    pub filter: Filter,
    /// Active sort.
    pub sort: SortOption,
    /// Form fields and edit mode.
    pub edit: EditSession,
}

impl AppState {
    /// State over `collection` with the given view settings.
    #[must_use]
    pub fn new(collection: TaskCollection, filter: Filter, sort: SortOption) -> Self {
        Self {
            collection,
            filter,
            sort,
            edit: EditSession::new(),
        }
    }

    /// Displayed sequence under the current filter and sort.
    #[must_use]
    pub fn view(&self) -> Vec<&Task> {
        derive(self.collection.as_slice(), self.filter, self.sort)
    }

    /// Resolve a reference to the id of a stored task.
    ///
    /// Displayed indices are looked up in [`view`](Self::view), not in the
    /// stored order.
    ///
    /// # Errors
    /// Returns [`CollectionError::IndexOutOfBounds`] for indices past the
    /// view, or [`CollectionError::TaskNotFound`] for unknown ids.
    pub fn resolve(&self, reference: TaskRef) -> Result<TaskId, CollectionError> {
        match reference {
            TaskRef::Id(id) => self
                .collection
                .get(id)
                .map(|task| task.id)
                .ok_or(CollectionError::TaskNotFound(id)),
            TaskRef::Displayed(index) => {
                let view = self.view();
                view.get(index)
                    .map(|task| task.id)
                    .ok_or(CollectionError::IndexOutOfBounds {
                        index,
                        len: view.len(),
                    })
            }
        }
    }
}

/// A task as named by a user: a stable id or a position in the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRef {
    /// Zero-based position in the displayed sequence.
    Displayed(usize),
    /// Stable identity.
    Id(TaskId),
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Displayed(index) => write!(f, "#{index}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Raised when a task reference is neither an index nor an id.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected a task id or a displayed index, got {0:?}")]
pub struct ParseTaskRefError(pub String);

impl FromStr for TaskRef {
    type Err = ParseTaskRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if let Ok(index) = digits.parse::<usize>() {
            return Ok(Self::Displayed(index));
        }
        trimmed
            .parse::<TaskId>()
            .map(Self::Id)
            .map_err(|_| ParseTaskRefError(s.to_owned()))
    }
}
