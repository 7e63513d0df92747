use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::id::TaskId;
use crate::priority::Priority;

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identity; stored tasks without one receive a fresh id on load.
    #[serde(default = "TaskId::new")]
    pub id: TaskId,
    /// Display text, never blank.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
    /// Importance.
    pub priority: Priority,
    /// Calendar date the task is due, if any.
    #[serde(default, with = "due_date_serde", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
}

impl Task {
    /// Build an open task with a fresh identifier.
    pub fn new(text: impl Into<String>, priority: Priority, due_date: Option<Date>) -> Self {
        Self {
            id: TaskId::new(),
            text: text.into(),
            completed: false,
            priority,
            due_date,
        }
    }

    /// Classify the due date against `today`.
    #[must_use]
    pub fn due_status(&self, today: Date) -> Option<DueStatus> {
        self.due_date.map(|due| DueStatus::classify(due, today))
    }
}

/// Where a due date falls relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// The date has passed.
    Overdue,
    /// Due today.
    DueToday,
    /// Due in the future.
    Upcoming,
}

impl DueStatus {
    /// Compare `due` with `today`.
    #[must_use]
    pub fn classify(due: Date, today: Date) -> Self {
        match due.cmp(&today) {
            std::cmp::Ordering::Less => Self::Overdue,
            std::cmp::Ordering::Equal => Self::DueToday,
            std::cmp::Ordering::Greater => Self::Upcoming,
        }
    }
}

/// Staged form values for a task that is being created or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Text as typed; may be empty.
    pub text: String,
    /// `None` is the empty "choose priority" option.
    pub priority: Option<Priority>,
    /// Optional due date.
    pub due_date: Option<Date>,
}

impl TaskDraft {
    /// Construct a draft from raw field values.
    pub fn new(text: impl Into<String>, priority: Option<Priority>, due_date: Option<Date>) -> Self {
        Self {
            text: text.into(),
            priority,
            due_date,
        }
    }

    /// Copy the editable fields of an existing task.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            text: task.text.clone(),
            priority: Some(task.priority),
            due_date: task.due_date,
        }
    }

    /// Whether both required fields are filled.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready_fields().is_some()
    }

    /// Whether no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.priority.is_none() && self.due_date.is_none()
    }

    /// Reset every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Text as typed and priority when the draft is ready.
    ///
    /// Whitespace-only text counts as empty but is never stripped from
    /// text that has other characters.
    pub(crate) fn ready_fields(&self) -> Option<(String, Priority)> {
        if self.text.trim().is_empty() {
            return None;
        }
        self.priority.map(|priority| (self.text.clone(), priority))
    }
}

/// Errors raised while reading a due date typed by the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DueDateError {
    /// Not a `YYYY-MM-DD` date.
    #[error("invalid due date '{0}' (expected YYYY-MM-DD)")]
    Invalid(String),
    /// Earlier than the first selectable day.
    #[error("due date {date} is before {min}")]
    BeforeMinimum {
        /// Rejected date.
        date: Date,
        /// First allowed date.
        min: Date,
    },
}

/// Current local calendar date, falling back to UTC when the offset is unknown.
#[must_use]
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
/// Returns [`DueDateError::Invalid`] when the input is not a calendar date.
pub fn parse_date(raw: &str) -> Result<Date, DueDateError> {
    let trimmed = raw.trim();
    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .map_err(|_| DueDateError::Invalid(trimmed.to_owned()))
}

/// Parse a due date entered in a form, where blank means "no due date"
/// and dates before `min` cannot be picked.
///
/// # Errors
/// Returns an error for malformed dates or dates before `min`.
pub fn parse_due_input(raw: &str, min: Date) -> Result<Option<Date>, DueDateError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let date = parse_date(raw)?;
    if date < min {
        return Err(DueDateError::BeforeMinimum { date, min });
    }
    Ok(Some(date))
}

/// Format a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

mod due_date_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    #[allow(clippy::ref_option)]
    pub(super) fn serialize<S>(value: &Option<Date>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => s.serialize_str(&super::format_date(*date)),
            None => s.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D>(d: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        // An empty string is how a cleared date picker is stored.
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_date(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
