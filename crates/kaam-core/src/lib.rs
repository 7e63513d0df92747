//! Domain types and pure logic for kaam task lists.
//!
//! The crate holds the task collection, the filter/sort pipeline that derives
//! the displayed sequence, and the create/edit state machine of the task form.
//! Nothing here performs I/O.

/// Persisted layout codec.
pub mod codec;
/// Ordered, copy-on-write task collection.
pub mod collection;
/// Form state machine.
pub mod edit;
/// Identifier types.
pub mod id;
/// Task priority.
pub mod priority;
/// Task records and staged drafts.
pub mod task;
/// Filter and sort pipeline.
pub mod view;

pub use codec::{CodecError, decode_tasks, encode_tasks};
pub use collection::{CollectionError, TaskCollection};
pub use edit::{EditMode, EditSession, SubmitOutcome};
pub use id::TaskId;
pub use priority::{ParsePriorityError, Priority};
pub use task::{DueDateError, DueStatus, Task, TaskDraft, format_date, parse_date, parse_due_input, today};
pub use view::{Filter, SortOption, ViewParseError, derive, locale_cmp};
