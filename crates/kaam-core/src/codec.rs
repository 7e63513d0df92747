//! JSON layout of the persisted task list.

use thiserror::Error;

use crate::task::Task;

/// Errors raised while decoding or encoding the stored task list.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The blob is not a JSON array of task records.
    #[error("malformed task list: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A record carries blank text.
    #[error("task #{index} has empty text")]
    EmptyText {
        /// Position of the offending record.
        index: usize,
    },
}

/// Decode a stored blob into tasks, validating every record.
///
/// # Errors
/// Returns [`CodecError`] when the blob does not match the layout.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, CodecError> {
    let tasks: Vec<Task> = serde_json::from_str(raw)?;
    if let Some(index) = tasks.iter().position(|task| task.text.trim().is_empty()) {
        return Err(CodecError::EmptyText { index });
    }
    Ok(tasks)
}

/// Encode tasks into the stored layout.
///
/// # Errors
/// Returns [`CodecError::Malformed`] if serialization fails.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(tasks)?)
}
