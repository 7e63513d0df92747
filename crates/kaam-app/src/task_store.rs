//! Persistence adapter between the task collection and a blob store.

use anyhow::Error;
use kaam_core::{CodecError, Task, decode_tasks, encode_tasks};
use kaam_store::{BlobStore, StoreError};
use thiserror::Error;
use tracing::debug;

/// Minimal storage abstraction required by [`crate::TaskService`].
pub trait TaskStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error>;

    /// Read the persisted task list, `None` when nothing was stored yet.
    ///
    /// # Errors
    /// Returns a store-specific error when reading or decoding fails.
    fn load(&self) -> Result<Option<Vec<Task>>, Self::Error>;

    /// Replace the persisted task list.
    ///
    /// # Errors
    /// Returns a store-specific error when encoding or writing fails.
    fn save(&self, tasks: &[Task]) -> Result<(), Self::Error>;
}

/// Errors raised by [`BlobTaskStore`].
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// The blob store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The stored blob is not a valid task list.
    #[error("stored task list is malformed: {0}")]
    Codec(#[from] CodecError),
}

/// Task list kept as one JSON blob under a fixed key.
#[derive(Debug, Clone)]
pub struct BlobTaskStore<B> {
    blobs: B,
    key: String,
}

impl<B: BlobStore> BlobTaskStore<B> {
    /// Wrap `blobs`, reading and writing under `key`.
    pub fn new(blobs: B, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    /// Blob key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying blob store.
    pub const fn blobs(&self) -> &B {
        &self.blobs
    }
}

impl<B: BlobStore> TaskStore for BlobTaskStore<B> {
    type Error = TaskStoreError;

    fn load(&self) -> Result<Option<Vec<Task>>, Self::Error> {
        let Some(raw) = self.blobs.get(&self.key)? else {
            debug!(key = %self.key, "No stored task list");
            return Ok(None);
        };
        let tasks = decode_tasks(&raw)?;
        debug!(key = %self.key, count = tasks.len(), "Loaded task list");
        Ok(Some(tasks))
    }

    fn save(&self, tasks: &[Task]) -> Result<(), Self::Error> {
        let raw = encode_tasks(tasks)?;
        self.blobs.set(&self.key, &raw)?;
        debug!(key = %self.key, count = tasks.len(), "Saved task list");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaam_core::Priority;
    use kaam_store::MemoryBlobStore;

    #[test]
    fn missing_blob_loads_as_none() {
        let store = BlobTaskStore::new(MemoryBlobStore::new(), "tasks");
        assert!(matches!(store.load(), Ok(None)));
    }

    #[test]
    fn save_then_load() {
        let store = BlobTaskStore::new(MemoryBlobStore::new(), "tasks");
        let tasks = vec![Task::new("Buy milk", Priority::High, None)];
        store.save(&tasks).unwrap_or_else(|err| panic!("save: {err}"));
        let loaded = store.load().unwrap_or_else(|err| panic!("load: {err}"));
        assert_eq!(loaded, Some(tasks));
    }

    #[test]
    fn malformed_blob_is_a_codec_error() {
        let blobs = MemoryBlobStore::with_entry("tasks", "{not json").unwrap_or_else(|err| panic!("{err}"));
        let store = BlobTaskStore::new(blobs, "tasks");
        assert!(matches!(store.load(), Err(TaskStoreError::Codec(_))));
    }

    #[test]
    fn writes_under_configured_key() {
        let store = BlobTaskStore::new(MemoryBlobStore::new(), "work");
        store.save(&[]).unwrap_or_else(|err| panic!("save: {err}"));
        assert_eq!(store.blobs().get("work").ok(), Some(Some("[]".to_owned())));
        assert_eq!(store.blobs().get("tasks").ok(), Some(None));
        assert_eq!(store.key(), "work");
    }
}
