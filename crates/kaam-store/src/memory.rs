use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::{BlobStore, validate_key};

/// In-process blob store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one blob.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] for invalid keys.
    pub fn with_entry(key: &str, value: impl Into<String>) -> Result<Self, StoreError> {
        let store = Self::new();
        store.set(key, &value.into())?;
        Ok(store)
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        let entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
