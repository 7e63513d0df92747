//! Key-value blob storage for kaam.
//!
//! The application persists its whole task list as one serialized blob under
//! a fixed key. This crate knows nothing about tasks: it stores strings.

mod error;
mod file;
mod memory;

use std::sync::Arc;

pub use error::StoreError;
pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;

/// Minimal key-value contract used by the task persistence adapter.
pub trait BlobStore {
    /// Read the blob stored under `key`.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the key is invalid or the read fails.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the key is invalid or the write fails.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<B: BlobStore + ?Sized> BlobStore for Arc<B> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Check that `key` is non-empty and only uses `[A-Za-z0-9_-]`.
///
/// # Errors
/// Returns [`StoreError::InvalidKey`] otherwise.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}
