//! Error types for blob store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing blobs.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key contains characters outside `[A-Za-z0-9_-]` or is empty.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// I/O operation on a blob file failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Stored bytes are not UTF-8.
    #[error("Blob {key} is not valid UTF-8")]
    NotUtf8 {
        /// Offending key.
        key: String,
    },

    /// Another thread panicked while holding the store lock.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
