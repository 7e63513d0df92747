//! Application layer for kaam.
//!
//! This crate owns configuration, the explicit application state, and the
//! services that apply mutations and persist them. Both the CLI and the TUI
//! go through it.

pub mod async_service;
pub mod config;
pub mod service;
pub mod state;
pub mod task_store;

// Re-exports for convenience
pub use async_service::{AsyncTaskService, MutationError};
pub use config::{AppConfig, MutationConfig, StorageConfig, ViewConfig, default_config_path};
pub use service::TaskService;
pub use state::{AppState, ParseTaskRefError, TaskRef};
pub use task_store::{BlobTaskStore, TaskStore, TaskStoreError};
