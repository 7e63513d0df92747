//! CLI entry point for kaam.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kaam_app::{AppConfig, BlobTaskStore, TaskRef, TaskService};
use kaam_core::{Filter, Priority, SortOption};
use kaam_store::{BlobStore, FileBlobStore, MemoryBlobStore};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;
mod tui;

const LOG_FILE_NAME: &str = "kaam.log";

/// Blob-backed task store shared by every surface.
type SharedTaskStore = BlobTaskStore<Arc<dyn BlobStore + Send + Sync>>;

/// Task list with priorities, due dates, filters and sorting.
#[derive(Parser, Debug)]
#[command(name = "kaam", version, about = "kaam: a terminal task list")]
struct Cli {
    /// Config file (defaults to <config-dir>/kaam/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the task list; overrides `storage.data_dir`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep tasks in memory only; nothing is read from or written to disk.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    cmd: Option<Command>,
}

/// Filter and sort under which displayed indices are counted.
#[derive(Args, Debug, Clone, Copy, Default)]
struct ViewArgs {
    /// All, Active or Completed (defaults to the configured filter).
    #[arg(long)]
    filter: Option<Filter>,
    /// Default, "Task Name", Priority or "Due Date" (defaults to the configured sort).
    #[arg(long)]
    sort: Option<SortOption>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task.
    Add {
        #[arg(long)]
        text: String,
        /// Low, Medium or High.
        #[arg(long)]
        priority: Priority,
        /// Due date as YYYY-MM-DD, today or later.
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks in display order.
    Ls {
        #[command(flatten)]
        view: ViewArgs,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Flip a task between open and completed.
    Toggle {
        /// Task id or displayed index.
        selector: TaskRef,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Delete a task.
    Rm {
        /// Task id or displayed index.
        selector: TaskRef,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Change the text, priority or due date of a task.
    Edit {
        /// Task id or displayed index.
        selector: TaskRef,
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        /// New due date as YYYY-MM-DD, today or later.
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
    },

    /// Delete every completed task.
    ClearCompleted,

    /// Launch interactive terminal UI (the default).
    Tui,
}

fn main() -> Result<()> {
    let Cli {
        config,
        data_dir,
        ephemeral,
        cmd,
    } = Cli::parse();
    let cmd = cmd.unwrap_or(Command::Tui);

    let config = AppConfig::load(config.as_deref())?.with_data_dir(data_dir);

    let _log_guard = if matches!(cmd, Command::Tui) {
        init_file_logging(&log_dir(&config))
    } else {
        install_tracing();
        None
    };

    let store = open_store(&config, ephemeral)?;
    execute_command(cmd, store, &config)
}

fn execute_command(command: Command, store: SharedTaskStore, config: &AppConfig) -> Result<()> {
    match command {
        Command::Tui => tui::run(store, config),
        other => {
            let mut service = TaskService::open(store, config.view);
            commands::run(other, &mut service)
        }
    }
}

fn open_store(config: &AppConfig, ephemeral: bool) -> Result<SharedTaskStore> {
    let blobs: Arc<dyn BlobStore + Send + Sync> = if ephemeral {
        Arc::new(MemoryBlobStore::new())
    } else {
        let dir = config.storage.resolve_data_dir()?;
        let store = FileBlobStore::open(&dir)
            .with_context(|| format!("failed to open data directory {}", dir.display()))?;
        Arc::new(store)
    };
    Ok(BlobTaskStore::new(blobs, config.storage.key.clone()))
}

fn log_dir(config: &AppConfig) -> PathBuf {
    config
        .storage
        .resolve_data_dir()
        .unwrap_or_else(|_| std::env::temp_dir())
}

fn install_tracing() {
    // RUST_LOG replaces the default INFO level. Logs go to stderr so stdout stays parseable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

/// Route logs to `<dir>/kaam.log` while the TUI owns the terminal.
///
/// The returned guard flushes buffered entries on drop and must be held until
/// shutdown.
fn init_file_logging(dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(dir).ok()?;
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
