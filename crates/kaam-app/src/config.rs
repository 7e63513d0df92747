use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, anyhow, bail};
use kaam_core::{Filter, SortOption};
use serde::Deserialize;

const APP_DIR: &str = "kaam";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_KEY: &str = "tasks";
const DEFAULT_DELAY_MS: u64 = 500;

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Where tasks are persisted.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Simulated latency of add and delete.
    #[serde(default)]
    pub mutation: MutationConfig,
    /// Initial filter and sort.
    #[serde(default)]
    pub view: ViewConfig,
}

impl AppConfig {
    /// Load configuration from `explicit` when given, otherwise from the
    /// per-user config directory. A missing default file yields defaults.
    ///
    /// # Errors
    /// Returns an error if an explicitly requested file is missing, or if a
    /// file exists but cannot be read, parsed or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            return Self::from_path(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse and validate configuration text.
    ///
    /// # Errors
    /// Returns an error if the TOML is malformed or a value is invalid.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the configured data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.storage.data_dir = dir;
        }
        self
    }

    fn validate(&self) -> Result<()> {
        kaam_store::validate_key(&self.storage.key)
            .with_context(|| format!("storage.key {:?} is not a valid key", self.storage.key))
    }
}

/// Location of the default config file, if the platform has a config dir.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// `[storage]` block.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory for the blob files; the platform data dir when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Blob key holding the task list.
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            key: default_key(),
        }
    }
}

impl StorageConfig {
    /// Data directory to open, falling back to `<data-dir>/kaam`.
    ///
    /// # Errors
    /// Returns an error when no directory is configured and the platform has
    /// no data directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| anyhow!("no data directory available; set storage.data_dir or pass --data-dir"))
    }
}

fn default_key() -> String {
    DEFAULT_KEY.to_owned()
}

/// `[mutation]` block.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MutationConfig {
    /// Artificial delay applied to add and delete, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl MutationConfig {
    /// Delay as a [`Duration`].
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

const fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

/// `[view]` block.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    /// Filter applied at startup.
    #[serde(default)]
    pub filter: Filter,
    /// Sort applied at startup.
    #[serde(default)]
    pub sort: SortOption,
}
