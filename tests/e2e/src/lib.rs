//! Helpers for driving the `kaam` binary against a throwaway data directory.

use std::path::Path;
use std::process::{Command, Output};

use anyhow::{Context, Result, anyhow};
use assert_cmd::cargo::CommandCargoExt;
use serde_json::Value;
use tempfile::TempDir;

/// A `kaam` data directory that lives for the duration of a test.
pub struct KaamHarness {
    temp: TempDir,
}

impl KaamHarness {
    /// Create an empty data directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("failed to create temp dir")?;
        Ok(Self { temp })
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.temp.path()
    }

    /// Run `kaam` with `args` and return the raw process output.
    ///
    /// # Errors
    ///
    /// Returns an error when the binary cannot be located or spawned.
    pub fn run(&self, args: &[&str]) -> Result<Output> {
        let mut cmd = Command::cargo_bin("kaam")?;
        cmd.arg("--data-dir")
            .arg(self.data_dir())
            .args(args)
            .env("RUST_LOG", "warn");
        cmd.output().context("failed to run kaam")
    }

    /// Run `kaam` and return stdout, failing on a non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error when the process fails or prints invalid UTF-8.
    pub fn run_ok(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(anyhow!(
                "kaam {args:?} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            ));
        }
        String::from_utf8(output.stdout).context("stdout is not UTF-8")
    }

    /// `kaam ls --json` plus `extra` flags, parsed.
    ///
    /// # Errors
    ///
    /// Returns an error when the command fails or prints something other than a JSON array.
    pub fn list(&self, extra: &[&str]) -> Result<Vec<Value>> {
        let mut args = vec!["ls", "--json"];
        args.extend_from_slice(extra);
        let stdout = self.run_ok(&args)?;
        match serde_json::from_str(&stdout).with_context(|| format!("invalid json: {stdout}"))? {
            Value::Array(items) => Ok(items),
            other => Err(anyhow!("expected a JSON array, got {other}")),
        }
    }
}

/// Text of each listed task, in display order.
#[must_use]
pub fn texts(tasks: &[Value]) -> Vec<String> {
    tasks
        .iter()
        .filter_map(|task| task.get("text").and_then(Value::as_str))
        .map(str::to_owned)
        .collect()
}
