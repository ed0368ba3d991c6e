//! Configuration for taskdeck.
//!
//! Configuration can be set via environment variables:
//! - `TASKDECK_FILE` - Optional. Path of the backing task file. Defaults to
//!   `tasks.json` in the working directory.
//!
//! The `--file` command-line flag takes precedence over the environment.

use std::path::PathBuf;

/// Default task file, relative to the working directory.
pub const DEFAULT_STORE_FILE: &str = "tasks.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the backing task file.
    pub store_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults. Nothing here can fail: every variable is optional.
    pub fn from_env() -> Self {
        let store_path = std::env::var_os("TASKDECK_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE));
        Self { store_path }
    }
}
