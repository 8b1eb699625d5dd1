use crate::db::StoreOptions;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, warn};

/// Default config path, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "conf.yml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// `host:port` the HTTP endpoint binds to.
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Commit all sub-batches of one `/store` request together.
    #[serde(default)]
    pub atomic_ingest: bool,
}

fn default_address() -> String {
    "localhost:8080".to_string()
}
fn default_sqlite_path() -> String {
    "resh-sync.sqlite".to_string()
}
fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: default_address(),
            sqlite_path: default_sqlite_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            atomic_ingest: false,
        }
    }
}

impl Config {
    /// Load configuration from file, or return defaults if it is missing
    /// or cannot be parsed.
    pub fn load(path: &Path) -> Self {
        match Self::load_strict(path) {
            Ok(cfg) => cfg,
            Err(AppError::ConfigLoad(_)) => {
                warn!(config_file = %path.display(), "configuration file not readable, using defaults");
                Self::default()
            }
            Err(e) => {
                error!(config_file = %path.display(), error = %e, "configuration file invalid, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from file, failing on any read or parse error.
    pub fn load_strict(path: &Path) -> AppResult<Self> {
        let content =
            fs::read_to_string(path).map_err(|_| AppError::ConfigLoad(path.display().to_string()))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn database_file(&self) -> PathBuf {
        PathBuf::from(&self.sqlite_path)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            atomic_ingest: self.atomic_ingest,
        }
    }
}
