//! Store handle: where the SQLite file lives and how to connect to it.
//!
//! The handle owns no connection. Every operation opens its own and drops
//! it before returning, so concurrent requests only contend inside SQLite.

use crate::db::initialize::{apply_pragmas, init_schema};
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Connection settings shared by every operation on a [`Store`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub busy_timeout: Duration,
    /// Run all sub-batches of one insert inside a single transaction.
    pub atomic_ingest: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(5000),
            atomic_ingest: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Store {
    location: PathBuf,
    options: StoreOptions,
}

impl Store {
    /// Open (or create) the store at `location` with default options.
    pub fn initialize(location: impl AsRef<Path>) -> AppResult<Self> {
        Self::initialize_with(location, StoreOptions::default())
    }

    /// Open (or create) the store and make sure the schema exists.
    /// Safe to call on an already initialized store.
    pub fn initialize_with(location: impl AsRef<Path>, options: StoreOptions) -> AppResult<Self> {
        let store = Self {
            location: location.as_ref().to_path_buf(),
            options,
        };
        let conn = store.connect()?;
        init_schema(&conn).map_err(|e| store.unavailable(e))?;
        Ok(store)
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Open a fresh connection with the store's pragmas applied.
    pub fn connect(&self) -> AppResult<Connection> {
        let conn = Connection::open(&self.location).map_err(|e| self.unavailable(e))?;
        apply_pragmas(&conn, self.options.busy_timeout).map_err(|e| self.unavailable(e))?;
        Ok(conn)
    }

    /// Helper to execute a closure with a mutable connection reference.
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut conn = self.connect()?;
        func(&mut conn)
    }

    fn unavailable(&self, source: rusqlite::Error) -> AppError {
        AppError::StoreUnavailable {
            location: self.location.display().to_string(),
            source,
        }
    }
}
