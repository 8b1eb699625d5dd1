//! Unified application error type.
//! All modules (db, core, server, cli) return AppError to keep the error
//! handling consistent and easy to map onto HTTP status codes.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store-related
    // ---------------------------
    #[error("Store unavailable at {location}: {source}")]
    StoreUnavailable {
        location: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Write failure: {0}")]
    WriteFailure(#[source] rusqlite::Error),

    #[error("Read failure: {0}")]
    ReadFailure(#[source] rusqlite::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Input errors
    // ---------------------------
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    /// One entry per rejected watermark, formatted as `device=value`.
    #[error("Invalid watermark: {}", .0.join(", "))]
    InvalidWatermark(Vec<String>),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration from {0}")]
    ConfigLoad(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True for errors caused by the caller's input (HTTP 4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::MalformedInput(_)
                | AppError::MalformedTimestamp(_)
                | AppError::InvalidWatermark(_)
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::MalformedInput(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
