//! Error types for settings persistence

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a settings backend
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// File I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Stored record is not valid JSON or does not match the record schema
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to acquire the write lock after multiple retries
    #[error("Failed to acquire lock on {path} after {retries} retries")]
    LockTimeout { path: PathBuf, retries: u32 },

    /// Backend cannot be reached at all
    #[error("Settings store unavailable: {message}")]
    Unavailable { message: String },
}
