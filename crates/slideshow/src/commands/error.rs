//! Error types for command execution

use thiserror::Error;

/// Command execution errors
#[derive(Debug, Error)]
pub enum CommandError {
    /// `settings set` argument without `=`
    #[error("Invalid assignment '{0}' (expected key=value)")]
    InvalidAssignment(String),

    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Input file is not valid JSON
    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: String,
        source: serde_json::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
