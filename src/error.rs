//! Error types for testbatch-rs

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for testbatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for testbatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Regex error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// WalkDir error
    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// The directory to scan does not exist or is not a directory
    #[error("Test directory not found: {}", .path.display())]
    MissingDirectory { path: PathBuf },

    /// Unknown execution target
    #[error("invalid target: {target} should be one of <shell/desktop/browser>")]
    InvalidTarget { target: String },

    /// Batch size of zero
    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    /// The external command could not be started
    #[error("Failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

impl Error {
    /// Create a spawn error for the given command line
    pub fn spawn_error(command: impl Into<String>, source: std::io::Error) -> Self {
        Error::Spawn {
            command: command.into(),
            source,
        }
    }
}
