use nx_merge_lib::{MergeError, ScanError, SelectionError};
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Scan(#[from] ScanError),

    #[error("{0}")]
    Selection(#[from] SelectionError),

    #[error("{0}")]
    Merge(#[from] MergeError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Output serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
