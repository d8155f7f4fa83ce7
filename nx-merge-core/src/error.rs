use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building per-file records.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Reading size/mtime for a single file failed (permissions, vanished file)
    #[error("cannot read metadata for {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path is not a regular file
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
}

impl CoreError {
    pub fn metadata(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Metadata {
            path: path.into(),
            source,
        }
    }

    /// The path this error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Metadata { path, .. } | Self::NotAFile(path) => path,
        }
    }
}
