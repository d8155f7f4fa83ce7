use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a whole scan.
///
/// Problems with individual files are not errors at this level: they are
/// logged and reported through `ScanEvent::FileSkipped`.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root does not exist
    #[error("scan root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The scan root exists but is not a directory
    #[error("scan root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// I/O error while reading the scan root itself
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error reported by a container extractor.
#[derive(Debug, Error)]
#[error("failed to extract {}: {message}", path.display())]
pub struct ExtractError {
    pub path: PathBuf,
    pub message: String,
}

impl ExtractError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Error reported by a container repackager.
#[derive(Debug, Error)]
#[error("failed to repack into {}: {message}", path.display())]
pub struct PackError {
    pub path: PathBuf,
    pub message: String,
}

impl PackError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors from planning or executing a merge.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The group has updates/DLC but nothing to merge them into
    #[error("group '{group_id}' has no base game file")]
    NoBaseFile { group_id: String },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Pack(#[from] PackError),

    /// I/O error preparing work or output directories
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MergeError {
    pub fn no_base_file(group_id: impl Into<String>) -> Self {
        Self::NoBaseFile {
            group_id: group_id.into(),
        }
    }
}
