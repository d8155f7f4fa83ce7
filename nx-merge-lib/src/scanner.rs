//! Directory scan driver.
//!
//! Walks a library root recursively, keeps regular files with a recognised
//! container extension, reads their metadata once and hands the snapshot to
//! the grouping engine.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use nx_merge_core::{CoreError, DEFAULT_EXTENSIONS, DirScope, RawFile};
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::grouping::{Grouping, group_files};
use crate::progress::ScanEvent;
use crate::settings::ScanSettings;

/// What to look for while scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Lowercase extensions without the dot
    pub extensions: HashSet<String>,
    pub dir_scope: DirScope,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: extension_set(DEFAULT_EXTENSIONS),
            dir_scope: DirScope::default(),
        }
    }
}

impl From<&ScanSettings> for ScanOptions {
    fn from(settings: &ScanSettings) -> Self {
        let exts: Vec<&str> = settings.extensions.iter().map(String::as_str).collect();
        Self {
            extensions: extension_set(&exts),
            dir_scope: settings.dir_scope,
        }
    }
}

/// Build a lowercase extension set, tolerating a leading dot (`.nsp`).
pub fn extension_set(extensions: &[&str]) -> HashSet<String> {
    extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect()
}

/// Check if a path has an extension in the allowed set.
fn has_matching_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase()))
        .unwrap_or(false)
}

fn check_root(root: &Path) -> Result<(), ScanError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::NotADirectory(root.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ScanError::RootNotFound(root.to_path_buf()))
        }
        Err(e) => Err(ScanError::Io(e)),
    }
}

/// Recursively collect container files below `root`, sorted by path.
///
/// Entries that cannot be read are logged and skipped; only a missing or
/// unreadable root is fatal.
pub fn collect_container_paths(
    root: &Path,
    extensions: &HashSet<String>,
    progress: &dyn Fn(ScanEvent),
) -> Result<Vec<PathBuf>, ScanError> {
    check_root(root)?;
    progress(ScanEvent::Walking {
        root: root.to_path_buf(),
    });

    let mut paths = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                log::warn!("Skipping {}: {}", path.display(), e);
                progress(ScanEvent::FileSkipped {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if entry.file_type().is_file() && has_matching_extension(entry.path(), extensions) {
            let path = entry.into_path();
            progress(ScanEvent::FileFound {
                path: path.clone(),
                count: paths.len() + 1,
            });
            paths.push(path);
        }
    }

    paths.sort();
    log::debug!("Found {} container files under {}", paths.len(), root.display());
    Ok(paths)
}

/// Read size and mtime for one file and build its record.
pub fn read_raw_file(root: &Path, path: &Path, scope: DirScope) -> Result<RawFile, CoreError> {
    let meta = std::fs::metadata(path).map_err(|e| CoreError::metadata(path, e))?;
    if !meta.is_file() {
        return Err(CoreError::NotAFile(path.to_path_buf()));
    }
    Ok(RawFile::new(root, path, meta.len(), meta.modified().ok(), scope))
}

/// Build records for every path, skipping files whose metadata is unreadable.
pub fn read_raw_files(
    root: &Path,
    paths: &[PathBuf],
    scope: DirScope,
    progress: &dyn Fn(ScanEvent),
) -> Vec<RawFile> {
    paths
        .iter()
        .filter_map(|path| match read_raw_file(root, path, scope) {
            Ok(file) => Some(file),
            Err(e) => {
                log::warn!("{}", e);
                progress(ScanEvent::FileSkipped {
                    path: e.path().to_path_buf(),
                    reason: e.to_string(),
                });
                None
            }
        })
        .collect()
}

/// Scan a library root and group everything found in it.
pub fn scan_directory(
    root: &Path,
    options: &ScanOptions,
    progress: &dyn Fn(ScanEvent),
) -> Result<Grouping, ScanError> {
    let paths = collect_container_paths(root, &options.extensions, progress)?;
    let files = read_raw_files(root, &paths, options.dir_scope, progress);
    log::debug!("Read metadata for {} of {} files", files.len(), paths.len());
    Ok(group_files(&files, progress))
}
