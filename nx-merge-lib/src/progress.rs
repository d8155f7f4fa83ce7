use std::path::PathBuf;

/// Progress and diagnostics emitted while scanning and grouping.
///
/// Consumers pass a `&dyn Fn(ScanEvent)`; the library never prints.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// Walking the scan root has started
    Walking { root: PathBuf },
    /// A candidate container file was found
    FileFound { path: PathBuf, count: usize },
    /// A file was skipped because its metadata could not be read
    FileSkipped { path: PathBuf, reason: String },
    /// A file had neither a title ID nor a parent directory
    FileDropped { path: PathBuf },
    /// Files from several title IDs in one directory became one group
    DirectoryGroupFormed { dir: String, members: usize },
    /// Groups with the same normalized name were merged
    NamesMerged {
        name: String,
        group_ids: Vec<String>,
    },
    /// One update was kept out of several candidates
    UpdateSelected {
        group_id: String,
        file_name: String,
        candidates: usize,
    },
    /// Grouping finished
    Done { groups: usize },
}

/// Reporter that discards every event.
pub fn ignore_events(_: ScanEvent) {}
