//! Scanning, grouping and merge planning for Switch container libraries.

pub mod error;
pub mod grouping;
pub mod merge;
pub mod progress;
pub mod scanner;
pub mod select;
pub mod settings;
pub mod summary;

pub use error::{ExtractError, MergeError, PackError, ScanError};
pub use grouping::{GroupKey, GroupOutput, Grouping, TitleGroup, group_files};
pub use merge::{
    ContainerTool, InputRole, MergeInput, MergePlan, execute_merge, plan_merge, plan_merges,
};
pub use progress::{ScanEvent, ignore_events};
pub use scanner::{ScanOptions, scan_directory};
pub use select::{GroupCandidate, SelectionError, mergeable_groups, select_group};
pub use settings::{MergeSettings, ScanSettings, Settings};
pub use summary::{Summary, SummaryWarning};

// Re-export core types so callers need only one dependency
pub use nx_merge_core::{DirScope, Kind, RawFile, TitleId, Version};
