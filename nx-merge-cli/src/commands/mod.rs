pub(crate) mod config;
pub(crate) mod plan;
pub(crate) mod scan;

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_merge_lib::settings::resolve_library_root;
use nx_merge_lib::{Grouping, ScanEvent, ScanOptions, Settings, scan_directory};

use crate::error::CliError;

/// Resolve the root, scan it and return the grouping.
///
/// With `show_progress` off nothing is printed, so stdout stays clean for
/// machine-readable output.
pub(crate) fn scan_library(
    root: Option<PathBuf>,
    settings: &Settings,
    show_progress: bool,
) -> Result<(PathBuf, Grouping), CliError> {
    let root = resolve_library_root(root, settings);
    if show_progress {
        log::info!(
            "Scanning games in: {}",
            root.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }

    let pb = if !show_progress {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("/-\\|"),
        );
        pb
    };

    let progress_callback = |event: ScanEvent| match event {
        ScanEvent::Walking { .. } => {
            pb.set_message("Walking directories");
            pb.tick();
        }
        ScanEvent::FileFound { count, .. } => {
            pb.set_message(format!("Found {count} container files"));
            pb.tick();
        }
        ScanEvent::FileSkipped { .. } | ScanEvent::FileDropped { .. } => {}
        ScanEvent::DirectoryGroupFormed { .. }
        | ScanEvent::NamesMerged { .. }
        | ScanEvent::UpdateSelected { .. } => {
            pb.set_message("Grouping");
            pb.tick();
        }
        ScanEvent::Done { .. } => {
            pb.finish_and_clear();
        }
    };

    let options = ScanOptions::from(&settings.scan);
    let result = scan_directory(&root, &options, &progress_callback);
    pb.finish_and_clear();
    Ok((root, result?))
}

/// Display a library file relative to the scan root when possible.
pub(crate) fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
