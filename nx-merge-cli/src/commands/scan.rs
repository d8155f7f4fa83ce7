use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::Level;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_merge_core::util::format_size;
use nx_merge_lib::{RawFile, Settings, Summary, TitleGroup};

use super::{display_path, scan_library};
use crate::error::CliError;

pub(crate) fn run_scan(
    root: Option<PathBuf>,
    settings: &Settings,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let (root, grouping) = scan_library(root, settings, !quiet && !json)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&grouping.to_output())?);
        return Ok(());
    }

    if grouping.is_empty() {
        log::warn!("No game files found in {}", root.display());
        return Ok(());
    }

    log::info!("");
    for group in grouping.groups() {
        print_group(&root, group);
    }

    print_summary(&Summary::from_grouping(&grouping));
    Ok(())
}

fn print_group(root: &Path, group: &TitleGroup) {
    let level = if group.has_base() { Level::Info } else { Level::Warn };
    log::log!(
        level,
        "{} {}",
        group.display_name().if_supports_color(Stdout, |t| t.bold()),
        format!("[{}]", group.id()).if_supports_color(Stdout, |t| t.dimmed()),
    );

    match group.base() {
        Some(base) => log::info!("  Base:   {}", describe(root, base)),
        None => log::warn!(
            "  Base:   {}",
            "missing".if_supports_color(Stdout, |t| t.red())
        ),
    }
    if let Some(update) = group.selected_update() {
        log::info!(
            "  Update: {}",
            describe(root, update).if_supports_color(Stdout, |t| t.cyan())
        );
    }
    if !group.dlcs().is_empty() {
        log::info!("  DLC:    {}", group.dlcs().len());
        for dlc in group.dlcs() {
            log::debug!("    {}", describe(root, dlc));
        }
    }
}

fn describe(root: &Path, file: &RawFile) -> String {
    let mut text = format!(
        "{} ({}",
        display_path(root, file.path()),
        format_size(file.size())
    );
    if log::log_enabled!(Level::Debug) {
        if let Some(modified) = file.modified() {
            text.push_str(&format!(", {}", format_time(modified)));
        }
    }
    text.push(')');
    text
}

fn format_time(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Local>::from(time)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn print_summary(summary: &Summary) {
    log::info!("");
    log::info!(
        "{}",
        "Summary".if_supports_color(Stdout, |t| t.bold())
    );
    log::info!("  Games:   {}", summary.groups);
    log::info!(
        "  Base:    {}",
        summary.bases.if_supports_color(Stdout, |t| t.green())
    );
    log::info!("  Updates: {}", summary.updates);
    log::info!("  DLC:     {}", summary.dlcs);

    if !summary.warnings.is_empty() {
        log::info!("");
        for warning in &summary.warnings {
            log::warn!(
                "  {} {}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                warning
            );
        }
    }
}
