use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_merge_lib::merge::{InputRole, MergePlan, plan_merge, plan_merges};
use nx_merge_lib::{SelectionError, Settings, select_group};

use super::{display_path, scan_library};
use crate::error::CliError;

pub(crate) fn run_plan(
    root: Option<PathBuf>,
    settings: &Settings,
    game: Option<String>,
    quiet: bool,
) -> Result<(), CliError> {
    let (root, grouping) = scan_library(root, settings, !quiet)?;

    let plans = match game {
        Some(query) => {
            let group = match select_group(&grouping, &query) {
                Ok(group) => group,
                Err(SelectionError::Ambiguous { query, candidates }) => {
                    log::warn!("'{}' matches more than one game:", query);
                    for candidate in &candidates {
                        log::warn!(
                            "  {} {}",
                            candidate.display_name.if_supports_color(Stdout, |t| t.bold()),
                            format!("[{}]", candidate.id).if_supports_color(Stdout, |t| t.dimmed()),
                        );
                    }
                    return Err(SelectionError::Ambiguous { query, candidates }.into());
                }
                Err(e) => return Err(e.into()),
            };
            vec![plan_merge(group, &settings.merge)?]
        }
        None => plan_merges(&grouping, &settings.merge),
    };

    if plans.is_empty() {
        log::warn!("No games with a base file to merge");
        return Ok(());
    }

    log::info!("");
    for plan in &plans {
        print_plan(&root, plan);
    }
    log::info!(
        "{} {} merge(s) planned",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        plans.len()
    );
    Ok(())
}

fn print_plan(root: &Path, plan: &MergePlan) {
    log::info!(
        "{} {}",
        plan.display_name.if_supports_color(Stdout, |t| t.bold()),
        format!("[{}]", plan.group_id).if_supports_color(Stdout, |t| t.dimmed()),
    );
    for input in &plan.inputs {
        let label = match input.role {
            InputRole::Base => "base  ",
            InputRole::Update => "update",
            InputRole::Dlc => "dlc   ",
        };
        log::info!(
            "  {} {}",
            label.if_supports_color(Stdout, |t| t.dimmed()),
            display_path(root, &input.path)
        );
    }
    log::info!(
        "  {} {}",
        "\u{2192}".if_supports_color(Stdout, |t| t.green()),
        plan.output_path
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    log::debug!("  work dir: {}", plan.work_dir.display());
    log::info!("");
}
