//! Merge planning and execution.
//!
//! Planning is pure: it turns a group into the list of inputs, an output
//! path and a work directory. Execution drives a [`ContainerTool`] over that
//! plan. The crate ships no real tool; callers bring their own.

use std::fmt;
use std::path::{Path, PathBuf};

use nx_merge_core::util::sanitize_file_name;
use nx_merge_core::extract_version;

use crate::error::{ExtractError, MergeError, PackError};
use crate::grouping::{Grouping, TitleGroup};
use crate::settings::MergeSettings;

/// External collaborator that unpacks and repacks container files.
pub trait ContainerTool {
    /// Unpack `container` into `dest_dir`, which already exists.
    fn extract(&self, container: &Path, dest_dir: &Path) -> Result<(), ExtractError>;

    /// Pack the contents of `dir` into a single container at `output`.
    fn repack(&self, dir: &Path, output: &Path) -> Result<(), PackError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    Base,
    Update,
    Dlc,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputRole::Base => write!(f, "base"),
            InputRole::Update => write!(f, "update"),
            InputRole::Dlc => write!(f, "dlc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeInput {
    pub role: InputRole,
    pub path: PathBuf,
}

/// Everything needed to merge one group, computed up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    pub group_id: String,
    pub display_name: String,
    /// Base first, then the selected update, then DLC in group order
    pub inputs: Vec<MergeInput>,
    pub output_path: PathBuf,
    pub work_dir: PathBuf,
}

impl MergePlan {
    pub fn base(&self) -> Option<&Path> {
        self.inputs
            .iter()
            .find(|i| i.role == InputRole::Base)
            .map(|i| i.path.as_path())
    }

    pub fn dlc_count(&self) -> usize {
        self.inputs.iter().filter(|i| i.role == InputRole::Dlc).count()
    }

    /// Extraction directory for the input at `index`: `<work_dir>/<index>-<role>`.
    pub fn extract_dir(&self, index: usize) -> Option<PathBuf> {
        self.inputs
            .get(index)
            .map(|input| self.work_dir.join(input_dir_name(index, input.role)))
    }
}

fn input_dir_name(index: usize, role: InputRole) -> String {
    format!("{}-{}", index, role)
}

/// Name of the merged file, e.g. `Zelda_v1.2.0_3DLC.xci`.
pub fn output_file_name(group: &TitleGroup, extension: &str) -> String {
    let mut stem = group.display_name().to_string();
    if let Some(update) = group.selected_update() {
        match extract_version(update.file_name()) {
            Some(version) => {
                stem.push_str("_v");
                stem.push_str(&version);
            }
            None => stem.push_str("_updated"),
        }
    }
    if !group.dlcs().is_empty() {
        stem.push_str(&format!("_{}DLC", group.dlcs().len()));
    }
    let extension = extension.trim_start_matches('.');
    sanitize_file_name(&format!("{}.{}", stem, extension))
}

pub fn plan_merge(group: &TitleGroup, settings: &MergeSettings) -> Result<MergePlan, MergeError> {
    let base = group
        .base()
        .ok_or_else(|| MergeError::no_base_file(group.id()))?;

    let mut inputs = vec![MergeInput {
        role: InputRole::Base,
        path: base.path().to_path_buf(),
    }];
    if let Some(update) = group.selected_update() {
        inputs.push(MergeInput {
            role: InputRole::Update,
            path: update.path().to_path_buf(),
        });
    }
    inputs.extend(group.dlcs().iter().map(|dlc| MergeInput {
        role: InputRole::Dlc,
        path: dlc.path().to_path_buf(),
    }));

    Ok(MergePlan {
        group_id: group.id(),
        display_name: group.display_name().to_string(),
        inputs,
        output_path: settings
            .output_dir
            .join(output_file_name(group, &settings.output_extension)),
        work_dir: settings
            .temp_dir
            .join(sanitize_file_name(group.display_name())),
    })
}

/// Plans for every group with a base file, in key order.
pub fn plan_merges(grouping: &Grouping, settings: &MergeSettings) -> Vec<MergePlan> {
    grouping
        .mergeable()
        .filter_map(|group| plan_merge(group, settings).ok())
        .collect()
}

/// Run a plan: extract every input, then repack into the output path.
///
/// Stops at the first collaborator error. The work directory is left in
/// place so a failed merge can be inspected.
pub fn execute_merge(plan: &MergePlan, tool: &dyn ContainerTool) -> Result<PathBuf, MergeError> {
    if plan.base().is_none() {
        return Err(MergeError::no_base_file(&plan.group_id));
    }

    std::fs::create_dir_all(&plan.work_dir)?;
    if let Some(parent) = plan.output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    for (index, input) in plan.inputs.iter().enumerate() {
        let dest = plan.work_dir.join(input_dir_name(index, input.role));
        std::fs::create_dir_all(&dest)?;
        log::debug!("Extracting {} -> {}", input.path.display(), dest.display());
        tool.extract(&input.path, &dest)?;
    }

    log::debug!(
        "Repacking {} -> {}",
        plan.work_dir.display(),
        plan.output_path.display()
    );
    tool.repack(&plan.work_dir, &plan.output_path)?;
    log::info!("Merged {} into {}", plan.display_name, plan.output_path.display());
    Ok(plan.output_path.clone())
}

#[cfg(test)]
#[path = "tests/merge_tests.rs"]
mod tests;
