//! Counts and warnings over a finished grouping.

use std::fmt;

use crate::grouping::Grouping;

/// Something about a group the user should know before merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryWarning {
    /// Updates or DLC were found without a base game to merge them into
    NoBaseFile {
        group_id: String,
        display_name: String,
    },
}

impl fmt::Display for SummaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryWarning::NoBaseFile {
                group_id,
                display_name,
            } => write!(f, "{} ({}): no base game file", display_name, group_id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub groups: usize,
    pub bases: usize,
    /// Selected updates only, at most one per group
    pub updates: usize,
    pub dlcs: usize,
    pub warnings: Vec<SummaryWarning>,
}

impl Summary {
    pub fn from_grouping(grouping: &Grouping) -> Self {
        let mut summary = Summary::default();
        for group in grouping.groups() {
            summary.groups += 1;
            if group.has_base() {
                summary.bases += 1;
            } else {
                summary.warnings.push(SummaryWarning::NoBaseFile {
                    group_id: group.id(),
                    display_name: group.display_name().to_string(),
                });
            }
            if group.selected_update().is_some() {
                summary.updates += 1;
            }
            summary.dlcs += group.dlcs().len();
        }
        summary
    }

    pub fn mergeable(&self) -> usize {
        self.bases
    }
}
