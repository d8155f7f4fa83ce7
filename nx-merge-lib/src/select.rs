//! Explicit game selection by id or name.

use thiserror::Error;

use crate::grouping::{Grouping, TitleGroup};

/// A group that matched a selection query, for listing to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCandidate {
    pub id: String,
    pub display_name: String,
}

impl From<&TitleGroup> for GroupCandidate {
    fn from(group: &TitleGroup) -> Self {
        Self {
            id: group.id(),
            display_name: group.display_name().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("no game matches '{0}'")]
    NotFound(String),

    #[error("'{query}' matches {} games", candidates.len())]
    Ambiguous {
        query: String,
        candidates: Vec<GroupCandidate>,
    },
}

/// Groups that have a base file, in key order.
pub fn mergeable_groups(grouping: &Grouping) -> Vec<&TitleGroup> {
    grouping.mergeable().collect()
}

/// Select exactly one group whose id or display name contains `query`.
///
/// Matching ignores case. A group whose id or name equals the query wins
/// over groups that merely contain it. The selected group may lack a base
/// file; the caller decides what to do with it.
pub fn select_group<'a>(
    grouping: &'a Grouping,
    query: &str,
) -> Result<&'a TitleGroup, SelectionError> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(SelectionError::NotFound(query.to_string()));
    }

    let matches: Vec<&TitleGroup> = grouping
        .groups()
        .filter(|g| {
            g.id().to_lowercase().contains(&needle)
                || g.display_name().to_lowercase().contains(&needle)
        })
        .collect();

    let exact: Vec<&TitleGroup> = matches
        .iter()
        .copied()
        .filter(|g| {
            g.id().to_lowercase() == needle || g.display_name().to_lowercase() == needle
        })
        .collect();

    let chosen = if exact.is_empty() { matches } else { exact };
    match chosen.as_slice() {
        [] => Err(SelectionError::NotFound(query.to_string())),
        [single] => Ok(*single),
        many => Err(SelectionError::Ambiguous {
            query: query.to_string(),
            candidates: many.iter().map(|g| GroupCandidate::from(*g)).collect(),
        }),
    }
}

#[cfg(test)]
#[path = "tests/select_tests.rs"]
mod tests;
