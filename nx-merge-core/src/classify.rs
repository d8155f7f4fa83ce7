//! Base / update / DLC classification.
//!
//! Classification walks an ordered rule list and the first matching rule
//! decides. DLC rules come before update rules, so a file that looks like
//! both (e.g. `Game_dlc_update.nsp`) is DLC. Anything unmatched is a base game.
//!
//! The DLC keyword is looked for in the whole root-relative path, update
//! keywords only in the file name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::TitleId;

/// The role a container plays for its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Base,
    Update,
    Dlc,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Base => "base",
            Kind::Update => "update",
            Kind::Dlc => "dlc",
        })
    }
}

/// Substrings (lowercase) that mark a file as an update.
pub const UPDATE_KEYWORDS: &[&str] = &["upd", "update", "更新", "patch", "补丁", "v1.", "v2."];

/// Substring (lowercase) that marks a file as DLC.
pub const DLC_KEYWORD: &str = "dlc";

/// Lower-cased view of a file, shared by every rule.
struct Subject<'a> {
    file_name: String,
    path: String,
    title_id: Option<&'a TitleId>,
}

impl Subject<'_> {
    /// Somewhere in the file name or the root-relative path.
    fn mentions(&self, needle: &str) -> bool {
        self.file_name.contains(needle) || self.path.contains(needle)
    }

    /// In the file name itself.
    fn names(&self, needle: &str) -> bool {
        self.file_name.contains(needle)
    }
}

/// A single classification rule.
pub struct Rule {
    pub name: &'static str,
    pub kind: Kind,
    test: fn(&Subject<'_>) -> bool,
}

fn dlc_keyword(s: &Subject<'_>) -> bool {
    s.mentions(DLC_KEYWORD)
}

fn dlc_identifier(s: &Subject<'_>) -> bool {
    s.title_id.is_some_and(TitleId::is_dlc)
}

fn update_keyword(s: &Subject<'_>) -> bool {
    UPDATE_KEYWORDS.iter().any(|kw| s.names(kw))
}

fn update_identifier(s: &Subject<'_>) -> bool {
    s.title_id.is_some_and(TitleId::is_update)
}

/// Rules in precedence order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "dlc keyword",
        kind: Kind::Dlc,
        test: dlc_keyword,
    },
    Rule {
        name: "dlc title id",
        kind: Kind::Dlc,
        test: dlc_identifier,
    },
    Rule {
        name: "update keyword",
        kind: Kind::Update,
        test: update_keyword,
    },
    Rule {
        name: "update title id",
        kind: Kind::Update,
        test: update_identifier,
    },
];

/// Find the first rule matching a file, if any.
///
/// `path` is the file's path relative to the scan root, so keywords in the
/// directories above the library do not leak into classification.
pub fn matching_rule(
    file_name: &str,
    path: &str,
    title_id: Option<&TitleId>,
) -> Option<&'static Rule> {
    let subject = Subject {
        file_name: file_name.to_lowercase(),
        path: path.to_lowercase(),
        title_id,
    };
    RULES.iter().find(|rule| (rule.test)(&subject))
}

/// Classify a file as base game, update or DLC.
pub fn classify(file_name: &str, path: &str, title_id: Option<&TitleId>) -> Kind {
    matching_rule(file_name, path, title_id)
        .map(|rule| rule.kind)
        .unwrap_or(Kind::Base)
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
