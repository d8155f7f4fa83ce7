//! Update version parsing and latest-update selection.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::file::RawFile;

regex!(V_DOTTED, r"v(\d+\.\d+(?:\.\d+)?)");
regex!(V_UNDERSCORED, r"v(\d+_\d+(?:_\d+)?)");
regex!(V_SINGLE, r"[vV](\d+)");
regex!(BARE_DOTTED, r"(\d+\.\d+(?:\.\d+)?)");
regex!(BARE_UNDERSCORED, r"(\d+_\d+(?:_\d+)?)");

/// Patterns tried in order; the first one that matches anywhere wins.
fn patterns() -> [&'static Regex; 5] {
    [
        &V_DOTTED,
        &V_UNDERSCORED,
        &V_SINGLE,
        &BARE_DOTTED,
        &BARE_UNDERSCORED,
    ]
}

/// A `(major, minor, patch)` version. Missing components are 0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a dotted version string (`"1"`, `"1.2"`, `"1.2.3"`).
    ///
    /// Anything unparsable, including components that overflow, gives 0.0.0.
    pub fn parse_dotted(s: &str) -> Self {
        let mut parts = [0u64; 3];
        for (slot, part) in parts.iter_mut().zip(s.split('.')) {
            match part.parse() {
                Ok(n) => *slot = n,
                Err(_) => return Self::default(),
            }
        }
        Self::new(parts[0], parts[1], parts[2])
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Pull a version string out of a file name, with `_` separators turned
/// into dots (`v1_2_3` gives `"1.2.3"`).
pub fn extract_version(file_name: &str) -> Option<String> {
    patterns()
        .iter()
        .find_map(|re| re.captures(file_name))
        .map(|caps| caps[1].replace('_', "."))
}

/// Parse the version of an update file name, 0.0.0 when none is found.
pub fn parse_version(file_name: &str) -> Version {
    extract_version(file_name)
        .map(|v| Version::parse_dotted(&v))
        .unwrap_or_default()
}

/// Pick the update to keep out of several candidates for one title.
///
/// Ordered by version, then file size, then modification time, highest
/// first. On an exact tie the earliest candidate is kept.
pub fn select_latest_update(updates: &[RawFile]) -> Option<&RawFile> {
    let mut best: Option<(&RawFile, UpdateRank)> = None;
    for file in updates {
        let rank = UpdateRank::of(file);
        if best.as_ref().is_none_or(|(_, top)| rank > *top) {
            best = Some((file, rank));
        }
    }
    best.map(|(file, _)| file)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct UpdateRank {
    version: Version,
    size: u64,
    modified: Option<std::time::SystemTime>,
}

impl UpdateRank {
    fn of(file: &RawFile) -> Self {
        Self {
            version: parse_version(file.file_name()),
            size: file.size(),
            modified: file.modified(),
        }
    }
}

#[cfg(test)]
#[path = "tests/version_tests.rs"]
mod tests;
