//! Title identifier extraction.
//!
//! Switch content is addressed by a 16-digit hexadecimal title ID. The last
//! three digits encode the role of the content:
//!
//! ```text
//! 0100ABCDEF000000   base game    (ends in 000)
//! 0100ABCDEF000800   update       (ends in 800)
//! 0100ABCDEF000001   DLC          (digits 14-15 are 00, digit 16 non-zero)
//! ```
//!
//! Everything sharing the first 13 digits belongs to the same title family.

use std::fmt;

use serde::{Deserialize, Serialize};

regex!(BRACKETED_ID, r"\[([0-9A-Fa-f]{16})\]");
regex!(HEX_RUN, r"[0-9A-Fa-f]{16,}");

/// Number of leading digits shared by every member of a title family.
pub const FAMILY_LEN: usize = 13;

/// A 16-digit, upper-cased hexadecimal title identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TitleId(String);

impl TitleId {
    /// Parse an exact 16-hex-digit string (any case).
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() == 16 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(s.to_ascii_uppercase()))
        } else {
            None
        }
    }

    /// Find the first title ID embedded in a file name.
    ///
    /// A bracketed run (`[0100ABCDEF000000]`) always wins. Otherwise the
    /// leftmost 16-digit window that is not directly preceded by `[` and not
    /// directly followed by `]` is taken, scanning left to right.
    pub fn extract(name: &str) -> Option<Self> {
        if let Some(caps) = BRACKETED_ID.captures(name) {
            return Self::parse(&caps[1]);
        }

        let bytes = name.as_bytes();
        for run in HEX_RUN.find_iter(name) {
            let (start, end) = (run.start(), run.end());
            let opens_bracket = start > 0 && bytes[start - 1] == b'[';
            let closes_bracket = end < bytes.len() && bytes[end] == b']';

            // Inner windows of a longer run are flanked by hex digits, so only
            // the outermost ones can touch a bracket.
            let first = if opens_bracket { start + 1 } else { start };
            let fits = first + 16 <= end;
            let clear_of_close = first + 16 < end || !closes_bracket;
            if fits && clear_of_close {
                return Self::parse(&name[first..first + 16]);
            }
        }
        None
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first 13 digits shared by a base game, its update and its DLC.
    pub fn family(&self) -> &str {
        &self.0[..FAMILY_LEN]
    }

    /// The base-game ID of this title's family (first 13 digits + `000`).
    pub fn base_id(&self) -> TitleId {
        TitleId(format!("{}000", self.family()))
    }

    /// Ends in `000`.
    pub fn is_base(&self) -> bool {
        self.0.ends_with("000")
    }

    /// Ends in `800`.
    pub fn is_update(&self) -> bool {
        self.0.ends_with("800")
    }

    /// Digits 14-15 are `00` and digit 16 is non-zero.
    pub fn is_dlc(&self) -> bool {
        let tail = &self.0.as_bytes()[FAMILY_LEN..];
        tail[0] == b'0' && tail[1] == b'0' && tail[2] != b'0'
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TitleId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid title ID: {value}"))
    }
}

impl From<TitleId> for String {
    fn from(id: TitleId) -> Self {
        id.0
    }
}

/// Extract the title identifier from a file name, or `None` if it carries none.
pub fn extract_identifier(name: &str) -> Option<TitleId> {
    TitleId::extract(name)
}

#[cfg(test)]
#[path = "tests/identifier_tests.rs"]
mod tests;
