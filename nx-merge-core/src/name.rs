//! Human-readable title names.

use std::path::Path;

use crate::identifier::TitleId;

regex!(BRACKETED, r"\[.*?\]");
regex!(PARENTHESIZED, r"\(.*?\)");
regex!(VERSION_TOKEN, r"v\d+(?:\.\d+)*");

const SEPARATORS: &[char] = &['_', '.', '-', ' '];

/// Derive a display name for a file.
///
/// The parent directory wins when present and not just the raw title ID.
/// Otherwise the file stem is stripped of `[...]` and `(...)` runs, version
/// tokens (`v1`, `v1.2.3`) and the title ID itself. Names shorter than two
/// characters fall back to `Game_<id>`, or to the raw file name when the file
/// carries no ID. The result is never empty.
pub fn resolve_name(file_name: &str, parent_dir: Option<&str>, title_id: Option<&TitleId>) -> String {
    if let Some(dir) = parent_dir.filter(|d| !d.is_empty()) {
        let is_raw_id = title_id.is_some_and(|id| dir.eq_ignore_ascii_case(id.as_str()));
        if !is_raw_id {
            return dir.to_string();
        }
    }

    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let stripped = strip_decorations(stem, title_id);

    if stripped.chars().count() >= 2 {
        return stripped;
    }
    match title_id {
        Some(id) => format!("Game_{id}"),
        None if !file_name.is_empty() => file_name.to_string(),
        None => "Game_unknown".to_string(),
    }
}

/// Remove tags, version tokens and the title ID from a file stem.
pub fn strip_decorations(stem: &str, title_id: Option<&TitleId>) -> String {
    let s = BRACKETED.replace_all(stem, "");
    let s = PARENTHESIZED.replace_all(&s, "");
    let s = VERSION_TOKEN.replace_all(&s, "");
    let s = match title_id {
        Some(id) => remove_ignoring_ascii_case(&s, id.as_str()),
        None => s.into_owned(),
    };
    s.trim_matches(SEPARATORS).to_string()
}

/// Key used to detect the same title under different spellings:
/// lower-cased with everything but ASCII letters and digits removed.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

fn remove_ignoring_ascii_case(haystack: &str, needle: &str) -> String {
    // ASCII upper-casing keeps byte offsets intact.
    let upper = haystack.to_ascii_uppercase();
    let needle = needle.to_ascii_uppercase();
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for (pos, _) in upper.match_indices(&needle) {
        out.push_str(&haystack[last..pos]);
        last = pos + needle.len();
    }
    out.push_str(&haystack[last..]);
    out
}
