//! Filesystem-free building blocks for grouping Switch container files.
//!
//! Everything in this crate is a pure function over file names, paths and
//! already-collected metadata. Walking directories and grouping live in
//! `nx-merge-lib`.

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        static $name: std::sync::LazyLock<regex::Regex> =
            std::sync::LazyLock::new(|| regex::Regex::new($regex).unwrap());
    };
}

pub mod classify;
pub mod error;
pub mod file;
pub mod identifier;
pub mod name;
pub mod util;
pub mod version;

pub use classify::{Kind, classify};
pub use error::CoreError;
pub use file::{DirScope, RawFile};
pub use identifier::{TitleId, extract_identifier};
pub use name::{normalize_name, resolve_name};
pub use version::{Version, extract_version, parse_version, select_latest_update};

/// Container extensions recognised by default (lowercase, without the dot).
pub const DEFAULT_EXTENSIONS: &[&str] = &["xci", "xcz", "nsp", "nsz"];
