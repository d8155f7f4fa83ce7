use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::classify::{Kind, classify};
use crate::identifier::TitleId;
use crate::name::resolve_name;

/// Which directory counts as a file's "parent" for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirScope {
    /// First path component below the scan root (`root/<this>/sub/file.nsp`).
    #[default]
    TopLevel,
    /// The directory directly containing the file.
    Immediate,
}

impl fmt::Display for DirScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DirScope::TopLevel => "top-level",
            DirScope::Immediate => "immediate",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown directory scope '{0}' (expected 'top-level' or 'immediate')")]
pub struct DirScopeParseError(String);

impl FromStr for DirScope {
    type Err = DirScopeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top-level" | "toplevel" | "top" => Ok(DirScope::TopLevel),
            "immediate" | "parent" => Ok(DirScope::Immediate),
            _ => Err(DirScopeParseError(s.to_string())),
        }
    }
}

/// A container file found during a scan, with every attribute the grouping
/// engine needs computed once up front.
///
/// Instances are immutable: size and mtime are captured when the record is
/// built and are not re-read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    path: PathBuf,
    relative_path: PathBuf,
    file_name: String,
    extension: String,
    size: u64,
    modified: Option<SystemTime>,
    parent_path: Option<PathBuf>,
    parent_dir: Option<String>,
    title_id: Option<TitleId>,
    kind: Kind,
    candidate_name: String,
}

impl RawFile {
    /// Build a record from a path and metadata that has already been read.
    ///
    /// `root` is the scan root; the parent directory and the path used for
    /// keyword classification are taken relative to it.
    pub fn new(
        root: &Path,
        path: impl Into<PathBuf>,
        size: u64,
        modified: Option<SystemTime>,
        scope: DirScope,
    ) -> Self {
        let path = path.into();
        let relative_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let parent_path = parent_path_of(&relative_path, scope);
        let parent_dir = parent_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned());

        let title_id = TitleId::extract(&file_name);
        let kind = classify(
            &file_name,
            &relative_path.to_string_lossy(),
            title_id.as_ref(),
        );
        let candidate_name = resolve_name(&file_name, parent_dir.as_deref(), title_id.as_ref());

        Self {
            path,
            relative_path,
            file_name,
            extension,
            size,
            modified,
            parent_path,
            parent_dir,
            title_id,
            kind,
            candidate_name,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path relative to the scan root.
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Lowercase extension without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Root-relative path of the grouping directory. Two directories with the
    /// same name in different places have different paths.
    pub fn parent_path(&self) -> Option<&Path> {
        self.parent_path.as_deref()
    }

    /// Name of the grouping directory, used for display.
    pub fn parent_dir(&self) -> Option<&str> {
        self.parent_dir.as_deref()
    }

    pub fn title_id(&self) -> Option<&TitleId> {
        self.title_id.as_ref()
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Name this file suggests for its title.
    pub fn candidate_name(&self) -> &str {
        &self.candidate_name
    }
}

/// Grouping directory relative to the scan root. Files sitting directly in
/// the root have none.
fn parent_path_of(relative: &Path, scope: DirScope) -> Option<PathBuf> {
    let dirs: Vec<&std::ffi::OsStr> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s),
            _ => None,
        })
        .collect();
    if dirs.len() < 2 {
        return None;
    }
    let dirs = match scope {
        DirScope::TopLevel => &dirs[..1],
        DirScope::Immediate => &dirs[..dirs.len() - 1],
    };
    Some(dirs.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_are_derived_once() {
        let root = Path::new("/lib");
        let f = RawFile::new(
            root,
            "/lib/GameX/GameX_update[0100ABCDEF000800]_v2.0.0.NSP",
            80,
            None,
            DirScope::TopLevel,
        );
        assert_eq!(f.file_name(), "GameX_update[0100ABCDEF000800]_v2.0.0.NSP");
        assert_eq!(f.extension(), "nsp");
        assert_eq!(f.parent_dir(), Some("GameX"));
        assert_eq!(f.title_id().map(TitleId::as_str), Some("0100ABCDEF000800"));
        assert_eq!(f.kind(), Kind::Update);
        assert_eq!(f.candidate_name(), "GameX");
        assert_eq!(f.relative_path(), Path::new("GameX/GameX_update[0100ABCDEF000800]_v2.0.0.NSP"));
    }

    #[test]
    fn root_level_file_has_no_parent() {
        let f = RawFile::new(Path::new("/lib"), "/lib/loose.xci", 1, None, DirScope::TopLevel);
        assert_eq!(f.parent_dir(), None);
        assert_eq!(f.candidate_name(), "loose");
    }

    #[test]
    fn dir_scope_selects_component() {
        let root = Path::new("/lib");
        let path = "/lib/Zelda/Updates/patch.nsp";
        let top = RawFile::new(root, path, 1, None, DirScope::TopLevel);
        let near = RawFile::new(root, path, 1, None, DirScope::Immediate);
        assert_eq!(top.parent_dir(), Some("Zelda"));
        assert_eq!(top.parent_path(), Some(Path::new("Zelda")));
        assert_eq!(near.parent_dir(), Some("Updates"));
        assert_eq!(near.parent_path(), Some(Path::new("Zelda/Updates")));
    }

    #[test]
    fn keywords_above_the_root_are_ignored() {
        let root = Path::new("/mnt/dlc-drive");
        let f = RawFile::new(root, "/mnt/dlc-drive/Game/Game.xci", 1, None, DirScope::TopLevel);
        assert_eq!(f.kind(), Kind::Base);
    }

    #[test]
    fn dir_scope_from_str() {
        assert_eq!("top-level".parse::<DirScope>().unwrap(), DirScope::TopLevel);
        assert_eq!("Immediate".parse::<DirScope>().unwrap(), DirScope::Immediate);
        assert!("sideways".parse::<DirScope>().is_err());
    }
}
