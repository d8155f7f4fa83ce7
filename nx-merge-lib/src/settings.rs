//! Application settings (`~/.config/nx-merge/settings.toml`).

use std::io;
use std::path::{Path, PathBuf};

use nx_merge_core::{DEFAULT_EXTENSIONS, DirScope};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub merge: MergeSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Container extensions to pick up, matched case-insensitively
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub dir_scope: DirScope,
    /// Library root used when none is given on the command line
    #[serde(default)]
    pub current_root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeSettings {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
    /// Extension of merged output files, without the dot
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("OUTPUT")
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("TEMP")
}

fn default_output_extension() -> String {
    "xci".to_string()
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            dir_scope: DirScope::default(),
            current_root: None,
        }
    }
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            temp_dir: default_temp_dir(),
            output_extension: default_output_extension(),
        }
    }
}

/// Canonical path to the settings file: `~/.config/nx-merge/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("nx-merge").join("settings.toml")
}

/// Load settings from `path`, returning defaults if missing or corrupt.
pub fn load_settings_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Failed to parse settings at {}: {}", path.display(), e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

/// Load settings from the canonical location.
pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Save settings atomically (write to temp, then rename).
pub fn save_settings_to(path: &Path, settings: &Settings) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(settings).map_err(io::Error::other)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> io::Result<()> {
    save_settings_to(&settings_path(), settings)
}

/// Resolve the library root using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. Saved `scan.current_root` in `settings.toml`
/// 3. `./rom`, if it is a directory
/// 4. Current working directory
pub fn resolve_library_root(cli_override: Option<PathBuf>, settings: &Settings) -> PathBuf {
    if let Some(p) = cli_override {
        return p;
    }
    if let Some(p) = settings.scan.current_root.as_ref().filter(|p| !p.as_os_str().is_empty()) {
        return p.clone();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let rom_dir = cwd.join("rom");
    if rom_dir.is_dir() {
        return rom_dir;
    }
    cwd
}
