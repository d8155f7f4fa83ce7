use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_merge_lib::Settings;
use nx_merge_lib::settings::{save_settings, settings_path};

use crate::error::CliError;

/// Show the settings in effect and where they come from.
pub(crate) fn run_config_show(settings: &Settings) -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "nx-merge Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let contents = toml::to_string_pretty(settings).map_err(|e| CliError::config(e.to_string()))?;
    for line in contents.lines() {
        log::info!("  {}", line);
    }
    Ok(())
}

pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings_path().display());
    Ok(())
}

pub(crate) fn run_config_set_root(mut settings: Settings, path: PathBuf) -> Result<(), CliError> {
    if !path.is_dir() {
        return Err(CliError::config(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    let path = path.canonicalize()?;
    settings.scan.current_root = Some(path.clone());
    save_settings(&settings)?;
    log::info!(
        "  {} Default root set to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
