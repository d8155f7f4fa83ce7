//! nx-merge CLI
//!
//! Command-line interface for grouping Switch game files and planning merges.

mod cli_types;
mod commands;
mod error;

use std::io::Write;

use clap::Parser;
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let settings = nx_merge_lib::settings::load_settings();

    let result = match cli.command {
        Commands::Scan { json } => commands::scan::run_scan(cli.root, &settings, json, cli.quiet),
        Commands::Plan { game } => commands::plan::run_plan(cli.root, &settings, game, cli.quiet),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&settings),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::SetRoot { path } => commands::config::run_config_set_root(settings, path),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Install the logger that carries all user-facing output.
///
/// `info` lines are printed bare so they read as normal program output.
/// `RUST_LOG` overrides the level chosen by `--quiet` / `--verbose`.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).target(env_logger::Target::Stdout);
    if verbose {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "[{} {:5}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            Level::Warn => writeln!(
                buf,
                "{} {}",
                "warning:".if_supports_color(Stdout, |t| t.yellow()),
                record.args()
            ),
            Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stdout, |t| t.red()),
                record.args()
            ),
            _ => writeln!(buf, "{}", record.args()),
        });
    }
    builder.parse_default_env();
    builder.init();
}
