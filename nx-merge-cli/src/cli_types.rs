//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "nx-merge")]
#[command(about = "Group Switch base games with their updates and DLC", long_about = None)]
pub(crate) struct Cli {
    /// Library root to scan (defaults to the saved root, then ./rom, then the current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Scan the library and list every game group
    Scan {
        /// Print the group mapping as JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Show what merging would produce, without touching any files
    Plan {
        /// Title ID or name (partial, case-insensitive) of a single game
        #[arg(short, long)]
        game: Option<String>,
    },

    /// Manage nx-merge settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings
    Show,

    /// Print the settings file path
    Path,

    /// Save a default library root
    SetRoot {
        /// Directory to scan when --root is not given
        path: PathBuf,
    },
}
