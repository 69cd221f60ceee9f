//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Keeps Synology Drive filter files ignoring build and dependency folders
#[derive(Parser, Debug)]
#[command(name = "syno-guard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to <config dir>/syno-guard/config.toml)
    #[arg(long, global = true, env = "SYNO_GUARD_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Synology Drive configuration directory to guard
    #[arg(long, global = true, value_name = "PATH")]
    pub conf_dir: Option<PathBuf>,

    /// The command to run (defaults to `watch`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Enforce once, then watch the filter files until interrupted
    Watch,

    /// Report which filter files are missing ignore rules
    ///
    /// Exits with a non-zero status if any file needs repair.
    Check,

    /// Stop the client, repair the filter files and restart it
    Fix {
        /// Print the changes as a diff without touching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List backups of the filter files, newest first
    Backups {
        /// Only list backups of this file
        file: Option<String>,
    },

    /// Print the ignore rules being enforced
    Rules,
}
