//! syno-guard CLI
//!
//! Keeps the Synology Drive client's filter files ignoring build and
//! dependency folders, repairing them whenever the client resets them.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context::load(&cli)?;
    match cli.command.clone().unwrap_or(Commands::Watch) {
        Commands::Watch => commands::run_watch(&ctx),
        Commands::Check => commands::run_check(&ctx),
        Commands::Fix { dry_run } => commands::run_fix(&ctx, dry_run),
        Commands::Backups { file } => commands::run_backups(&ctx, file.as_deref()),
        Commands::Rules => commands::run_rules(&ctx),
    }
}

/// Log to stderr at `info` (`debug` when verbose) unless `RUST_LOG` is set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}
