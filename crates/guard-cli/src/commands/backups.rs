//! Backups command implementation

use colored::Colorize;

use crate::context::Context;
use crate::error::{CliError, Result};

/// List backup artifacts for `file`, or for every target file.
pub fn run_backups(ctx: &Context, file: Option<&str>) -> Result<()> {
    let store = ctx.settings.backup_store()?;
    let targets = &ctx.settings.target_files;

    let files: Vec<&str> = match file {
        Some(name) if targets.iter().any(|t| t == name) => vec![name],
        Some(name) => {
            return Err(CliError::user(format!(
                "'{}' is not a guarded file (expected one of: {})",
                name,
                targets.join(", ")
            )));
        }
        None => targets.iter().map(String::as_str).collect(),
    };

    println!("{}: {}", "Backups".bold(), store.dir().display());
    for name in files {
        println!();
        println!("{}:", name.cyan());
        let backups = store.list(name)?;
        if backups.is_empty() {
            println!("  {}", "None".dimmed());
        }
        for path in backups {
            let label = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("  {} {}", "-".dimmed(), label);
        }
    }
    Ok(())
}
