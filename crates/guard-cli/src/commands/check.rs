//! Check command implementation

use colored::Colorize;
use guard_core::ComplianceStatus;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Print the compliance of each target file.
///
/// Fails with [`CliError::NonCompliant`] when any file needs repair.
pub fn run_check(ctx: &Context) -> Result<()> {
    let coordinator = ctx.coordinator()?;
    println!(
        "{} Checking filter files in {}",
        "=>".blue().bold(),
        coordinator.conf_dir().display()
    );

    let report = coordinator.compliance();
    for file in &report {
        match &file.status {
            ComplianceStatus::Compliant => {
                println!("   {} {}", "OK".green().bold(), file.file.cyan());
            }
            ComplianceStatus::NonCompliant { missing } => {
                println!(
                    "   {} {} (missing {}): {}",
                    "MISSING RULES".red().bold(),
                    file.file.cyan(),
                    missing.len(),
                    missing.join(", ")
                );
            }
            ComplianceStatus::Missing => {
                println!("   {} {} (not present)", "SKIP".dimmed(), file.file.cyan());
            }
            ComplianceStatus::Unreadable { reason } => {
                println!("   {} {}: {}", "UNREADABLE".yellow().bold(), file.file.cyan(), reason);
            }
        }
    }

    let count = report.iter().filter(|f| f.needs_enforcement()).count();
    if count > 0 {
        println!();
        println!("Run {} to repair.", "syno-guard fix".cyan());
        return Err(CliError::NonCompliant { count });
    }

    println!();
    println!("{} All filter files are compliant.", "OK".green().bold());
    Ok(())
}
