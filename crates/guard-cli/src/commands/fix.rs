//! Fix command implementation

use colored::Colorize;
use guard_content::unified_diff;
use guard_core::lifecycle::{ExitOutcome, StartOutcome, StopMethod};
use guard_core::{CycleReport, FileOutcome, TriggerOutcome};

use super::runtime;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Run one enforcement cycle now, or print what it would write.
pub fn run_fix(ctx: &Context, dry_run: bool) -> Result<()> {
    let coordinator = ctx.coordinator()?;

    if dry_run {
        println!("{} Previewing repairs (dry run)...", "=>".blue().bold());
        let mut changed = 0;
        for preview in coordinator.preview() {
            if !preview.merge.changed {
                println!("   {} {}", "OK".green().bold(), preview.file.cyan());
                continue;
            }
            changed += 1;
            println!();
            print!("{}", unified_diff(&preview.file, &preview.original, &preview.merge.text));
        }
        println!();
        if changed == 0 {
            println!("{} Nothing to repair.", "OK".green().bold());
        } else {
            println!("{} {} file(s) would be repaired.", "DRY-RUN".yellow().bold(), changed);
        }
        return Ok(());
    }

    println!("{} Checking filter files...", "=>".blue().bold());
    let outcome = runtime()?.block_on(coordinator.check_and_enforce());
    match outcome {
        TriggerOutcome::Compliant => {
            println!("{} All filter files are compliant.", "OK".green().bold());
            Ok(())
        }
        TriggerOutcome::Queued => Err(CliError::user("another repair is already running")),
        TriggerOutcome::Enforced(report) => {
            print_report(&report);
            Ok(())
        }
    }
}

fn print_report(report: &CycleReport) {
    match report.stop {
        StopMethod::Graceful => println!("   {} client asked to quit", "+".green()),
        StopMethod::Forced => println!("   {} quit failed, processes terminated", "!".yellow()),
    }
    match report.exit {
        ExitOutcome::Confirmed { waited } => {
            println!("   {} client exited after {:.1}s", "+".green(), waited.as_secs_f64());
        }
        ExitOutcome::Forced => println!("   {} client did not exit, force killed", "!".yellow()),
    }

    for file in &report.files {
        match &file.outcome {
            FileOutcome::Updated(method) => {
                println!("   {} {} repaired ({})", "+".green(), file.file.cyan(), method);
            }
            FileOutcome::Unchanged => {
                println!("   {} {} already compliant", "=".dimmed(), file.file.cyan());
            }
            FileOutcome::Missing => {
                println!("   {} {} not present", "-".dimmed(), file.file.cyan());
            }
            FileOutcome::ReadFailed { reason } => {
                println!("   {} {} could not be read: {}", "x".red(), file.file.cyan(), reason);
            }
            FileOutcome::WriteFailed { reason } => {
                println!("   {} {} could not be written: {}", "x".red(), file.file.cyan(), reason);
            }
        }
    }

    if let Some(error) = &report.launch_error {
        println!("   {} launch failed: {}", "x".red(), error);
    }
    match report.start {
        StartOutcome::Confirmed { waited } => {
            println!("   {} client running after {:.1}s", "+".green(), waited.as_secs_f64());
        }
        StartOutcome::TimedOut => println!("   {} client not detected after launch", "!".yellow()),
    }

    println!();
    if report.is_clean() {
        println!("{} Repair complete.", "OK".green().bold());
    } else {
        println!("{} Repair finished with problems (see above).", "WARN".yellow().bold());
    }
}
