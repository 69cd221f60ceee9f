//! Rules command implementation

use colored::Colorize;

use crate::context::Context;
use crate::error::Result;

/// Print the resolved rule set, one token per line.
pub fn run_rules(ctx: &Context) -> Result<()> {
    let rules = ctx.settings.rule_set()?;
    println!("{} ({} tokens):", "Enforced ignore rules".bold(), rules.len());
    for token in &rules {
        println!("  {} {}", "+".green(), token);
    }
    if let Some(path) = &ctx.settings_path {
        println!();
        println!("{}: {}", "Settings".dimmed(), path.display());
    }
    Ok(())
}
