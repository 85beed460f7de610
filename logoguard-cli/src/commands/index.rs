//! Index command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

use crate::utils::{build_index, resolve_config};
use crate::GlobalArgs;

/// Execute the index command.
pub fn execute(global: &GlobalArgs, json_output: bool) -> Result<()> {
    let config = resolve_config(global);
    // JSON mode reports skipped files in the document instead of on stderr.
    let build = build_index(&config, global.quiet || json_output)?;

    if json_output {
        let doc = json!({
            "reference_dir": config.reference_dir,
            "algorithm": config.algorithm,
            "entries": build.index,
            "skipped": build.skipped,
        });
        let out = serde_json::to_string_pretty(&doc).context("Failed to serialize index")?;
        println!("{}", out);
        return Ok(());
    }

    if global.quiet {
        return Ok(());
    }

    println!();
    println!(
        "   {} {}",
        "Reference directory:".dimmed(),
        config.reference_dir.display()
    );
    println!("   {} {}", "Algorithm:".dimmed(), config.algorithm);
    println!();

    if build.index.is_empty() {
        println!("   {}", "No reference images found.".yellow());
    }
    for (identifier, hash) in &build.index {
        println!("   {}  {}", hash.to_hex(), identifier);
    }

    println!();
    println!(
        "   {} indexed, {} skipped",
        build.index.len().to_string().green(),
        if build.skipped.is_empty() {
            "0".normal()
        } else {
            build.skipped.len().to_string().red()
        }
    );
    Ok(())
}
