//! Hash command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use logoguard_core::PerceptualHasher;
use serde_json::json;
use tracing::info;

use crate::utils::{read_upload, resolve_config};
use crate::GlobalArgs;

/// Execute the hash command.
pub fn execute(global: &GlobalArgs, file: PathBuf, json_output: bool) -> Result<()> {
    let config = resolve_config(global);
    let data = read_upload(&file)?;

    let hasher = PerceptualHasher::new(config.algorithm);
    let hash = hasher
        .hash_bytes(&data)
        .with_context(|| format!("Failed to hash image: {}", file.display()))?;

    info!(
        path = %file.display(),
        hash = %hash,
        algorithm = %hasher.algorithm(),
        "Computed hash"
    );

    if json_output {
        let doc = json!({
            "file": file,
            "algorithm": hasher.algorithm(),
            "hash": hash,
        });
        let out = serde_json::to_string_pretty(&doc).context("Failed to serialize hash")?;
        println!("{}", out);
    } else {
        // The hash is the command's output, so --quiet does not suppress it.
        println!("{}", hash);
    }
    Ok(())
}
