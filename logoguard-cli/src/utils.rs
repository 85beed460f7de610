//! Common utility functions shared across CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use logoguard_core::{IndexBuild, LogoGuardError, MatcherConfig, ReferenceIndex};
use tracing::debug;

use crate::GlobalArgs;

/// Upload extensions accepted before any decoding happens (case-insensitive).
pub const UPLOAD_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Resolve the matcher configuration: environment first, then CLI overrides.
pub fn resolve_config(global: &GlobalArgs) -> MatcherConfig {
    let mut config = MatcherConfig::from_env();
    if let Some(dir) = &global.references {
        config = config.with_reference_dir(dir);
    }
    if let Some(threshold) = global.threshold {
        config = config.with_threshold(threshold);
    }
    if let Some(algorithm) = global.algorithm {
        config = config.with_algorithm(algorithm);
    }
    debug!(?config, "Resolved configuration");
    config
}

/// Build the reference index, warning about skipped files on stderr.
pub fn build_index(config: &MatcherConfig, quiet: bool) -> Result<IndexBuild> {
    let build = ReferenceIndex::build(config).context("Failed to build reference index")?;

    if !quiet {
        for skipped in &build.skipped {
            eprintln!(
                "{} skipped reference {}: {}",
                "warning:".yellow().bold(),
                skipped.identifier,
                skipped.reason
            );
        }
    }
    Ok(build)
}

/// Reject uploads whose extension is not jpg, jpeg or png.
pub fn check_upload_extension(path: &Path) -> Result<(), LogoGuardError> {
    let accepted = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            UPLOAD_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false);

    if accepted {
        Ok(())
    } else {
        Err(LogoGuardError::UnsupportedUpload(format!(
            "{} (expected one of: {})",
            path.display(),
            UPLOAD_EXTENSIONS.join(", ")
        )))
    }
}

/// Read an upload from disk after checking its extension.
pub fn read_upload(path: &Path) -> Result<Vec<u8>> {
    check_upload_extension(path)?;
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read upload: {}", path.display()))?;
    debug!(path = %path.display(), bytes = data.len(), "Read upload");
    Ok(data)
}
