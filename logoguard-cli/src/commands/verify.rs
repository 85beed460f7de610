//! Verify command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use logoguard_core::{
    DistanceHistogram, LegitimacyBreakdown, MatchResult, Matcher, PerceptualHash,
    PerceptualHasher, PerformanceCurve, SessionTally, DEFAULT_HISTOGRAM_BINS,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::render;
use crate::utils::{build_index, check_upload_extension, read_upload, resolve_config};
use crate::GlobalArgs;

/// Uploads in this session that were rejected.
#[derive(Debug, Error)]
#[error("{rejected} of {checked} upload(s) not legitimate")]
pub struct NotLegitimate {
    pub rejected: usize,
    pub checked: usize,
}

/// Which analytics to show alongside the results.
#[derive(Debug, Clone, Copy)]
pub struct VerifyOptions {
    pub json: bool,
    pub performance: bool,
    pub distribution: bool,
    pub legitimacy: bool,
    pub epochs: u32,
}

#[derive(Serialize)]
struct UploadReport {
    file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<PerceptualHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<MatchResult>,
    /// Best-match distance in bits; absent when there was nothing to compare.
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_bits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distribution: Option<DistanceHistogram>,
    /// Why this upload could not be checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl UploadReport {
    fn failed(file: PathBuf, reason: String) -> Self {
        Self {
            file,
            hash: None,
            result: None,
            distance_bits: None,
            distribution: None,
            error: Some(reason),
        }
    }

    fn is_rejected(&self) -> bool {
        self.result.as_ref().is_some_and(|r| !r.is_legitimate)
    }
}

fn hash_upload(hasher: &PerceptualHasher, file: &Path) -> Result<PerceptualHash> {
    let data = read_upload(file)?;
    hasher
        .hash_bytes(&data)
        .with_context(|| format!("Failed to hash upload: {}", file.display()))
}

#[derive(Serialize)]
struct SessionReport {
    algorithm: String,
    threshold: u32,
    references: usize,
    uploads: Vec<UploadReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legitimacy: Option<LegitimacyBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    performance: Option<PerformanceCurve>,
}

/// Execute the verify command.
pub fn execute(global: &GlobalArgs, files: Vec<PathBuf>, options: VerifyOptions) -> Result<()> {
    let config = resolve_config(global);
    let human = !global.quiet && !options.json;

    // Unsupported uploads are rejected before any work is done
    for file in &files {
        check_upload_extension(file)?;
    }

    let build = build_index(&config, global.quiet)?;
    if build.index.is_empty() {
        warn!(dir = %config.reference_dir.display(), "Reference index is empty");
    }

    let hasher = PerceptualHasher::new(config.algorithm);
    let matcher = Matcher::from_config(&config);
    let mut tally = SessionTally::new();
    let mut uploads = Vec::with_capacity(files.len());

    // A failed upload is reported and the remaining ones are still checked
    let mut first_error: Option<anyhow::Error> = None;

    for file in files {
        let hash = match hash_upload(&hasher, &file) {
            Ok(hash) => hash,
            Err(err) => {
                let reason = format!("{err:#}");
                warn!(path = %file.display(), error = %reason, "Failed to check upload");
                if human {
                    render::print_upload_error(&file, &reason);
                }
                uploads.push(UploadReport::failed(file, reason));
                first_error.get_or_insert(err);
                continue;
            }
        };

        let result = matcher.find_best_match(&hash, &build.index);
        tally.record(&result);

        info!(
            path = %file.display(),
            best = result.best_identifier.as_deref().unwrap_or("-"),
            distance = %result.distance,
            is_legitimate = result.is_legitimate,
            "Checked upload"
        );

        let distribution = if options.distribution {
            Some(DistanceHistogram::from_distances(
                &result.distance_values(),
                DEFAULT_HISTOGRAM_BINS,
            )?)
        } else {
            None
        };

        if human {
            render::print_match(&file, &config.reference_dir, &result);
            if let Some(hist) = &distribution {
                render::print_section(
                    "Similarity Score Distribution",
                    &render::histogram_lines(hist),
                );
            }
        }

        uploads.push(UploadReport {
            file,
            hash: Some(hash),
            distance_bits: result.distance.finite(),
            result: Some(result),
            distribution,
            error: None,
        });
    }

    let performance = options
        .performance
        .then(|| PerformanceCurve::random(options.epochs));
    let legitimacy = options
        .legitimacy
        .then(|| LegitimacyBreakdown::from_tally(&tally));

    if human {
        if let Some(curve) = &performance {
            render::print_section("Model Performance", &render::performance_lines(curve));
        }
        if let Some(breakdown) = &legitimacy {
            render::print_section(
                "Legitimacy Comparison",
                &render::breakdown_lines(breakdown),
            );
        }
    }

    let checked = uploads.iter().filter(|u| u.result.is_some()).count();
    let rejected = uploads.iter().filter(|u| u.is_rejected()).count();

    if options.json {
        let report = SessionReport {
            algorithm: hasher.algorithm().to_string(),
            threshold: config.threshold,
            references: build.index.len(),
            uploads,
            legitimacy,
            performance,
        };
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize results")?;
        println!("{}", json);
    }

    if let Some(err) = first_error {
        return Err(err);
    }
    if rejected > 0 {
        return Err(NotLegitimate { rejected, checked }.into());
    }

    if human {
        println!();
        println!(
            "{}",
            format!("All {} upload(s) legitimate.", checked).green()
        );
    }
    Ok(())
}
