//! Matcher configuration.
//!
//! Loaded once at startup, from environment variables with sensible defaults,
//! and passed by reference to the index builder and the matcher.

use std::path::PathBuf;

use tracing::warn;

use crate::hash::HashAlgorithm;

/// Directory scanned for reference logos when nothing else is configured.
pub const DEFAULT_REFERENCE_DIR: &str = "Logos";

/// Maximum hash distance still classified as a legitimate match.
pub const DEFAULT_THRESHOLD: u32 = 5;

/// Matcher configuration, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Directory of reference logo images (default: `Logos`)
    pub reference_dir: PathBuf,
    /// Legitimacy threshold in differing bits (default: 5)
    pub threshold: u32,
    /// Hash algorithm used for references and uploads alike (default: average)
    pub algorithm: HashAlgorithm,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            reference_dir: PathBuf::from(DEFAULT_REFERENCE_DIR),
            threshold: DEFAULT_THRESHOLD,
            algorithm: HashAlgorithm::default(),
        }
    }
}

impl MatcherConfig {
    /// Load configuration from environment variables.
    ///
    /// - `LOGOGUARD_REFERENCE_DIR`
    /// - `LOGOGUARD_THRESHOLD`
    /// - `LOGOGUARD_HASH_ALGORITHM` (`average` or `blockhash`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let reference_dir = lookup("LOGOGUARD_REFERENCE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.reference_dir);

        let threshold = match lookup("LOGOGUARD_THRESHOLD") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Ignoring unparsable LOGOGUARD_THRESHOLD");
                defaults.threshold
            }),
            None => defaults.threshold,
        };

        let algorithm = match lookup("LOGOGUARD_HASH_ALGORITHM") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!(value = %raw, error = %e, "Ignoring LOGOGUARD_HASH_ALGORITHM");
                defaults.algorithm
            }),
            None => defaults.algorithm,
        };

        Self {
            reference_dir,
            threshold,
            algorithm,
        }
    }

    pub fn with_reference_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.reference_dir = dir.into();
        self
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}
