//! LogoGuard Core - perceptual logo matching library
//!
//! This crate checks whether a logo image perceptually matches one of a fixed
//! set of reference logos.
//!
//! # Features
//!
//! - 64-bit perceptual hashes (average hash, or Blockhash as an alternative)
//! - Reference index built once from a directory, tolerant of corrupt files
//! - Minimum-distance matcher with a fixed legitimacy threshold
//! - Per-session legitimacy tally and the data behind the analytics displays
//!
//! # Example
//!
//! ```no_run
//! use logoguard_core::{Matcher, MatcherConfig, PerceptualHasher, ReferenceIndex};
//!
//! # fn example() -> logoguard_core::Result<()> {
//! let config = MatcherConfig::default().with_reference_dir("Logos");
//! let build = ReferenceIndex::build(&config)?;
//!
//! let hasher = PerceptualHasher::new(config.algorithm);
//! let query = hasher.hash_file("upload.png")?;
//!
//! let result = Matcher::from_config(&config).find_best_match(&query, &build.index);
//! if result.is_legitimate {
//!     println!("matches {}", result.best_identifier.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod hash;
pub mod index;
pub mod matcher;
pub mod session;

// Re-export main types for convenience
pub use analytics::{
    DistanceHistogram, EpochMetrics, HistogramBin, LegitimacyBreakdown, PerformanceCurve,
    DEFAULT_EPOCHS, DEFAULT_HISTOGRAM_BINS,
};
pub use config::{MatcherConfig, DEFAULT_REFERENCE_DIR, DEFAULT_THRESHOLD};
pub use error::{LogoGuardError, Result};
pub use hash::{HashAlgorithm, PerceptualHash, PerceptualHasher, PERCEPTUAL_HASH_SIZE};
pub use index::{
    is_reference_image_name, IndexBuild, ReferenceIndex, SkippedReference,
    REFERENCE_EXTENSIONS,
};
pub use matcher::{find_best_match, MatchDistance, MatchResult, Matcher, ReferenceDistance};
pub use session::SessionTally;
