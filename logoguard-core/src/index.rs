//! Reference index: identifier -> perceptual hash.
//!
//! Built once from a directory of reference logos and read-only afterwards.
//! Entries are kept in ascending identifier order, which is also the order
//! the matcher scans them in.

use std::collections::btree_map::{self, BTreeMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::MatcherConfig;
use crate::error::{LogoGuardError, Result};
use crate::hash::{PerceptualHash, PerceptualHasher};

/// File name suffixes recognized as reference images (case-sensitive).
pub const REFERENCE_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

/// Whether a file name is picked up by the reference index builder.
pub fn is_reference_image_name(name: &str) -> bool {
    REFERENCE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Mapping from reference identifier (file name) to its hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceIndex {
    entries: BTreeMap<String, PerceptualHash>,
}

/// A reference file that matched the extension filter but could not be hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedReference {
    pub identifier: String,
    pub reason: String,
}

/// Outcome of building an index from a directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexBuild {
    pub index: ReferenceIndex,
    pub skipped: Vec<SkippedReference>,
}

impl IndexBuild {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from `config.reference_dir`.
    ///
    /// Fails only if the directory itself cannot be read. Files that match
    /// the extension filter but cannot be read or decoded are skipped and
    /// reported in [`IndexBuild::skipped`].
    pub fn build(config: &MatcherConfig) -> Result<IndexBuild> {
        let dir = config.reference_dir.as_path();
        let hasher = PerceptualHasher::new(config.algorithm);

        let mut candidates = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|source| directory_error(dir, source))? {
            let entry = entry.map_err(|source| directory_error(dir, source))?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                debug!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };
            if !is_reference_image_name(&name) {
                debug!(file = %name, "Ignoring non-image file");
                continue;
            }
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                debug!(file = %name, "Ignoring directory");
                continue;
            }
            candidates.push(name);
        }
        candidates.sort();

        let mut build = IndexBuild::default();
        for name in candidates {
            match hasher.hash_file(dir.join(&name)) {
                Ok(hash) => {
                    build.index.insert(name, hash);
                }
                Err(err) => {
                    warn!(file = %name, error = %err, "Skipping unreadable reference image");
                    build.skipped.push(SkippedReference {
                        identifier: name,
                        reason: err.describe(),
                    });
                }
            }
        }

        info!(
            dir = %dir.display(),
            algorithm = %config.algorithm,
            indexed = build.index.len(),
            skipped = build.skipped.len(),
            "Built reference index"
        );
        Ok(build)
    }

    /// Insert an entry, returning the hash it replaced if the identifier existed.
    pub fn insert(
        &mut self,
        identifier: impl Into<String>,
        hash: PerceptualHash,
    ) -> Option<PerceptualHash> {
        self.entries.insert(identifier.into(), hash)
    }

    pub fn get(&self, identifier: &str) -> Option<&PerceptualHash> {
        self.entries.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending identifier order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, PerceptualHash> {
        self.entries.iter()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, PerceptualHash)> for ReferenceIndex {
    fn from_iter<I: IntoIterator<Item = (S, PerceptualHash)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (identifier, hash) in iter {
            index.insert(identifier, hash);
        }
        index
    }
}

impl<'a> IntoIterator for &'a ReferenceIndex {
    type Item = (&'a String, &'a PerceptualHash);
    type IntoIter = btree_map::Iter<'a, String, PerceptualHash>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn directory_error(dir: &Path, source: std::io::Error) -> LogoGuardError {
    LogoGuardError::ReferenceDirectory {
        path: dir.to_path_buf(),
        source,
    }
}
