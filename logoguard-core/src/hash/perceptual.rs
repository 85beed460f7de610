//! Perceptual hash computation and comparison.
//!
//! # Algorithms
//!
//! - **Average hash** (default): the image is converted to grayscale and
//!   downsampled to an 8x8 grid; each bit records whether the corresponding
//!   cell is brighter than the grid mean.
//! - **Blockhash64**: grid-based block mean hash, also 64 bits.
//!
//! Hashes from different algorithms are not comparable with each other.
//!
//! # Usage
//!
//! ```no_run
//! use logoguard_core::hash::{HashAlgorithm, PerceptualHasher};
//!
//! let hasher = PerceptualHasher::new(HashAlgorithm::AverageHash);
//! let hash1 = hasher.hash_bytes(&std::fs::read("logo.png").unwrap()).unwrap();
//! let hash2 = hasher.hash_file("upload.jpg").unwrap();
//!
//! let similar = hash1.hamming_distance(&hash2) <= 5;
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use blockhash::{blockhash64, Blockhash64};
use image::imageops::{self, FilterType};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LogoGuardError, Result};

/// Fixed hash size in bytes (64 bits = 8 bytes).
pub const PERCEPTUAL_HASH_SIZE: usize = 8;

/// Side length of the grid the average hash downsamples to.
const AVERAGE_HASH_GRID: u32 = 8;

/// Perceptual hash algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// Mean-threshold hash over an 8x8 grayscale thumbnail.
    #[default]
    #[serde(rename = "average")]
    AverageHash,
    /// Blockhash64 - grid-based block mean hash.
    #[serde(rename = "blockhash")]
    Blockhash64,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::AverageHash => "average",
            HashAlgorithm::Blockhash64 => "blockhash",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = LogoGuardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" | "ahash" | "average-hash" => Ok(HashAlgorithm::AverageHash),
            "blockhash" | "blockhash64" => Ok(HashAlgorithm::Blockhash64),
            other => Err(LogoGuardError::InvalidConfig(format!(
                "unknown hash algorithm '{}' (expected 'average' or 'blockhash')",
                other
            ))),
        }
    }
}

/// A 64-bit perceptual hash.
///
/// Bit order is row-major over the hash grid, first cell in the most
/// significant bit of the first byte. Serialized as 16 lowercase hex chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PerceptualHash([u8; PERCEPTUAL_HASH_SIZE]);

impl PerceptualHash {
    pub const fn new(bytes: [u8; PERCEPTUAL_HASH_SIZE]) -> Self {
        Self(bytes)
    }

    pub const fn from_u64(value: u64) -> Self {
        Self(value.to_be_bytes())
    }

    pub fn as_u64(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; PERCEPTUAL_HASH_SIZE] {
        &self.0
    }

    /// Number of differing bits between two hashes.
    pub fn hamming_distance(&self, other: &Self) -> u32 {
        (self.as_u64() ^ other.as_u64()).count_ones()
    }

    /// Check if two hashes are within `threshold` bits of each other.
    pub fn is_similar(&self, other: &Self, threshold: u32) -> bool {
        self.hamming_distance(other) <= threshold
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Parse a hash from exactly 16 hex characters.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| LogoGuardError::InvalidHash(format!("invalid hex string: {}", e)))?;
        let bytes: [u8; PERCEPTUAL_HASH_SIZE] = bytes.try_into().map_err(|b: Vec<u8>| {
            LogoGuardError::InvalidHash(format!(
                "expected {} bytes, got {}",
                PERCEPTUAL_HASH_SIZE,
                b.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for PerceptualHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<PerceptualHash> for String {
    fn from(hash: PerceptualHash) -> Self {
        hash.to_hex()
    }
}

impl TryFrom<String> for PerceptualHash {
    type Error = LogoGuardError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

/// Perceptual hasher configuration and computation.
#[derive(Debug, Clone, Default)]
pub struct PerceptualHasher {
    algorithm: HashAlgorithm,
}

impl PerceptualHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Compute the hash of an image file on disk.
    pub fn hash_file(&self, path: impl AsRef<Path>) -> Result<PerceptualHash> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| LogoGuardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let hash = self.hash_bytes(&data)?;
        debug!(path = %path.display(), hash = %hash, algorithm = %self.algorithm, "Hashed image file");
        Ok(hash)
    }

    /// Compute the hash from encoded image bytes (PNG or JPEG).
    pub fn hash_bytes(&self, image_data: &[u8]) -> Result<PerceptualHash> {
        let image = image::load_from_memory(image_data)
            .map_err(|e| LogoGuardError::Decode(e.to_string()))?;

        Ok(self.hash_image(&image))
    }

    /// Compute the hash of an already decoded image.
    pub fn hash_image(&self, image: &DynamicImage) -> PerceptualHash {
        match self.algorithm {
            HashAlgorithm::AverageHash => average_hash(image),
            HashAlgorithm::Blockhash64 => {
                let hash: Blockhash64 = blockhash64(image);
                let hash_bytes: [u8; PERCEPTUAL_HASH_SIZE] = hash.into();
                PerceptualHash::new(hash_bytes)
            }
        }
    }

    /// Check if the provided bytes appear to be a supported image format.
    pub fn is_supported_format(data: &[u8]) -> bool {
        matches!(
            image::guess_format(data),
            Ok(image::ImageFormat::Png | image::ImageFormat::Jpeg)
        )
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

fn average_hash(image: &DynamicImage) -> PerceptualHash {
    let gray = image.to_luma8();
    let thumb = imageops::resize(
        &gray,
        AVERAGE_HASH_GRID,
        AVERAGE_HASH_GRID,
        FilterType::Lanczos3,
    );

    let pixels = thumb.as_raw();
    let mean = pixels.iter().map(|&p| f64::from(p)).sum::<f64>() / pixels.len() as f64;

    let mut bytes = [0u8; PERCEPTUAL_HASH_SIZE];
    for (i, &pixel) in pixels.iter().enumerate() {
        if f64::from(pixel) > mean {
            bytes[i / 8] |= 0x80 >> (i % 8);
        }
    }
    PerceptualHash::new(bytes)
}
