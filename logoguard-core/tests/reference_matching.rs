//! End-to-end tests: build a reference index from a directory of generated
//! logos and match uploads against it.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
use logoguard_core::{
    HashAlgorithm, LogoGuardError, MatchDistance, Matcher, MatcherConfig, PerceptualHasher,
    ReferenceIndex, SessionTally,
};
use tempfile::TempDir;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Left half white, right half black.
fn vertical_split(size: u32) -> RgbImage {
    ImageBuffer::from_fn(size, size, |x, _| if x < size / 2 { WHITE } else { BLACK })
}

/// Top half white, bottom half black.
fn horizontal_split(size: u32) -> RgbImage {
    ImageBuffer::from_fn(size, size, |_, y| if y < size / 2 { WHITE } else { BLACK })
}

/// 4x4 checkerboard.
fn checkerboard(size: u32) -> RgbImage {
    let cell = size / 4;
    ImageBuffer::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            WHITE
        } else {
            BLACK
        }
    })
}

fn reencode_jpeg(img: &RgbImage, quality: u8) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    DynamicImage::ImageRgb8(img.clone())
        .write_with_encoder(encoder)
        .expect("JPEG encoding failed");
    buffer.into_inner()
}

/// Reference directory with three logos plus files the builder must ignore or skip.
fn reference_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let path = dir.path();

    vertical_split(64).save(path.join("acme.png")).unwrap();
    horizontal_split(64).save(path.join("globex.png")).unwrap();
    checkerboard(64).save(path.join("initech.jpg")).unwrap();

    std::fs::write(path.join("broken.png"), b"not really a png").unwrap();
    std::fs::write(path.join("readme.txt"), b"reference logos").unwrap();
    checkerboard(64).save(path.join("SHOUTY.PNG")).unwrap();
    std::fs::create_dir(path.join("nested.png")).unwrap();

    dir
}

fn config_for(dir: &Path) -> MatcherConfig {
    MatcherConfig::default().with_reference_dir(dir)
}

#[test]
fn test_build_indexes_images_and_skips_broken_files() {
    let dir = reference_dir();
    let build = ReferenceIndex::build(&config_for(dir.path())).expect("build failed");

    let ids: Vec<&str> = build.index.identifiers().collect();
    assert_eq!(ids, ["acme.png", "globex.png", "initech.jpg"]);

    assert!(!build.is_complete());
    assert_eq!(build.skipped.len(), 1);
    assert_eq!(build.skipped[0].identifier, "broken.png");
    assert!(build.skipped[0].reason.contains("decode"));
}

#[test]
fn test_build_empty_directory() {
    let dir = TempDir::new().unwrap();
    let build = ReferenceIndex::build(&config_for(dir.path())).unwrap();
    assert!(build.index.is_empty());
    assert!(build.is_complete());
}

#[test]
fn test_build_missing_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");
    let err = ReferenceIndex::build(&config_for(&missing)).unwrap_err();
    assert!(matches!(err, LogoGuardError::ReferenceDirectory { .. }));
}

#[test]
fn test_identical_upload_matches_with_zero_distance() {
    let dir = reference_dir();
    let config = config_for(dir.path());
    let build = ReferenceIndex::build(&config).unwrap();

    let upload = std::fs::read(dir.path().join("globex.png")).unwrap();
    let query = PerceptualHasher::new(config.algorithm)
        .hash_bytes(&upload)
        .unwrap();

    for threshold in [0, 5, 64] {
        let result = Matcher::new(threshold).find_best_match(&query, &build.index);
        assert_eq!(result.best_identifier.as_deref(), Some("globex.png"));
        assert_eq!(result.distance, MatchDistance::Finite(0));
        assert!(result.is_legitimate);
        assert_eq!(result.distances.len(), 3);
    }
}

#[test]
fn test_recompressed_upload_still_matches() {
    let dir = reference_dir();
    let config = config_for(dir.path());
    let build = ReferenceIndex::build(&config).unwrap();

    let upload = reencode_jpeg(&vertical_split(64), 85);
    let query = PerceptualHasher::new(config.algorithm)
        .hash_bytes(&upload)
        .unwrap();
    let result = Matcher::from_config(&config).find_best_match(&query, &build.index);

    assert_eq!(result.best_identifier.as_deref(), Some("acme.png"));
    assert!(result.distance <= MatchDistance::Finite(config.threshold));
    assert!(result.is_legitimate);
}

#[test]
fn test_unrelated_upload_is_not_legitimate() {
    let dir = TempDir::new().unwrap();
    vertical_split(64).save(dir.path().join("acme.png")).unwrap();
    let config = config_for(dir.path());
    let build = ReferenceIndex::build(&config).unwrap();

    let query = PerceptualHasher::new(config.algorithm)
        .hash_image(&DynamicImage::ImageRgb8(horizontal_split(64)));
    let result = Matcher::from_config(&config).find_best_match(&query, &build.index);

    assert_eq!(result.best_identifier.as_deref(), Some("acme.png"));
    assert!(!result.is_legitimate, "distance was {}", result.distance);
}

#[test]
fn test_empty_index_reports_no_match() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path());
    let build = ReferenceIndex::build(&config).unwrap();

    let query = PerceptualHasher::default().hash_image(&DynamicImage::ImageRgb8(checkerboard(64)));
    let result = Matcher::from_config(&config).find_best_match(&query, &build.index);

    assert_eq!(result.best_identifier, None);
    assert_eq!(result.distance, MatchDistance::Infinite);
    assert!(!result.is_legitimate);

    let mut tally = SessionTally::new();
    tally.record(&result);
    assert_eq!(tally.total(), 0);
}

#[test]
fn test_blockhash_index_matches_identical_upload() {
    let dir = reference_dir();
    let config = config_for(dir.path()).with_algorithm(HashAlgorithm::Blockhash64);
    let build = ReferenceIndex::build(&config).unwrap();
    assert_eq!(build.index.len(), 3);

    let query = PerceptualHasher::new(HashAlgorithm::Blockhash64)
        .hash_file(dir.path().join("initech.jpg"))
        .unwrap();
    let result = Matcher::from_config(&config).find_best_match(&query, &build.index);

    assert_eq!(result.best_identifier.as_deref(), Some("initech.jpg"));
    assert_eq!(result.distance, MatchDistance::Finite(0));
}

#[test]
fn test_session_tally_accumulates_over_uploads() {
    let dir = reference_dir();
    let config = config_for(dir.path());
    let build = ReferenceIndex::build(&config).unwrap();
    let hasher = PerceptualHasher::new(config.algorithm);
    let matcher = Matcher::from_config(&config);

    let mut tally = SessionTally::new();
    for name in ["acme.png", "globex.png", "initech.jpg"] {
        let query = hasher.hash_file(dir.path().join(name)).unwrap();
        tally.record(&matcher.find_best_match(&query, &build.index));
    }

    assert_eq!(tally.legitimate(), 3);
    assert_eq!(tally.non_legitimate(), 0);
}
