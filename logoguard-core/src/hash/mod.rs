//! Perceptual hashing of logo images.
//!
//! A perceptual hash is a 64-bit fingerprint of an image's visual content:
//! visually similar images produce hashes that differ in few bits, unrelated
//! images produce hashes that differ in roughly half of them.

pub mod perceptual;

pub use perceptual::*;
