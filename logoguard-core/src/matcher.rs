//! Closest-reference matching.
//!
//! The matcher scans every reference in the index, keeps the one with the
//! smallest Hamming distance to the query and classifies it as legitimate
//! when that distance is within the configured threshold. Ties go to the
//! lowest identifier.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MatcherConfig;
use crate::hash::PerceptualHash;
use crate::index::ReferenceIndex;

/// Distance to the best match; infinite when there was nothing to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchDistance {
    Finite(u32),
    Infinite,
}

impl MatchDistance {
    pub fn finite(&self) -> Option<u32> {
        match self {
            MatchDistance::Finite(d) => Some(*d),
            MatchDistance::Infinite => None,
        }
    }

    pub fn is_within(&self, threshold: u32) -> bool {
        matches!(self, MatchDistance::Finite(d) if *d <= threshold)
    }
}

impl Ord for MatchDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (MatchDistance::Finite(a), MatchDistance::Finite(b)) => a.cmp(b),
            (MatchDistance::Finite(_), MatchDistance::Infinite) => Ordering::Less,
            (MatchDistance::Infinite, MatchDistance::Finite(_)) => Ordering::Greater,
            (MatchDistance::Infinite, MatchDistance::Infinite) => Ordering::Equal,
        }
    }
}

impl PartialOrd for MatchDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MatchDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchDistance::Finite(d) => write!(f, "{}", d),
            MatchDistance::Infinite => f.write_str("inf"),
        }
    }
}

/// Distance from the query to one reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDistance {
    pub identifier: String,
    pub distance: u32,
}

/// Outcome of matching one query hash against the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Closest reference, `None` when the index was empty
    pub best_identifier: Option<String>,
    pub distance: MatchDistance,
    /// `distance <= threshold`
    pub is_legitimate: bool,
    /// Threshold the classification was made with
    pub threshold: u32,
    /// Distance to every reference, in ascending identifier order
    pub distances: Vec<ReferenceDistance>,
}

impl MatchResult {
    pub fn no_match(threshold: u32) -> Self {
        Self {
            best_identifier: None,
            distance: MatchDistance::Infinite,
            is_legitimate: false,
            threshold,
            distances: Vec::new(),
        }
    }

    pub fn has_match(&self) -> bool {
        self.best_identifier.is_some()
    }

    /// Raw distance values, for the distribution histogram.
    pub fn distance_values(&self) -> Vec<u32> {
        self.distances.iter().map(|d| d.distance).collect()
    }
}

/// Stateless matcher holding the legitimacy threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    threshold: u32,
}

impl Matcher {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &MatcherConfig) -> Self {
        Self::new(config.threshold)
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn find_best_match(&self, query: &PerceptualHash, index: &ReferenceIndex) -> MatchResult {
        find_best_match(query, index, self.threshold)
    }
}

/// Find the reference closest to `query`.
///
/// An empty index yields `(None, Infinite, false)`. On equal distances the
/// lexicographically smallest identifier wins.
pub fn find_best_match(
    query: &PerceptualHash,
    index: &ReferenceIndex,
    threshold: u32,
) -> MatchResult {
    if index.is_empty() {
        debug!(query = %query, "Reference index is empty, no match possible");
        return MatchResult::no_match(threshold);
    }

    let distances: Vec<ReferenceDistance> = index
        .iter()
        .map(|(identifier, hash)| ReferenceDistance {
            identifier: identifier.clone(),
            distance: query.hamming_distance(hash),
        })
        .collect();

    // Strict comparison keeps the first (smallest) identifier on ties.
    let mut best: Option<&ReferenceDistance> = None;
    for candidate in &distances {
        if best.is_none_or(|b| candidate.distance < b.distance) {
            best = Some(candidate);
        }
    }

    let (best_identifier, distance) = match best {
        Some(b) => (Some(b.identifier.clone()), MatchDistance::Finite(b.distance)),
        None => (None, MatchDistance::Infinite),
    };
    let is_legitimate = distance.is_within(threshold);

    debug!(
        query = %query,
        best = best_identifier.as_deref().unwrap_or("-"),
        distance = %distance,
        threshold,
        is_legitimate,
        "Matched query against reference index"
    );

    MatchResult {
        best_identifier,
        distance,
        is_legitimate,
        threshold,
        distances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(bits: u64) -> PerceptualHash {
        PerceptualHash::from_u64(bits)
    }

    /// Index where the zero query is 3 bits from a.png and 7 bits from b.png.
    fn two_entry_index() -> ReferenceIndex {
        [("a.png", hash(0b111)), ("b.png", hash(0b111_1111))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_empty_index_returns_no_match() {
        let result = find_best_match(&hash(0xABCD), &ReferenceIndex::new(), 5);
        assert_eq!(result.best_identifier, None);
        assert_eq!(result.distance, MatchDistance::Infinite);
        assert!(!result.is_legitimate);
        assert!(result.distances.is_empty());
        assert!(!result.has_match());
    }

    #[test]
    fn test_closest_within_threshold_is_legitimate() {
        let result = Matcher::new(5).find_best_match(&hash(0), &two_entry_index());
        assert_eq!(result.best_identifier.as_deref(), Some("a.png"));
        assert_eq!(result.distance, MatchDistance::Finite(3));
        assert!(result.is_legitimate);
    }

    #[test]
    fn test_closest_beyond_threshold_is_not_legitimate() {
        let result = Matcher::new(2).find_best_match(&hash(0), &two_entry_index());
        assert_eq!(result.best_identifier.as_deref(), Some("a.png"));
        assert_eq!(result.distance, MatchDistance::Finite(3));
        assert!(!result.is_legitimate);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let result = Matcher::new(3).find_best_match(&hash(0), &two_entry_index());
        assert!(result.is_legitimate);
    }

    #[test]
    fn test_threshold_never_changes_selection() {
        let index = two_entry_index();
        let query = hash(0b1010_0000);
        let selected: Vec<_> = (0..=64)
            .map(|t| find_best_match(&query, &index, t).best_identifier)
            .collect();
        assert!(selected.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_identical_hash_matches_with_zero_distance() {
        let index = two_entry_index();
        let result = find_best_match(&hash(0b111_1111), &index, 0);
        assert_eq!(result.best_identifier.as_deref(), Some("b.png"));
        assert_eq!(result.distance, MatchDistance::Finite(0));
        assert!(result.is_legitimate);
    }

    #[test]
    fn test_ties_break_by_identifier_ascending() {
        let index: ReferenceIndex = [
            ("zulu.png", hash(0b01)),
            ("alpha.png", hash(0b10)),
            ("mike.png", hash(0b11)),
        ]
        .into_iter()
        .collect();
        let result = find_best_match(&hash(0), &index, 5);
        assert_eq!(result.best_identifier.as_deref(), Some("alpha.png"));
        assert_eq!(result.distance, MatchDistance::Finite(1));
    }

    #[test]
    fn test_distances_cover_every_reference() {
        let result = find_best_match(&hash(0), &two_entry_index(), 5);
        assert_eq!(
            result.distances,
            vec![
                ReferenceDistance {
                    identifier: "a.png".into(),
                    distance: 3
                },
                ReferenceDistance {
                    identifier: "b.png".into(),
                    distance: 7
                },
            ]
        );
        assert_eq!(result.distance_values(), vec![3, 7]);
    }

    #[test]
    fn test_match_distance_ordering_and_display() {
        assert!(MatchDistance::Finite(64) < MatchDistance::Infinite);
        assert!(MatchDistance::Finite(1) < MatchDistance::Finite(2));
        assert_eq!(MatchDistance::Finite(4).to_string(), "4");
        assert_eq!(MatchDistance::Infinite.to_string(), "inf");
        assert!(!MatchDistance::Infinite.is_within(u32::MAX));
    }

    #[test]
    fn test_match_distance_finite() {
        assert_eq!(MatchDistance::Finite(7).finite(), Some(7));
        assert_eq!(MatchDistance::Infinite.finite(), None);
    }

    #[test]
    fn test_from_config_uses_threshold() {
        let config = MatcherConfig::default().with_threshold(9);
        assert_eq!(Matcher::from_config(&config).threshold(), 9);
    }

    #[test]
    fn test_result_serializes() {
        let result = find_best_match(&hash(0), &two_entry_index(), 5);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["best_identifier"], "a.png");
        assert_eq!(json["distance"], serde_json::json!({ "finite": 3 }));
        assert_eq!(json["is_legitimate"], true);

        let empty = serde_json::to_value(MatchResult::no_match(5)).unwrap();
        assert_eq!(empty["distance"], "infinite");
    }
}
