//! Data behind the analytics displays.
//!
//! Three displays are supported, each fed by values computed here and drawn
//! by the caller:
//!
//! - a model-performance curve (synthetic accuracy/loss, regenerated on
//!   every call; there is no trained model behind it),
//! - a histogram of distances from one upload to every reference,
//! - a legitimate vs. non-legitimate breakdown of a session tally.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{LogoGuardError, Result};
use crate::session::SessionTally;

pub const DEFAULT_EPOCHS: u32 = 10;
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

const ACCURACY_RANGE: std::ops::Range<f64> = 0.7..1.0;
const LOSS_RANGE: std::ops::Range<f64> = 0.1..0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: u32,
    pub accuracy: f64,
    pub loss: f64,
}

/// Synthetic accuracy/loss per epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCurve {
    pub epochs: Vec<EpochMetrics>,
}

impl PerformanceCurve {
    /// Draw accuracy from `[0.7, 1.0)` and loss from `[0.1, 0.5)` for epochs `1..=epochs`.
    pub fn synthetic<R: Rng>(rng: &mut R, epochs: u32) -> Self {
        let epochs = (1..=epochs)
            .map(|epoch| EpochMetrics {
                epoch,
                accuracy: rng.random_range(ACCURACY_RANGE),
                loss: rng.random_range(LOSS_RANGE),
            })
            .collect();
        Self { epochs }
    }

    pub fn random(epochs: u32) -> Self {
        Self::synthetic(&mut rand::rng(), epochs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// Equal-width histogram of hash distances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceHistogram {
    pub bins: Vec<HistogramBin>,
}

impl DistanceHistogram {
    /// Bin `distances` into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// Every bin is half-open except the last, which also holds `max`. A
    /// single distinct value gets the range `[v - 0.5, v + 0.5]`; no values
    /// give `[0, 1]` with empty bins.
    pub fn from_distances(distances: &[u32], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(LogoGuardError::InvalidConfig(
                "histogram needs at least one bin".into(),
            ));
        }

        let (lo, hi) = match (distances.iter().min(), distances.iter().max()) {
            (Some(&min), Some(&max)) if min == max => (f64::from(min) - 0.5, f64::from(max) + 0.5),
            (Some(&min), Some(&max)) => (f64::from(min), f64::from(max)),
            _ => (0.0, 1.0),
        };

        let edges: Vec<f64> = (0..=bins)
            .map(|i| lo + (hi - lo) * i as f64 / bins as f64)
            .collect();
        let mut counts = vec![0u64; bins];

        for &d in distances {
            let v = f64::from(d);
            let mut idx = (((v - lo) / (hi - lo)) * bins as f64) as usize;
            idx = idx.min(bins - 1);
            // Float rounding can land a value one bin off near an edge.
            if idx > 0 && v < edges[idx] {
                idx -= 1;
            } else if idx + 1 < bins && v >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: edges[i],
                upper: edges[i + 1],
                count,
            })
            .collect();
        Ok(Self { bins })
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Legitimate vs. non-legitimate split of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegitimacyBreakdown {
    pub legitimate: u64,
    pub non_legitimate: u64,
    /// `None` when nothing has been counted yet
    pub legitimate_pct: Option<f64>,
    pub non_legitimate_pct: Option<f64>,
}

impl LegitimacyBreakdown {
    pub fn from_tally(tally: &SessionTally) -> Self {
        let total = tally.total();
        let pct = |n: u64| (total > 0).then(|| n as f64 * 100.0 / total as f64);
        Self {
            legitimate: tally.legitimate(),
            non_legitimate: tally.non_legitimate(),
            legitimate_pct: pct(tally.legitimate()),
            non_legitimate_pct: pct(tally.non_legitimate()),
        }
    }

    pub fn total(&self) -> u64 {
        self.legitimate + self.non_legitimate
    }
}
