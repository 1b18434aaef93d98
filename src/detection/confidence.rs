//! Confidence scores for simulated matches
//!
//! The score carries no statistical meaning. It only feeds the "% match"
//! badge, so it is drawn uniformly and mapped into a fixed band.

use rand::Rng;

/// Source of uniform samples in [0, 1)
pub trait ConfidenceSource: Send + Sync {
    fn unit_sample(&self) -> f64;
}

/// Thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomConfidence;

impl ConfidenceSource for RandomConfidence {
    fn unit_sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Always returns the same sample. Used to make scores reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedConfidence(pub f64);

impl ConfidenceSource for FixedConfidence {
    fn unit_sample(&self) -> f64 {
        self.0
    }
}

/// Half-open interval `[low, high)` that scores are mapped into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceBand {
    pub low: f64,
    pub high: f64,
}

impl ConfidenceBand {
    /// Band used for every simulated match
    pub const DETECTION: ConfidenceBand = ConfidenceBand { low: 0.88, high: 0.98 };

    /// Map a unit sample linearly into the band.
    ///
    /// Samples outside [0, 1) (or NaN) are clamped, and the result is kept
    /// strictly below `high` even when rounding would land on it.
    pub fn map(&self, unit: f64) -> f64 {
        let unit = if unit.is_nan() { 0.0 } else { unit.clamp(0.0, 1.0) };
        let value = self.low + unit * (self.high - self.low);
        if value >= self.high {
            self.high - f64::EPSILON
        } else {
            value
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value < self.high
    }
}

impl Default for ConfidenceBand {
    fn default() -> Self {
        Self::DETECTION
    }
}
