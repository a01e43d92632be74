// src/core/analysis/cutoff.rs
//
// Cutoff estimation: the highest frequency whose averaged level stays above
// a fixed threshold relative to the spectrum peak.

use crate::detection::CutoffEstimate;

/// Policy threshold in dB relative to the peak of the averaged spectrum
pub const DEFAULT_THRESHOLD_DB: f32 = -52.0;

#[derive(Debug, Clone, Copy)]
pub struct CutoffEstimator {
    threshold_db: f32,
}

impl Default for CutoffEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_DB)
    }
}

impl CutoffEstimator {
    pub fn new(threshold_db: f32) -> Self {
        Self { threshold_db }
    }

    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    /// Center frequency of the highest bin strictly above the threshold,
    /// or 0 Hz when no bin qualifies.
    pub fn estimate(&self, spectrum_db: &[f32], frequencies: &[f32]) -> CutoffEstimate {
        let cutoff = spectrum_db
            .iter()
            .zip(frequencies.iter())
            .rev()
            .find(|&(&db, _)| db > self.threshold_db)
            .map_or(0.0, |(_, &hz)| hz);

        CutoffEstimate::new(cutoff)
    }
}
