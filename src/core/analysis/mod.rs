//! Audio analysis algorithms
//!
//! - Spectral analysis (averaged magnitude spectrum, mel spectrogram)
//! - Cutoff estimation against a peak-relative threshold

mod cutoff;
mod spectral;

pub use cutoff::{CutoffEstimator, DEFAULT_THRESHOLD_DB};
pub use spectral::{SpectralAnalysis, SpectralAnalyzer};
