// src/core/analyzer.rs
//
// Per-file forensic pipeline: metadata and signal loading run side by side,
// then spectral analysis, cutoff estimation and classification.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use super::analysis::{CutoffEstimator, SpectralAnalyzer};
use super::decoder::{load_signal, AnalysisWindow};
use super::error::{AnalysisFailure, StageError};
use super::metadata::extract_metadata;
use crate::config::AnalysisConfig;
use crate::detection::{classify, AnalysisResult, AudioRef};

/// Stateless analyzer shared by all tasks of a session
pub struct AudioAnalyzer {
    window: AnalysisWindow,
    spectral: SpectralAnalyzer,
    estimator: CutoffEstimator,
}

impl AudioAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            window: AnalysisWindow {
                offset_secs: config.offset_secs,
                duration_secs: config.duration_secs,
            },
            spectral: SpectralAnalyzer::from_config(config),
            estimator: CutoffEstimator::new(config.cutoff_threshold_db),
        }
    }

    /// Analyze one file end to end
    pub fn analyze(&self, audio_ref: &AudioRef) -> Result<AnalysisResult, AnalysisFailure> {
        let path = audio_ref.path();
        let fail = |e: StageError| AnalysisFailure::new(path, e);

        let (metadata, signal) = rayon::join(
            || extract_metadata(path),
            || load_signal(path, &self.window),
        );
        let metadata = metadata.map_err(fail)?;
        let signal = signal.map_err(fail)?;

        log::debug!(
            "{}: decoded {:.1}s from {:.1}s at {} Hz",
            audio_ref.file_name(),
            signal.duration_secs(),
            signal.start_secs,
            signal.sample_rate
        );

        let spectral = self.spectral.analyze(&signal).map_err(fail)?;
        let cutoff = self
            .estimator
            .estimate(&spectral.mean_magnitude_db, &spectral.frequencies);
        let verdict = classify(cutoff.frequency_hz);

        Ok(AnalysisResult {
            audio_ref: audio_ref.clone(),
            specs: Some(metadata.specs),
            encoder: metadata.encoder,
            cutoff,
            verdict,
            spectrogram: Some(Arc::new(spectral.spectrogram)),
            failure: None,
            analyzed_at: Utc::now(),
        })
    }

    /// Convenience wrapper for a bare path
    pub fn analyze_path<P: AsRef<Path>>(&self, path: P) -> Result<AnalysisResult, AnalysisFailure> {
        self.analyze(&AudioRef::new(path))
    }
}

impl Default for AudioAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}
