// src/core/analysis/spectral.rs
//
// Spectral analysis over a mono buffer. One STFT pass feeds both products:
// the time-averaged magnitude spectrum used for cutoff estimation and the
// mel power spectrogram kept for visualisation.

use crate::config::AnalysisConfig;
use crate::core::decoder::SignalBuffer;
use crate::core::dsp::{self, MelFilterbank, Stft};
use crate::core::error::{StageError, StageResult};
use crate::detection::SpectrogramData;

/// Output of the spectral stage
#[derive(Debug, Clone)]
pub struct SpectralAnalysis {
    /// Per-bin mean STFT magnitude in dB relative to its own peak
    pub mean_magnitude_db: Vec<f32>,
    /// Center frequency of each bin in Hz
    pub frequencies: Vec<f32>,
    /// Mel power spectrogram, dB relative to its peak
    pub spectrogram: SpectrogramData,
}

impl SpectralAnalysis {
    /// Width of one frequency bin in Hz
    pub fn bin_resolution(&self) -> f32 {
        self.frequencies.get(1).copied().unwrap_or(0.0)
    }
}

/// Spectral analyzer with configurable framing
pub struct SpectralAnalyzer {
    stft: Stft,
    n_mels: usize,
    top_db: f32,
}

impl SpectralAnalyzer {
    pub fn new(n_fft: usize, hop_length: usize, n_mels: usize, top_db: f32) -> Self {
        Self {
            stft: Stft::new(n_fft, hop_length),
            n_mels,
            top_db,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.n_fft, config.hop_length, config.n_mels, config.top_db)
    }

    pub fn fft_size(&self) -> usize {
        self.stft.n_fft()
    }

    pub fn analyze(&self, signal: &SignalBuffer) -> StageResult<SpectralAnalysis> {
        self.analyze_samples(&signal.samples, signal.sample_rate)
    }

    /// Run both transforms over `samples` recorded at `sample_rate`
    pub fn analyze_samples(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> StageResult<SpectralAnalysis> {
        if samples.is_empty() {
            return Err(StageError::transform("empty sample buffer"));
        }
        if sample_rate == 0 {
            return Err(StageError::transform("sample rate is zero"));
        }
        if let Some(pos) = samples.iter().position(|s| !s.is_finite()) {
            return Err(StageError::transform(format!(
                "non-finite sample at index {}",
                pos
            )));
        }

        let n_bins = self.stft.n_bins();
        let n_frames = self.stft.num_frames(samples.len());
        let filterbank = MelFilterbank::new(self.n_mels, self.stft.n_fft(), sample_rate);

        let mut magnitude_sum = vec![0.0f64; n_bins];
        // band-major so each band's frames are contiguous
        let mut mel_power = vec![0.0f32; self.n_mels * n_frames];
        let mut power = vec![0.0f32; n_bins];
        let mut mel_frame = vec![0.0f32; self.n_mels];

        self.stft.for_each_frame(samples, |frame, magnitudes| {
            for ((sum, p), &m) in magnitude_sum.iter_mut().zip(power.iter_mut()).zip(magnitudes) {
                *sum += m as f64;
                *p = m * m;
            }
            filterbank.apply(&power, &mut mel_frame);
            for (band, &value) in mel_frame.iter().enumerate() {
                mel_power[band * n_frames + frame] = value;
            }
        });

        let mean_magnitude: Vec<f32> = magnitude_sum
            .iter()
            .map(|&s| (s / n_frames as f64) as f32)
            .collect();
        if mean_magnitude.iter().any(|m| !m.is_finite()) {
            return Err(StageError::transform("averaged spectrum is not finite"));
        }

        let mean_magnitude_db = dsp::amplitude_to_db(&mean_magnitude, self.top_db);
        let mel_power_db: Vec<Vec<f32>> = dsp::power_to_db(&mel_power, self.top_db)
            .chunks(n_frames)
            .map(|band| band.to_vec())
            .collect();

        log::debug!(
            "STFT: {} frames x {} bins, mel: {} bands at {} Hz",
            n_frames,
            n_bins,
            mel_power_db.len(),
            sample_rate
        );

        Ok(SpectralAnalysis {
            mean_magnitude_db,
            frequencies: self.stft.frequencies(sample_rate),
            spectrogram: SpectrogramData {
                mel_power_db,
                sample_rate_hz: sample_rate,
                hop_length: self.stft.hop_length(),
            },
        })
    }
}
