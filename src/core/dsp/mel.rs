// src/core/dsp/mel.rs
//
// Mel filterbank (Slaney scale, area-normalised triangles) applied to STFT
// power spectra.

/// Linear region spacing of the Slaney mel scale, in Hz per mel
const F_SP: f32 = 200.0 / 3.0;
/// Start of the logarithmic region
const MIN_LOG_HZ: f32 = 1000.0;
const MIN_LOG_MEL: f32 = MIN_LOG_HZ / F_SP;

fn log_step() -> f32 {
    6.4f32.ln() / 27.0
}

/// Hz to mel on the Slaney scale (linear below 1 kHz, logarithmic above)
pub fn hz_to_mel(hz: f32) -> f32 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Inverse of [`hz_to_mel`]
pub fn mel_to_hz(mel: f32) -> f32 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        mel * F_SP
    }
}

/// One triangular filter stored sparsely
#[derive(Debug, Clone)]
struct MelBand {
    first_bin: usize,
    weights: Vec<f32>,
}

/// Bank of `n_mels` triangular filters spanning 0 Hz to Nyquist
#[derive(Debug, Clone)]
pub struct MelFilterbank {
    bands: Vec<MelBand>,
    n_bins: usize,
}

impl MelFilterbank {
    pub fn new(n_mels: usize, n_fft: usize, sample_rate: u32) -> Self {
        let n_bins = n_fft / 2 + 1;
        let nyquist = sample_rate as f32 / 2.0;
        let fft_freqs: Vec<f32> = (0..n_bins)
            .map(|k| k as f32 * sample_rate as f32 / n_fft as f32)
            .collect();

        // n_mels + 2 edge frequencies evenly spaced in mel
        let mel_max = hz_to_mel(nyquist);
        let edges: Vec<f32> = (0..n_mels + 2)
            .map(|i| mel_to_hz(mel_max * i as f32 / (n_mels + 1) as f32))
            .collect();

        let bands = (0..n_mels)
            .map(|m| {
                let (lo, center, hi) = (edges[m], edges[m + 1], edges[m + 2]);
                let rise = center - lo;
                let fall = hi - center;
                let norm = if hi > lo { 2.0 / (hi - lo) } else { 0.0 };

                let weights: Vec<(usize, f32)> = fft_freqs
                    .iter()
                    .enumerate()
                    .filter_map(|(k, &f)| {
                        let lower = if rise > 0.0 { (f - lo) / rise } else { 0.0 };
                        let upper = if fall > 0.0 { (hi - f) / fall } else { 0.0 };
                        let w = lower.min(upper).max(0.0) * norm;
                        (w > 0.0).then_some((k, w))
                    })
                    .collect();

                match (weights.first(), weights.last()) {
                    (Some(&(first, _)), Some(&(last, _))) => {
                        let mut dense = vec![0.0f32; last - first + 1];
                        for (k, w) in weights {
                            dense[k - first] = w;
                        }
                        MelBand {
                            first_bin: first,
                            weights: dense,
                        }
                    }
                    // narrower than one FFT bin; the band stays empty
                    _ => MelBand {
                        first_bin: 0,
                        weights: Vec::new(),
                    },
                }
            })
            .collect();

        Self { bands, n_bins }
    }

    pub fn n_mels(&self) -> usize {
        self.bands.len()
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Project a power spectrum (`n_bins` long) onto the mel bands
    pub fn apply(&self, power: &[f32], out: &mut [f32]) {
        for (band, slot) in self.bands.iter().zip(out.iter_mut()) {
            let end = (band.first_bin + band.weights.len()).min(power.len());
            let start = band.first_bin.min(end);
            *slot = power[start..end]
                .iter()
                .zip(band.weights.iter())
                .map(|(p, w)| p * w)
                .sum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slaney_scale_anchor_points() {
        assert_eq!(hz_to_mel(0.0), 0.0);
        assert!((hz_to_mel(1000.0) - 15.0).abs() < 1e-4);
        // linear region
        assert!((hz_to_mel(500.0) - 7.5).abs() < 1e-4);
    }

    #[test]
    fn test_mel_roundtrip() {
        for hz in [0.0f32, 200.0, 999.0, 1000.0, 4000.0, 16000.0, 22050.0] {
            let back = mel_to_hz(hz_to_mel(hz));
            assert!((back - hz).abs() < hz.max(1.0) * 1e-4, "{} -> {}", hz, back);
        }
    }

    #[test]
    fn test_filterbank_shape() {
        let bank = MelFilterbank::new(128, 2048, 44100);
        assert_eq!(bank.n_mels(), 128);
        assert_eq!(bank.n_bins(), 1025);
    }

    #[test]
    fn test_high_band_responds_to_high_frequency_power() {
        let bank = MelFilterbank::new(128, 2048, 44100);
        let mut power = vec![0.0f32; 1025];
        // bin 900 ~ 19.4 kHz
        power[900] = 1.0;

        let mut mel = vec![0.0f32; 128];
        bank.apply(&power, &mut mel);

        let loudest = mel
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc })
            .0;
        assert!(loudest > 110, "band {}", loudest);
        assert!(mel[..64].iter().all(|&v| v == 0.0));
    }
}
