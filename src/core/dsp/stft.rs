//! Short-time Fourier transform over a mono buffer

use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use super::windows::hann;

/// Centered STFT with a periodic Hann window.
///
/// The signal is zero-padded by `n_fft / 2` on both sides so frame `t` is
/// centered on sample `t * hop_length`.
pub struct Stft {
    n_fft: usize,
    hop_length: usize,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
}

impl Stft {
    pub fn new(n_fft: usize, hop_length: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n_fft);
        Self {
            n_fft,
            hop_length,
            window: hann(n_fft),
            fft,
        }
    }

    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Number of non-negative frequency bins
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Number of frames produced for a signal of `len` samples
    pub fn num_frames(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            1 + len / self.hop_length
        }
    }

    /// Center frequency of every bin, 0 Hz to Nyquist inclusive
    pub fn frequencies(&self, sample_rate: u32) -> Vec<f32> {
        let resolution = sample_rate as f32 / self.n_fft as f32;
        (0..self.n_bins()).map(|k| k as f32 * resolution).collect()
    }

    /// Run the transform, handing each frame's magnitude spectrum to `visit`
    pub fn for_each_frame<F>(&self, samples: &[f32], mut visit: F)
    where
        F: FnMut(usize, &[f32]),
    {
        let pad = (self.n_fft / 2) as isize;
        let n_bins = self.n_bins();
        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.n_fft];
        let mut scratch = vec![Complex::new(0.0f32, 0.0); self.fft.get_inplace_scratch_len()];
        let mut magnitudes = vec![0.0f32; n_bins];

        for frame in 0..self.num_frames(samples.len()) {
            let start = (frame * self.hop_length) as isize - pad;

            for (i, slot) in buffer.iter_mut().enumerate() {
                let idx = start + i as isize;
                let sample = if idx >= 0 && (idx as usize) < samples.len() {
                    samples[idx as usize]
                } else {
                    0.0
                };
                *slot = Complex::new(sample * self.window[i], 0.0);
            }

            self.fft.process_with_scratch(&mut buffer, &mut scratch);

            for (mag, c) in magnitudes.iter_mut().zip(buffer.iter()) {
                *mag = c.norm();
            }
            visit(frame, &magnitudes);
        }
    }
}
