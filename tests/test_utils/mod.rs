// tests/test_utils/mod.rs
//
// WAV fixture synthesis shared by the integration tests.
#![allow(dead_code)]

use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const SAMPLE_RATE: u32 = 44100;

/// Temporary directory of generated audio files
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create fixture directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write mono samples as 16-bit PCM
    pub fn wav(&self, name: &str, samples: &[f32], sample_rate: u32) -> PathBuf {
        self.wav_channels(name, &[samples], sample_rate)
    }

    /// Write one slice per channel as interleaved 16-bit PCM
    pub fn wav_channels(&self, name: &str, channels: &[&[f32]], sample_rate: u32) -> PathBuf {
        let path = self.dir.path().join(name);
        let spec = hound::WavSpec {
            channels: channels.len() as u16,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).expect("Failed to create WAV");
        let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
        for i in 0..frames {
            for channel in channels {
                let s = (channel[i].clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                writer.write_sample(s).expect("Failed to write sample");
            }
        }
        writer.finalize().expect("Failed to finalize WAV");
        path
    }

    /// Mono 16-bit WAV with a `LIST/INFO` chunk ahead of the audio data.
    ///
    /// `tags` are `(four-character id, text)` pairs such as `("ISFT", "LAME3.100")`.
    pub fn wav_with_info(
        &self,
        name: &str,
        samples: &[f32],
        sample_rate: u32,
        tags: &[(&str, &str)],
    ) -> PathBuf {
        let mut info = b"INFO".to_vec();
        for (id, text) in tags {
            let mut value = text.as_bytes().to_vec();
            value.push(0);
            info.extend_from_slice(&id.as_bytes()[..4]);
            info.extend_from_slice(&(value.len() as u32).to_le_bytes());
            info.extend_from_slice(&value);
            if value.len() % 2 == 1 {
                info.push(0);
            }
        }

        let mut fmt = Vec::with_capacity(16);
        fmt.extend_from_slice(&1u16.to_le_bytes()); // PCM
        fmt.extend_from_slice(&1u16.to_le_bytes());
        fmt.extend_from_slice(&sample_rate.to_le_bytes());
        fmt.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        fmt.extend_from_slice(&2u16.to_le_bytes());
        fmt.extend_from_slice(&16u16.to_le_bytes());

        let data: Vec<u8> = samples
            .iter()
            .flat_map(|s| ((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16).to_le_bytes())
            .collect();

        let mut body = b"WAVE".to_vec();
        for (id, chunk) in [(b"fmt ", &fmt), (b"LIST", &info), (b"data", &data)] {
            body.extend_from_slice(id);
            body.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
            body.extend_from_slice(chunk);
            if chunk.len() % 2 == 1 {
                body.push(0);
            }
        }

        let mut bytes = b"RIFF".to_vec();
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend(body);

        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes).expect("Failed to write tagged WAV");
        path
    }

    /// A file with an audio extension that holds no decodable stream
    pub fn corrupt(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut bytes = b"fLaC".to_vec();
        bytes.extend(white_noise_bytes(4096, 0xDEAD_BEEF));
        std::fs::write(&path, bytes).expect("Failed to write corrupt file");
        path
    }
}

/// Linear chirp from `f0` to `f1` Hz with raised-cosine fades at both ends
pub fn sine_sweep(f0: f32, f1: f32, secs: f32, sample_rate: u32) -> Vec<f32> {
    let len = (secs * sample_rate as f32) as usize;
    let rate = (f1 - f0) / secs;
    let signal = (0..len).map(|n| {
        let t = n as f32 / sample_rate as f32;
        0.5 * (2.0 * PI * (f0 * t + 0.5 * rate * t * t)).sin()
    });
    apply_fade(signal.collect(), sample_rate as usize / 20)
}

/// Deterministic xorshift white noise in [-amp, amp]
pub fn white_noise(secs: f32, sample_rate: u32, amp: f32, seed: u32) -> Vec<f32> {
    let len = (secs * sample_rate as f32) as usize;
    let mut state = seed.max(1);
    (0..len)
        .map(|_| {
            state = xorshift(state);
            (state as f32 / u32::MAX as f32 * 2.0 - 1.0) * amp
        })
        .collect()
}

/// Constant-level segments, `(seconds, level)` each, as a DC-free square wave
pub fn level_segments(segments: &[(f32, f32)], sample_rate: u32) -> Vec<f32> {
    let mut out = Vec::new();
    for &(secs, level) in segments {
        let len = (secs * sample_rate as f32) as usize;
        out.extend((0..len).map(|n| if n % 2 == 0 { level } else { -level }));
    }
    out
}

fn apply_fade(mut samples: Vec<f32>, fade: usize) -> Vec<f32> {
    let len = samples.len();
    let fade = fade.min(len / 2);
    for i in 0..fade {
        let gain = 0.5 * (1.0 - (PI * i as f32 / fade as f32).cos());
        samples[i] *= gain;
        samples[len - 1 - i] *= gain;
    }
    samples
}

fn xorshift(mut state: u32) -> u32 {
    state ^= state << 13;
    state ^= state >> 17;
    state ^= state << 5;
    state
}

fn white_noise_bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = xorshift(state);
            (state >> 24) as u8
        })
        .collect()
}
