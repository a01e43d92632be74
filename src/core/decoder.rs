// src/core/decoder.rs
//
// Signal loading: decodes a bounded window of a file to a mono buffer at its
// native sample rate. Uses Symphonia for format-agnostic decoding.

use std::fs::File;
use std::ops::Range;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::{Hint, ProbeResult};
use symphonia::core::units::{Time, TimeBase};

use super::dsp;
use super::error::{StageError, StageResult};

/// Portion of the file to analyse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisWindow {
    pub offset_secs: f32,
    pub duration_secs: f32,
}

impl Default for AnalysisWindow {
    fn default() -> Self {
        Self {
            offset_secs: 30.0,
            duration_secs: 15.0,
        }
    }
}

impl AnalysisWindow {
    fn offset_frames(&self, sample_rate: u32) -> u64 {
        secs_to_frames(self.offset_secs, sample_rate)
    }

    fn duration_frames(&self, sample_rate: u32) -> u64 {
        secs_to_frames(self.duration_secs, sample_rate).max(1)
    }

    /// Frame where the full window ends; decoding never goes past it
    pub fn end_frame(&self, sample_rate: u32) -> u64 {
        self.offset_frames(sample_rate) + self.duration_frames(sample_rate)
    }

    /// Frames to analyse in a stream of `total_frames`.
    ///
    /// `[offset, offset + duration)` when the stream covers it, otherwise
    /// `[min(offset, duration), end)`. A stream that ends before
    /// `min(offset, duration)` is used whole.
    pub fn frame_range(&self, sample_rate: u32, total_frames: u64) -> Range<u64> {
        let offset = self.offset_frames(sample_rate);
        let duration = self.duration_frames(sample_rate);

        if total_frames >= offset + duration {
            return offset..offset + duration;
        }
        let start = offset.min(duration);
        if total_frames > start {
            start..total_frames
        } else {
            0..total_frames
        }
    }
}

fn secs_to_frames(secs: f32, sample_rate: u32) -> u64 {
    (secs.max(0.0) as f64 * sample_rate as f64).round() as u64
}

/// Convert a track timestamp to a frame index at `sample_rate`
fn ts_to_frames(ts: u64, time_base: Option<TimeBase>, sample_rate: u32) -> u64 {
    match time_base {
        Some(tb) => {
            let time = tb.calc_time(ts);
            ((time.seconds as f64 + time.frac) * sample_rate as f64).round() as u64
        }
        None => ts,
    }
}

/// Decoded mono samples for the analysis window
#[derive(Debug, Clone)]
pub struct SignalBuffer {
    /// Channel-averaged samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Native sample rate in Hz
    pub sample_rate: u32,
    /// Where in the file the buffer starts, in seconds
    pub start_secs: f32,
}

impl SignalBuffer {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Open and probe a file, reading headers and metadata only
pub(crate) fn probe_file(path: &Path) -> Result<ProbeResult, SymphoniaError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )
}

/// Decode the analysis window of `path` to mono.
///
/// See [`AnalysisWindow::frame_range`] for which frames are kept. When the
/// stream length is known the reader seeks straight to the window; otherwise
/// (or when seeking fails) it reads from the start. No resampling is
/// performed.
pub fn load_signal(path: &Path, window: &AnalysisWindow) -> StageResult<SignalBuffer> {
    let mut probed = probe_file(path)
        .map_err(|e| StageError::decode(format!("failed to probe {}: {}", path.display(), e)))?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| StageError::decode("no supported audio track found"))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .filter(|&sr| sr > 0)
        .ok_or_else(|| StageError::decode("stream does not specify a sample rate"))?;
    let time_base = track.codec_params.time_base;
    let total_hint = track.codec_params.n_frames;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| StageError::decode(format!("no decoder for codec: {}", e)))?;

    let planned = match total_hint {
        Some(total) => window.frame_range(sample_rate, total),
        None => 0..window.end_frame(sample_rate),
    };

    // absolute frame index of the first collected sample
    let mut position: u64 = 0;
    if planned.start > 0 {
        let secs = planned.start as f64 / sample_rate as f64;
        let target = SeekTo::Time {
            time: Time::new(secs.trunc() as u64, secs.fract()),
            track_id: Some(track_id),
        };
        match probed.format.seek(SeekMode::Accurate, target) {
            Ok(seeked) => {
                decoder.reset();
                position = ts_to_frames(seeked.actual_ts, time_base, sample_rate);
            }
            Err(e) => log::debug!(
                "Seek failed in {}, reading from the start: {}",
                path.display(),
                e
            ),
        }
    }

    let mut samples: Vec<f32> = Vec::new();
    let mut frames_seen = position;
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    while frames_seen < planned.end {
        let packet = match probed.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(StageError::decode(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("Skipping undecodable packet in {}: {}", path.display(), msg);
                continue;
            }
            Err(e) => return Err(StageError::decode(e)),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);
        let needed = decoded.capacity() * channels;
        if sample_buf.as_ref().map_or(true, |b| b.capacity() < needed) {
            sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            let mono = dsp::downmix(buf.samples(), channels);
            let take = mono.len().min((planned.end - frames_seen) as usize);
            samples.extend_from_slice(&mono[..take]);
            frames_seen += take as u64;
        }
    }

    // an early end of stream overrides the header's frame count
    let total = if frames_seen < planned.end {
        frames_seen
    } else {
        total_hint.unwrap_or(frames_seen)
    };
    let range = window.frame_range(sample_rate, total);
    let start = range.start.max(position);
    let end = range.end.min(frames_seen);
    if start >= end {
        return Err(StageError::decode("no audio samples decoded from file"));
    }

    samples.truncate((end - position) as usize);
    samples.drain(..(start - position) as usize);

    Ok(SignalBuffer {
        samples,
        sample_rate,
        start_secs: start as f32 / sample_rate as f32,
    })
}
