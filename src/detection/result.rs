//! Result record types produced by the forensic pipeline

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::core::error::AnalysisFailure;

/// Identity of a submitted file
///
/// The identifier is the absolute path rendered as a string; two references
/// with the same identifier denote the same file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AudioRef {
    path: PathBuf,
    id: String,
}

impl AudioRef {
    /// Build a reference, resolving the path to an absolute one when possible
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let id = path.to_string_lossy().into_owned();
        Self { path, id }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// File name component for display, falling back to the full identifier
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.id.clone())
    }
}

/// Container bitrate as reported for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bitrate {
    Kbps(u32),
    Vbr,
}

impl std::fmt::Display for Bitrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bitrate::Kbps(kbps) => write!(f, "{}k", kbps),
            Bitrate::Vbr => f.write_str("VBR"),
        }
    }
}

/// Technical properties read from container headers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalSpecs {
    pub sample_rate_hz: u32,
    /// Bits per sample as reported by the container, if it reports one
    pub reported_bit_depth: Option<u32>,
    pub bitrate: Bitrate,
    pub channels: Option<usize>,
    pub codec_name: String,
}

impl TechnicalSpecs {
    pub const DEFAULT_BIT_DEPTH: u32 = 16;

    pub fn bit_depth(&self) -> u32 {
        self.reported_bit_depth.unwrap_or(Self::DEFAULT_BIT_DEPTH)
    }

    /// Compact description, e.g. `44.1kHz / 16bit`
    pub fn summary(&self) -> String {
        format!(
            "{}kHz / {}bit",
            self.sample_rate_hz as f64 / 1000.0,
            self.bit_depth()
        )
    }
}

/// Heuristic hint about the encoder that produced the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum EncoderHint {
    #[default]
    Unknown,
    PotentialLossyConversion,
    ITunesRip,
}

impl EncoderHint {
    /// Classify a set of tag values.
    ///
    /// Values are lower-cased and concatenated; field names play no part.
    /// `lame`/`lavf` take precedence over `itunes`.
    pub fn from_tag_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let haystack: String = values
            .into_iter()
            .map(|v| v.as_ref().to_lowercase())
            .collect::<Vec<_>>()
            .join("\n");

        if haystack.contains("lame") || haystack.contains("lavf") {
            EncoderHint::PotentialLossyConversion
        } else if haystack.contains("itunes") {
            EncoderHint::ITunesRip
        } else {
            EncoderHint::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EncoderHint::Unknown => "Original/Unknown",
            EncoderHint::PotentialLossyConversion => "Potential Lossy Conv",
            EncoderHint::ITunesRip => "iTunes Rip",
        }
    }
}

/// Estimated spectral cutoff. Zero means no bin rose above the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CutoffEstimate {
    pub frequency_hz: f32,
}

impl CutoffEstimate {
    pub fn new(frequency_hz: f32) -> Self {
        Self {
            frequency_hz: frequency_hz.max(0.0),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.frequency_hz <= 0.0
    }

    /// Display form, e.g. `16.0kHz`
    pub fn display_khz(&self) -> String {
        format!("{:.1}kHz", self.frequency_hz / 1000.0)
    }
}

/// Mel power spectrogram in dB relative to its own peak, for visualisation only
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramData {
    /// `[mel band][time frame]`
    pub mel_power_db: Vec<Vec<f32>>,
    pub sample_rate_hz: u32,
    pub hop_length: usize,
}

impl SpectrogramData {
    pub fn n_bands(&self) -> usize {
        self.mel_power_db.len()
    }

    pub fn n_frames(&self) -> usize {
        self.mel_power_db.first().map_or(0, |band| band.len())
    }

    /// Time covered by the frames, in seconds
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate_hz == 0 {
            return 0.0;
        }
        (self.n_frames() * self.hop_length) as f32 / self.sample_rate_hz as f32
    }

    /// Lowest dB value present (the peak is 0 dB by construction)
    pub fn floor_db(&self) -> f32 {
        self.mel_power_db
            .iter()
            .flatten()
            .copied()
            .fold(0.0f32, f32::min)
    }
}

/// Authenticity verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    ProLossless,
    MasteringLimit,
    FakeOrUpscaled,
    AnalysisError,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::ProLossless => "PRO LOSSLESS",
            Verdict::MasteringLimit => "MASTERING LIMIT",
            Verdict::FakeOrUpscaled => "FAKE / UPSCALED",
            Verdict::AnalysisError => "ERROR",
        }
    }

    /// Display colour tag (hex)
    pub fn color(&self) -> &'static str {
        match self {
            Verdict::ProLossless => "#22c55e",
            Verdict::MasteringLimit => "#f59e0b",
            Verdict::FakeOrUpscaled => "#ef4444",
            Verdict::AnalysisError => "#ef4444",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Verdict::AnalysisError)
    }
}

/// Complete analysis record for one file
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub audio_ref: AudioRef,
    pub specs: Option<TechnicalSpecs>,
    pub encoder: EncoderHint,
    pub cutoff: CutoffEstimate,
    pub verdict: Verdict,
    #[serde(skip)]
    pub spectrogram: Option<Arc<SpectrogramData>>,
    #[serde(serialize_with = "serialize_failure")]
    pub failure: Option<AnalysisFailure>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Record for a file whose analysis failed: error verdict, no spectrogram
    pub fn failed(audio_ref: AudioRef, failure: AnalysisFailure) -> Self {
        Self {
            audio_ref,
            specs: None,
            encoder: EncoderHint::Unknown,
            cutoff: CutoffEstimate::default(),
            verdict: Verdict::AnalysisError,
            spectrogram: None,
            failure: Some(failure),
            analyzed_at: Utc::now(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.verdict.is_error()
    }
}

fn serialize_failure<S>(failure: &Option<AnalysisFailure>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match failure {
        Some(f) => serializer.serialize_some(&f.to_string()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StageError;

    #[test]
    fn test_encoder_hint_lame_any_case() {
        assert_eq!(
            EncoderHint::from_tag_values(["Some Artist", "LAME3.100"]),
            EncoderHint::PotentialLossyConversion
        );
        assert_eq!(
            EncoderHint::from_tag_values(["lame3.100"]),
            EncoderHint::PotentialLossyConversion
        );
    }

    #[test]
    fn test_encoder_hint_precedence() {
        // lossy markers win over iTunes regardless of order
        assert_eq!(
            EncoderHint::from_tag_values(["iTunes 12.1", "Lavf58.29.100"]),
            EncoderHint::PotentialLossyConversion
        );
        assert_eq!(
            EncoderHint::from_tag_values(["iTunSMPB", "ITUNES"]),
            EncoderHint::ITunesRip
        );
        assert_eq!(
            EncoderHint::from_tag_values(["reference libFLAC 1.4.3"]),
            EncoderHint::Unknown
        );
        assert_eq!(EncoderHint::from_tag_values(Vec::<String>::new()), EncoderHint::Unknown);
    }

    #[test]
    fn test_specs_summary_defaults_bit_depth() {
        let specs = TechnicalSpecs {
            sample_rate_hz: 44100,
            reported_bit_depth: None,
            bitrate: Bitrate::Vbr,
            channels: Some(2),
            codec_name: "aac".to_string(),
        };
        assert_eq!(specs.bit_depth(), 16);
        assert_eq!(specs.summary(), "44.1kHz / 16bit");
        assert_eq!(specs.bitrate.to_string(), "VBR");
        assert_eq!(Bitrate::Kbps(1411).to_string(), "1411k");
    }

    #[test]
    fn test_cutoff_display() {
        assert_eq!(CutoffEstimate::new(16020.0).display_khz(), "16.0kHz");
        assert!(CutoffEstimate::new(-3.0).is_degenerate());
    }

    #[test]
    fn test_failed_result_has_no_spectrogram() {
        let audio_ref = AudioRef::new("/tmp/broken.flac");
        let failure = AnalysisFailure::new(audio_ref.path(), StageError::decode("truncated"));
        let result = AnalysisResult::failed(audio_ref, failure);

        assert_eq!(result.verdict, Verdict::AnalysisError);
        assert!(result.spectrogram.is_none());
        assert!(result.is_failed());

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("truncated"));
    }

    #[test]
    fn test_audio_ref_is_absolute() {
        let audio_ref = AudioRef::new("relative/track.flac");
        assert!(audio_ref.path().is_absolute());
        assert_eq!(audio_ref.file_name(), "track.flac");
    }
}
