//! flacaudit - Detect fake lossless audio files
//!
//! Estimates the spectral cutoff of an audio file and classifies it into an
//! authenticity tier. Files re-encoded from lossy sources keep the lowpass of
//! the lossy encoder, typically around 16 kHz, even when wrapped in a
//! lossless container.
//!
//! ## Pipeline
//!
//! 1. Header-only metadata extraction (sample rate, bit depth, bitrate, encoder tags)
//! 2. Decoding of a bounded analysis window, downmixed to mono
//! 3. STFT with the averaged magnitude spectrum and a mel power spectrogram
//! 4. Cutoff estimation against a peak-relative threshold
//! 5. Classification into a verdict tier
//!
//! ## Module Structure
//!
//! - `core` - Decoding, DSP, spectral analysis and the session orchestrator
//! - `detection` - Result records, verdicts and the classifier
//! - `config` - Analysis settings
//! - `cli` - Command-line driver
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flacaudit::{AnalysisConfig, Orchestrator};
//!
//! let orchestrator = Orchestrator::new(&AnalysisConfig::default())?;
//! orchestrator.submit("album/01.flac")?;
//!
//! for completion in orchestrator.completions() {
//!     let result = completion.result();
//!     println!("{}: {}", result.audio_ref.file_name(), result.verdict.label());
//! }
//! ```
//!
//! ## Verdict Tiers
//!
//! | Cutoff          | Verdict         |
//! |-----------------|-----------------|
//! | >= 19.8 kHz     | PRO LOSSLESS    |
//! | >= 17.2 kHz     | MASTERING LIMIT |
//! | below 17.2 kHz  | FAKE / UPSCALED |

// Core analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Analysis settings
pub mod config;

// Result types and classification
pub mod detection;

pub use config::{AnalysisConfig, ConfigBuilder};
pub use core::{
    AnalysisFailure, AudioAnalyzer, Completion, Orchestrator, Rejected, Stage, StageError,
};
pub use detection::{
    classify, AnalysisResult, AudioRef, CutoffEstimate, EncoderHint, SpectrogramData,
    TechnicalSpecs, Verdict, VerdictSummary,
};
