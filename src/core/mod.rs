//! Core pipeline: metadata, decoding, DSP, spectral analysis and sessions

pub mod analysis;
pub mod analyzer;
pub mod decoder;
pub mod dsp;
pub mod error;
pub mod metadata;
pub mod session;

pub use analysis::{CutoffEstimator, SpectralAnalysis, SpectralAnalyzer};
pub use analyzer::AudioAnalyzer;
pub use decoder::{load_signal, AnalysisWindow, SignalBuffer};
pub use error::{AnalysisFailure, Rejected, Stage, StageError, StageResult};
pub use metadata::{extract_metadata, FileMetadata};
pub use session::{is_supported_extension, Completion, Orchestrator};
