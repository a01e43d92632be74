//! Detection module: result records, verdict classification and summaries

mod classifier;
mod result;
mod summary;

pub use classifier::{classify, MASTERING_LIMIT_MIN_HZ, PRO_LOSSLESS_MIN_HZ};
pub use result::{
    AnalysisResult, AudioRef, Bitrate, CutoffEstimate, EncoderHint, SpectrogramData,
    TechnicalSpecs, Verdict,
};
pub use summary::VerdictSummary;
