// src/core/error.rs
//
// Failure taxonomy for the per-file analysis pipeline.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage a failure originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Stage {
    Metadata,
    Decode,
    Transform,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Metadata => "metadata",
            Stage::Decode => "decode",
            Stage::Transform => "transform",
        };
        f.write_str(name)
    }
}

/// Error raised by a single stage of the pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    #[error("unreadable metadata: {0}")]
    UnreadableMetadata(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("transform error: {0}")]
    Transform(String),
}

impl StageError {
    pub fn stage(&self) -> Stage {
        match self {
            StageError::UnreadableMetadata(_) => Stage::Metadata,
            StageError::Decode(_) => Stage::Decode,
            StageError::Transform(_) => Stage::Transform,
        }
    }

    pub(crate) fn metadata(err: impl fmt::Display) -> Self {
        StageError::UnreadableMetadata(err.to_string())
    }

    pub(crate) fn decode(err: impl fmt::Display) -> Self {
        StageError::Decode(err.to_string())
    }

    pub(crate) fn transform(err: impl fmt::Display) -> Self {
        StageError::Transform(err.to_string())
    }
}

/// Terminal failure of one file's analysis, retaining where and why it failed
#[derive(Debug, Clone, PartialEq, Error)]
#[error("analysis of {} failed during {stage}: {source}", path.display())]
pub struct AnalysisFailure {
    pub path: PathBuf,
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl AnalysisFailure {
    pub fn new(path: impl Into<PathBuf>, source: StageError) -> Self {
        Self {
            path: path.into(),
            stage: source.stage(),
            source,
        }
    }
}

/// Reason a submission was not accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("already submitted in this session: {0}")]
    DuplicateIdentifier(String),
}

pub type StageResult<T> = std::result::Result<T, StageError>;
