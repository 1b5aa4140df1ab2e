//! Crate-level error type
//!
//! Only the outer surfaces (file I/O, notation parsing, configuration) can
//! fail. Synthesis and mixing are total and report problems through logging.

use crate::pipeline::parser::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("unknown orchestration strategy: {0}")]
    UnknownStrategy(String),

    #[error("unknown pattern preset: {0}")]
    UnknownPreset(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
