use gpbuttond_core::LineId;
use gpbuttond_hardware::HardwareError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Line {0} is already registered")]
    DuplicateLine(LineId),

    #[error("No lines registered")]
    NoLines,

    #[error("Edge source for line {actual} registered under line {expected}")]
    LineMismatch { expected: LineId, actual: LineId },

    #[error("Line {line} failed: {source}")]
    LineFailed {
        line: LineId,
        #[source]
        source: HardwareError,
    },

    #[error(transparent)]
    Hardware(#[from] HardwareError),
}

impl EngineError {
    pub fn line_failed(line: LineId, source: HardwareError) -> Self {
        Self::LineFailed { line, source }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
