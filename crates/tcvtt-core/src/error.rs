//! Error types for timecode operations.

use thiserror::Error;

/// Main error type for timecode operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    #[error("Invalid timecode text {input:?}: {reason}")]
    Parse { input: String, reason: &'static str },

    /// The value saturated to the largest representable timecode.
    #[error("Frame count overflow: {0} frames does not fit the hour field")]
    Overflow(i64),

    #[error("Invalid frame rate: {numerator}/{denominator}")]
    InvalidFrameRate { numerator: u64, denominator: u64 },

    #[error("Timecode has no value")]
    NoValue,
}

impl TimecodeError {
    pub(crate) fn parse(input: &str, reason: &'static str) -> Self {
        Self::Parse {
            input: input.to_owned(),
            reason,
        }
    }
}

/// Result type alias for timecode operations.
pub type Result<T> = std::result::Result<T, TimecodeError>;
