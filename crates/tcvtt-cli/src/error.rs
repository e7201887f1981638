//! Error types for the XML to WebVTT conversion.

use tcvtt_core::{FrameRate, TimecodeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("Invalid {name} attribute: {value:?}")]
    InvalidAttribute { name: &'static str, value: String },

    #[error("Stream {id:?} runs at {found}, other streams at {expected}")]
    FrameRateMismatch {
        id: String,
        expected: FrameRate,
        found: FrameRate,
    },

    #[error("No timecode stream declares a frame rate")]
    MissingFrameRate,

    #[error("Timecode error: {0}")]
    Timecode(#[from] TimecodeError),
}

impl From<quick_xml::Error> for ConvertError {
    fn from(err: quick_xml::Error) -> Self {
        ConvertError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ConvertError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ConvertError::Xml(err.to_string())
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
