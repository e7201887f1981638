//! TCVTT CLI - MediaInfo timecode XML to WebVTT
//!
//! Reads the timecode tracks MediaInfo describes in its timecode XML and
//! writes a WebVTT file with one cue per frame of the shared timeline,
//! stamping each track's timecode text into the cue.

pub mod cli;
pub mod error;
pub mod streams;
pub mod webvtt;

pub use error::{ConvertError, Result};
pub use streams::{read_streams, StreamSource, TimecodeDocument, TimecodeStream};

/// Output layout settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Width stream labels are right-aligned to.
    pub label_width: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { label_width: 40 }
    }
}

/// Convert a MediaInfo timecode XML document into WebVTT text.
pub fn convert(xml: &str, options: &ConvertOptions) -> Result<String> {
    let document = read_streams(xml)?;
    Ok(webvtt::render(document, options.label_width))
}
