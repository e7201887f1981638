//! Timecode stream descriptions read from MediaInfo timecode XML.
//!
//! ```xml
//! <timecode_streams>
//!   <timecode_stream id="1" frame_rate="30000/1001" frame_count="3" start_tc="01:00:00;00"/>
//!   <timecode_stream id="2" frame_rate="30000/1001">
//!     <tc v="00:59:59:29"/>
//!     <tc v="01:00:00:00"/>
//!   </timecode_stream>
//! </timecode_streams>
//! ```

use crate::error::{ConvertError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::VecDeque;
use tcvtt_core::{FrameRate, Timecode};
use tracing::{debug, warn};

/// Where a stream's per-frame text comes from.
#[derive(Debug, Clone)]
pub enum StreamSource {
    /// A start timecode stepped once per frame for `remaining` frames.
    Running { timecode: Timecode, remaining: u64 },
    /// One pre-rendered text per frame.
    Listed(VecDeque<String>),
}

/// A single timecode track.
#[derive(Debug, Clone)]
pub struct TimecodeStream {
    pub id: String,
    pub source: StreamSource,
}

impl TimecodeStream {
    /// Text for the next master frame, or `None` once the stream has run out.
    pub fn next_text(&mut self) -> Option<String> {
        match &mut self.source {
            StreamSource::Running {
                timecode,
                remaining,
            } => {
                if *remaining == 0 {
                    return None;
                }
                let text = timecode.to_string();
                timecode.plus_one();
                *remaining -= 1;
                Some(text)
            }
            StreamSource::Listed(texts) => texts.pop_front(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        match &self.source {
            StreamSource::Running { remaining, .. } => *remaining == 0,
            StreamSource::Listed(texts) => texts.is_empty(),
        }
    }
}

/// All streams of one document, sharing the master frame rate.
#[derive(Debug, Clone)]
pub struct TimecodeDocument {
    pub rate: FrameRate,
    pub streams: Vec<TimecodeStream>,
}

/// Attributes and children of a `<timecode_stream>` element.
#[derive(Debug, Default)]
struct PendingStream {
    id: String,
    rate: Option<FrameRate>,
    frame_count: u64,
    start_tc: Option<String>,
    children: VecDeque<String>,
}

impl PendingStream {
    fn from_element(element: &BytesStart<'_>) -> Result<Self> {
        let mut stream = Self::default();
        for attr in element.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?.into_owned();
            match attr.key.as_ref() {
                b"id" => stream.id = value,
                b"frame_rate" => {
                    let rate = value.parse().map_err(|_| ConvertError::InvalidAttribute {
                        name: "frame_rate",
                        value,
                    })?;
                    stream.rate = Some(rate);
                }
                b"frame_count" => {
                    stream.frame_count = value.trim().parse().map_err(|_| {
                        ConvertError::InvalidAttribute {
                            name: "frame_count",
                            value,
                        }
                    })?;
                }
                b"start_tc" => stream.start_tc = Some(value),
                _ => {}
            }
        }
        Ok(stream)
    }

    /// Each direct child is one frame; only `<tc v="..">` carries text.
    fn push_child(&mut self, element: &BytesStart<'_>) -> Result<()> {
        let mut text = String::new();
        if element.name().as_ref() == b"tc" {
            for attr in element.attributes() {
                let attr = attr?;
                if attr.key.as_ref() == b"v" {
                    text = attr.unescape_value()?.into_owned();
                }
            }
        }
        self.children.push_back(text);
        Ok(())
    }

    fn finish(self, rate: FrameRate) -> Result<TimecodeStream> {
        let mut timecode = Timecode::from_rate(rate)?;
        let running = match &self.start_tc {
            Some(text) => match timecode.set_from_str(text) {
                Ok(()) => true,
                Err(err) => {
                    warn!(id = %self.id, %err, "Ignoring start_tc, using listed timecodes");
                    false
                }
            },
            None => false,
        };

        let source = if running {
            debug!(id = %self.id, start = %timecode, frames = self.frame_count, "Running stream");
            StreamSource::Running {
                timecode,
                remaining: self.frame_count,
            }
        } else {
            if self.children.is_empty() {
                warn!(id = %self.id, "Stream has neither start_tc nor tc entries");
            }
            debug!(id = %self.id, frames = self.children.len(), "Listed stream");
            StreamSource::Listed(self.children)
        };
        Ok(TimecodeStream {
            id: self.id,
            source,
        })
    }
}

/// Read every `<timecode_stream>` under `<timecode_streams>`.
///
/// All streams declaring a frame rate must agree on it; streams without
/// one follow the shared rate.
pub fn read_streams(xml: &str) -> Result<TimecodeDocument> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut pending = Vec::new();
    let mut in_streams = false;
    let mut current: Option<PendingStream> = None;
    let mut child_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                if let Some(stream) = current.as_mut() {
                    if child_depth == 0 {
                        stream.push_child(&element)?;
                    }
                    child_depth += 1;
                } else if in_streams && element.name().as_ref() == b"timecode_stream" {
                    current = Some(PendingStream::from_element(&element)?);
                } else if element.name().as_ref() == b"timecode_streams" {
                    in_streams = true;
                }
            }
            Event::Empty(element) => {
                if let Some(stream) = current.as_mut() {
                    if child_depth == 0 {
                        stream.push_child(&element)?;
                    }
                } else if in_streams && element.name().as_ref() == b"timecode_stream" {
                    pending.push(PendingStream::from_element(&element)?);
                }
            }
            Event::End(element) => {
                if current.is_some() {
                    if child_depth > 0 {
                        child_depth -= 1;
                    } else {
                        pending.extend(current.take());
                    }
                } else if element.name().as_ref() == b"timecode_streams" {
                    in_streams = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut rate: Option<FrameRate> = None;
    for stream in &pending {
        match (rate, stream.rate) {
            (None, found) => rate = found,
            (Some(expected), Some(found)) if expected != found => {
                return Err(ConvertError::FrameRateMismatch {
                    id: stream.id.clone(),
                    expected,
                    found,
                });
            }
            _ => {}
        }
    }
    let rate = rate.ok_or(ConvertError::MissingFrameRate)?;
    debug!(%rate, fps = rate.to_fps_f64(), streams = pending.len(), "Master timeline");

    let streams = pending
        .into_iter()
        .map(|stream| stream.finish(rate))
        .collect::<Result<Vec<_>>>()?;
    Ok(TimecodeDocument { rate, streams })
}
