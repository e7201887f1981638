//! WebVTT rendering of timecode streams.
//!
//! One cue per master frame; each cue lists every stream's timecode text
//! for that frame, labelled with the right-aligned stream id.

use crate::streams::TimecodeDocument;
use num_rational::Rational64;
use std::fmt::Write as _;
use tcvtt_core::FrameRate;
use tracing::info;

const WEBVTT_HEADER: &str = "WEBVTT";

/// Start time of master frame `index`, in milliseconds rounded to nearest.
pub fn cue_time_ms(rate: FrameRate, index: u64) -> i64 {
    let seconds = rate.frame_duration() * Rational64::from_integer(index as i64);
    (seconds * Rational64::from_integer(1000)).round().to_integer()
}

/// `HH:MM:SS.mmm`; hours grow past two digits when needed.
pub fn push_timestamp(output: &mut String, ms: i64) {
    let ms = ms.max(0);
    let _ = write!(
        output,
        "{:02}:{:02}:{:02}.{:03}",
        ms / 3_600_000,
        (ms / 60_000) % 60,
        (ms / 1000) % 60,
        ms % 1000
    );
}

/// Render the whole document until every stream is exhausted.
pub fn render(document: TimecodeDocument, label_width: usize) -> String {
    let TimecodeDocument { rate, mut streams } = document;
    let labels: Vec<String> = streams
        .iter()
        .map(|stream| format!("\n{:>width$}: ", stream.id, width = label_width))
        .collect();

    let mut output = String::from(WEBVTT_HEADER);
    output.push('\n');

    let mut active = streams.iter().filter(|stream| !stream.is_exhausted()).count();
    let mut index = 0u64;
    while active > 0 {
        output.push('\n');
        push_timestamp(&mut output, cue_time_ms(rate, index));
        output.push_str(" --> ");
        push_timestamp(&mut output, cue_time_ms(rate, index + 1));
        for (stream, label) in streams.iter_mut().zip(&labels) {
            output.push_str(label);
            if let Some(text) = stream.next_text() {
                output.push_str(&text);
                if stream.is_exhausted() {
                    active -= 1;
                }
            }
        }
        output.push('\n');
        index += 1;
    }

    info!(cues = index, streams = streams.len(), rate = %rate, "Rendered WebVTT");
    output
}
