//! End-to-end tests for MediaInfo timecode XML to WebVTT conversion.
//!
//! Exercises tcvtt-cli's reader and renderer on top of tcvtt-core's
//! stepping and formatting.

use tcvtt_cli::{convert, read_streams, ConvertError, ConvertOptions, StreamSource};
use tcvtt_core::FrameRate;

// ── Helpers ────────────────────────────────────────────────────

fn options(label_width: usize) -> ConvertOptions {
    ConvertOptions { label_width }
}

const NTSC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<timecode_streams>
  <timecode_stream id="ltc" frame_rate="30000/1001" frame_count="3" start_tc="00:59:59;29"/>
  <timecode_stream id="vitc" frame_rate="30000/1001">
    <tc v="10:00:00:00"/>
    <tc v="10:00:00:01"/>
  </timecode_stream>
</timecode_streams>
"#;

// ── Rendering ──────────────────────────────────────────────────

#[test]
fn ntsc_running_and_listed_streams() {
    let vtt = convert(NTSC, &options(6)).unwrap();
    assert_eq!(
        vtt,
        "WEBVTT\n\
         \n00:00:00.000 --> 00:00:00.033\n   ltc: 00:59:59;29\n  vitc: 10:00:00:00\n\
         \n00:00:00.033 --> 00:00:00.067\n   ltc: 01:00:00;00\n  vitc: 10:00:00:01\n\
         \n00:00:00.067 --> 00:00:00.100\n   ltc: 01:00:00;01\n  vitc: \n"
    );
}

#[test]
fn default_label_width_is_forty() {
    let vtt = convert(NTSC, &ConvertOptions::default()).unwrap();
    let label = format!("\n{}ltc: 00:59:59;29\n", " ".repeat(37));
    assert!(vtt.contains(&label), "{vtt}");
}

#[test]
fn running_stream_crosses_seconds() {
    let xml = r#"<timecode_streams>
        <timecode_stream id="a" frame_rate="25" frame_count="30" start_tc="00:00:00:00"/>
    </timecode_streams>"#;
    let vtt = convert(xml, &options(1)).unwrap();
    assert_eq!(vtt.matches(" --> ").count(), 30);
    assert!(vtt.contains("\n00:00:01.000 --> 00:00:01.040\na: 00:00:01:00\n"));
    assert!(vtt.ends_with("\n00:00:01.160 --> 00:00:01.200\na: 00:00:01:04\n"));
}

#[test]
fn shorter_stream_is_blank_after_exhaustion() {
    let xml = r#"<timecode_streams>
        <timecode_stream id="long" frame_rate="24" frame_count="3" start_tc="01:00:00:00"/>
        <timecode_stream id="short" frame_rate="24" frame_count="1" start_tc="02:00:00:00"/>
    </timecode_streams>"#;
    let vtt = convert(xml, &options(5)).unwrap();
    assert_eq!(vtt.matches("short: 02:00:00:00").count(), 1);
    assert_eq!(vtt.matches("short: \n").count(), 2);
    assert!(vtt.contains(" long: 01:00:00:02\n"));
}

#[test]
fn stream_without_rate_follows_shared_rate() {
    let xml = r#"<timecode_streams>
        <timecode_stream id="a" frame_rate="50" frame_count="1" start_tc="00:00:00:49"/>
        <timecode_stream id="b" frame_count="2" start_tc="00:00:00:49"/>
    </timecode_streams>"#;
    let doc = read_streams(xml).unwrap();
    assert_eq!(doc.rate, FrameRate::FPS_50);
    match &doc.streams[1].source {
        StreamSource::Running { timecode, .. } => assert_eq!(timecode.frames_max(), 49),
        other => panic!("expected running stream, got {other:?}"),
    }

    let vtt = convert(xml, &options(1)).unwrap();
    assert!(vtt.contains("\n00:00:00.020 --> 00:00:00.040\na: \nb: 00:00:01:00\n"));
}

#[test]
fn empty_document_is_header_only() {
    let xml = r#"<timecode_streams>
        <timecode_stream id="a" frame_rate="25" frame_count="0" start_tc="00:00:00:00"/>
    </timecode_streams>"#;
    assert_eq!(convert(xml, &options(1)).unwrap(), "WEBVTT\n");
}

// ── Errors ─────────────────────────────────────────────────────

#[test]
fn malformed_xml_is_rejected() {
    let xml = "<timecode_streams><timecode_stream id=\"a\"></timecode_streams>";
    assert!(matches!(convert(xml, &options(1)), Err(ConvertError::Xml(_))));
}

#[test]
fn mismatched_rates_name_the_stream() {
    let xml = r#"<timecode_streams>
        <timecode_stream id="a" frame_rate="25" frame_count="1" start_tc="00:00:00:00"/>
        <timecode_stream id="b" frame_rate="30000/1001" frame_count="1" start_tc="00:00:00;00"/>
    </timecode_streams>"#;
    let err = convert(xml, &options(1)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Stream \"b\" runs at 30000/1001, other streams at 25"
    );
}

#[test]
fn no_streams_means_no_rate() {
    let xml = "<timecode_streams/>";
    assert!(matches!(
        convert(xml, &options(1)),
        Err(ConvertError::MissingFrameRate)
    ));
}
