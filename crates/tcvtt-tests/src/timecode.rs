//! Scenario tests for the timecode value type through its public API.

use std::cmp::Ordering;
use tcvtt_core::{FrameRate, Timecode, TimecodeError};

fn at(text: &str, frames_max: u32) -> Timecode {
    Timecode::parse_with_frames_max(text, frames_max).unwrap()
}

// ── Frame counts ───────────────────────────────────────────────

#[test]
fn frame_count_of_plain_timecode() {
    let tc = at("01:02:03:04", 29);
    assert_eq!(tc.to_frames(), (3600 + 2 * 60 + 3) * 30 + 4);
}

#[test]
fn drop_frame_minute_starts_at_frame_two() {
    // 60 seconds of 30 fps minus the two skipped numbers of minute one
    let tc = Timecode::from_frames(1800, 29, true);
    assert_eq!(tc.to_string(), "00:01:00;02");
    assert_eq!(tc.to_frames(), 1800);

    let tenth = Timecode::from_frames(10 * 1800 - 9 * 2, 29, true);
    assert_eq!(tenth.to_string(), "00:10:00;00");
}

#[test]
fn drop_frame_hour_is_107892_frames() {
    assert_eq!(at("01:00:00;00", 29).to_frames(), 107_892);
    assert_eq!(at("01:00:00;00", 59).to_frames(), 2 * 107_892);
}

#[test]
fn overflow_saturates_and_reports() {
    let mut tc = Timecode::new(0, 0, 0, 0, 29, false);
    let err = tc.set_from_frames(i64::MAX).unwrap_err();
    assert_eq!(err, TimecodeError::Overflow(i64::MAX));
    assert_eq!(tc.hours(), u32::MAX);
    assert_eq!((tc.minutes(), tc.seconds(), tc.frames()), (59, 59, 29));
    assert!(tc.is_valid());
}

#[test]
fn milliseconds_use_true_rate() {
    assert_eq!(at("00:00:01:00", 29).to_milliseconds(), 1000);
    assert_eq!(at("00:01:00;02", 29).to_milliseconds(), 60_060);
    assert_eq!(Timecode::from_frames(-25, 24, false).to_milliseconds(), -1000);
}

// ── Text ───────────────────────────────────────────────────────

#[test]
fn seconds_unit_is_a_duration() {
    let tc: Timecode = "90s".parse().unwrap();
    assert_eq!((tc.hours(), tc.minutes(), tc.seconds()), (0, 1, 30));
    assert!(tc.is_time());
    assert_eq!(tc.to_string(), "00:01:30.0S1");
}

#[test]
fn bad_text_resets_to_invalid() {
    assert!("bad".parse::<Timecode>().is_err());

    let mut tc = at("01:00:00:00", 24);
    assert!(matches!(
        tc.set_from_str("bad"),
        Err(TimecodeError::Parse { .. })
    ));
    assert!(!tc.is_valid());
    assert_eq!(tc.to_string(), "");
}

#[test]
fn fraction_and_unit_grammars() {
    assert_eq!("00:00:01.5".parse::<Timecode>().unwrap().to_string(), "00:00:01.5");
    assert_eq!("1.25h".parse::<Timecode>().unwrap().to_string(), "01:15:00.0S1");
    assert_eq!("00:00:01.1S3".parse::<Timecode>().unwrap().to_string(), "00:00:01.1S3");
}

#[test]
fn field_precision_round_trips_through_text() {
    let tc = at("00:00:10:12.1", 24);
    assert!(tc.must_use_second_field());
    assert!(tc.is_second_field());
    assert_eq!(tc.to_frames(), (10 * 25 + 12) * 2 + 1);
    assert_eq!(tc.to_string(), "00:00:10:12.1");
}

#[test]
fn display_spills_wide_fields() {
    let tc = Timecode::new(123, 4, 5, 107, 119, false);
    assert_eq!(tc.to_string(), "123:04:05:107");
}

// ── Stepping ───────────────────────────────────────────────────

#[test]
fn plus_one_wraps_at_midnight() {
    let mut tc = at("23:59:59:29", 29);
    tc.plus_one();
    assert_eq!(tc.to_string(), "00:00:00:00");
}

#[test]
fn minus_one_wraps_below_zero() {
    let mut tc = at("00:00:00:00", 29);
    tc.minus_one();
    assert_eq!(tc.to_string(), "23:59:59:29");
}

#[test]
fn drop_frame_stepping_across_minutes() {
    let mut tc = at("00:00:59;29", 29);
    tc.plus_one();
    assert_eq!(tc.to_string(), "00:01:00;02");
    tc.minus_one();
    assert_eq!(tc.to_string(), "00:00:59;29");

    let mut tc = at("00:09:59;29", 29);
    tc.plus_one();
    assert_eq!(tc.to_string(), "00:10:00;00");
}

#[test]
fn negative_values_step_toward_zero() {
    let mut tc = Timecode::from_frames(-1, 29, false);
    assert_eq!(tc.to_string(), "-00:00:00:01");
    tc.plus_one();
    assert_eq!(tc.to_string(), "00:00:00:00");
    assert!(!tc.is_negative());

    let mut tc = Timecode::from_frames(-1, 29, false);
    tc.minus_one();
    assert_eq!(tc.to_string(), "-00:00:00:02");
}

// ── Arithmetic & ordering ──────────────────────────────────────

#[test]
fn same_rate_arithmetic() {
    let a = at("00:00:10:00", 24);
    let b = at("00:00:05:12", 24);
    assert_eq!((a + b).to_string(), "00:00:15:12");
    assert_eq!((a - b).to_string(), "00:00:04:13");
    assert_eq!((b - a).to_string(), "-00:00:04:13");
    assert_eq!((a + 25).to_string(), "00:00:11:00");
}

#[test]
fn cross_rate_addition_keeps_left_rate() {
    let a = at("00:00:01:00", 24);
    let b = at("00:00:00:15", 29);
    let sum = a + b;
    assert_eq!(sum.frames_max(), 24);
    assert_eq!(sum.to_string(), "00:00:01:13");
}

#[test]
fn ordering_across_rates() {
    let half_30 = at("00:00:00:15", 29);
    let half_60 = at("00:00:00:30", 59);
    assert_eq!(half_30.position_cmp(&half_60), Ordering::Equal);
    assert_eq!(half_30.partial_cmp(&half_60), None);

    let one_30 = at("00:00:00:01", 29);
    let one_60 = at("00:00:00:01", 59);
    assert_eq!(one_30, one_60);
    assert_eq!(one_30.position_cmp(&one_60), Ordering::Greater);
    assert_eq!(one_30.partial_cmp(&one_60), None);

    assert!(at("00:00:01:00", 24) > at("00:00:00:29", 29));
    assert!(Timecode::from_frames(-25, 24, false) < at("00:00:00:00", 24));
}

#[test]
fn checked_add_reports_missing_value() {
    let mut tc = Timecode::default();
    assert_eq!(tc.checked_add_frames(1), Err(TimecodeError::NoValue));
}

// ── Frame rates ────────────────────────────────────────────────

#[test]
fn from_rate_prepares_parse_target() {
    let mut tc = Timecode::from_rate(FrameRate::FPS_29_97).unwrap();
    assert!(!tc.is_valid());
    assert!(tc.is_1001());
    tc.set_from_str("01:00:00;00").unwrap();
    assert_eq!(tc.frames_max(), 29);
    assert!(tc.drop_frame());
    assert_eq!(tc.to_frames(), 107_892);

    assert!(matches!(
        Timecode::from_rate(FrameRate::new(0, 1)),
        Err(TimecodeError::InvalidFrameRate { .. })
    ));
}

#[test]
fn serde_round_trip_keeps_flags() {
    let tc = Timecode::from_frames(-107_892, 29, true);
    assert_eq!(tc.to_string(), "-01:00:00;00");
    let json = serde_json::to_string(&tc).unwrap();
    let back: Timecode = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tc);
    assert_eq!(back.flags(), tc.flags());
}
