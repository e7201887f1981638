//! Text parsing for [`Timecode`].
//!
//! Accepted grammars, in priority order:
//! - `HH:MM:SS` (no frame information)
//! - `HH:MM:SS:FF`, `HH:MM:SS;FF` (drop-frame), optionally followed by a
//!   field suffix `.0` or `.1`
//! - `HH:MM:SS.ddd` / `HH:MM:SS,ddd` (power-of-ten fraction of a second)
//!   and `HH:MM:SS.nSd` / `HH:MM:SS.n/d` (explicit denominator)
//! - `<n>[.<ddd>]h|m|s|ms` durations
//! - `<n>f` frame count and `<n>t` frame count as a time value
//!
//! Digit runs are capped at nine significant digits.

use crate::error::{Result, TimecodeError};
use crate::timecode::{Timecode, TimecodeFlags, POWERS_OF_10};
use std::str::FromStr;

const MAX_DIGITS: usize = POWERS_OF_10.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DurationUnit {
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

/// Reads up to [`MAX_DIGITS`] ASCII digits starting at `start`.
///
/// Returns the accumulated value and the index of the first unread byte.
fn scan_digits(bytes: &[u8], start: usize) -> (u64, usize) {
    let limit = bytes.len().min(start + MAX_DIGITS);
    let mut value = 0u64;
    let mut end = start;
    while end < limit && bytes[end].is_ascii_digit() {
        value = value * 10 + u64::from(bytes[end] - b'0');
        end += 1;
    }
    (value, end)
}

#[inline]
fn pow10(exponent: usize) -> u64 {
    10u64.pow(exponent as u32)
}

fn two_digits(bytes: &[u8], at: usize) -> Option<u8> {
    match (bytes.get(at), bytes.get(at + 1)) {
        (Some(&hi), Some(&lo)) if hi.is_ascii_digit() && lo.is_ascii_digit() => {
            Some((hi - b'0') * 10 + (lo - b'0'))
        }
        _ => None,
    }
}

/// `HH:MM:SS` at the start of the text.
fn clock_prefix(bytes: &[u8]) -> Option<(u8, u8, u8)> {
    if bytes.len() < 8 || bytes[2] != b':' || bytes[5] != b':' {
        return None;
    }
    Some((
        two_digits(bytes, 0)?,
        two_digits(bytes, 3)?,
        two_digits(bytes, 6)?,
    ))
}

impl Timecode {
    /// Parse `text` at the nominal rate `frames_max + 1`.
    ///
    /// The rate matters for `HH:MM:SS:FF` and frame-count forms; the other
    /// forms carry their own denominator.
    pub fn parse_with_frames_max(text: &str, frames_max: u32) -> Result<Self> {
        let mut tc = Self {
            frames_max,
            ..Self::default()
        };
        tc.set_from_str(text)?;
        Ok(tc)
    }

    /// Replace the value with the one described by `text`.
    ///
    /// On failure the value is reset to the default invalid timecode.
    pub fn set_from_str(&mut self, text: &str) -> Result<()> {
        let result = match clock_prefix(text.as_bytes()) {
            Some(clock) => self.parse_clock(text, clock),
            None => self.parse_with_unit(text),
        };
        if result.is_err() {
            *self = Self::default();
        }
        result
    }

    fn parse_clock(&mut self, text: &str, (hours, minutes, seconds): (u8, u8, u8)) -> Result<()> {
        if minutes > 59 || seconds > 59 {
            return Err(TimecodeError::parse(text, "minutes and seconds must be below 60"));
        }
        match &text.as_bytes()[8..] {
            [] => {
                self.frames = 0;
                self.frames_max = 0;
                self.flags.remove(
                    TimecodeFlags::IS_SECOND_FIELD | TimecodeFlags::NEGATIVE | TimecodeFlags::IS_TIME,
                );
                self.flags.insert(TimecodeFlags::NO_FRAMES_INFO);
            }
            [b'.' | b',', fraction @ ..] => self.parse_fraction(text, fraction)?,
            [separator, tens, units, field @ ..]
                if tens.is_ascii_digit()
                    && units.is_ascii_digit()
                    && !separator.is_ascii_alphanumeric() =>
            {
                let second_field = match field {
                    [] => None,
                    [b'.', b'0'] => Some(false),
                    [b'.', b'1'] => Some(true),
                    _ => return Err(TimecodeError::parse(text, "unexpected text after frames")),
                };
                self.frames = u32::from((tens - b'0') * 10 + (units - b'0'));
                match *separator {
                    b':' => self.flags.remove(TimecodeFlags::DROP_FRAME),
                    b';' => self.flags.insert(TimecodeFlags::DROP_FRAME),
                    _ => {
                        self.flags.remove(TimecodeFlags::DROP_FRAME);
                        self.flags.insert(TimecodeFlags::RATE_1001);
                    }
                }
                match second_field {
                    Some(parity) => {
                        self.flags.insert(TimecodeFlags::MUST_USE_SECOND_FIELD);
                        self.flags.set(TimecodeFlags::IS_SECOND_FIELD, parity);
                    }
                    None => self.flags.remove(TimecodeFlags::IS_SECOND_FIELD),
                }
                self.flags.remove(
                    TimecodeFlags::NEGATIVE | TimecodeFlags::NO_FRAMES_INFO | TimecodeFlags::IS_TIME,
                );
            }
            _ => return Err(TimecodeError::parse(text, "expected :FF, ;FF or a fraction")),
        }
        self.hours = hours.into();
        self.minutes = minutes;
        self.seconds = seconds;
        self.flags.insert(TimecodeFlags::VALID);
        Ok(())
    }

    /// Fraction of a second after `HH:MM:SS.`.
    fn parse_fraction(&mut self, text: &str, fraction: &[u8]) -> Result<()> {
        if fraction.is_empty() {
            return Err(TimecodeError::parse(text, "missing fraction digits"));
        }
        let (numerator, end) = scan_digits(fraction, 0);
        let denominator = if end == fraction.len() {
            pow10(end)
        } else {
            if !matches!(fraction[end], b'S' | b'/') {
                return Err(TimecodeError::parse(text, "fraction must be digits, optionally followed by S or /"));
            }
            let rest = &fraction[end + 1..];
            let (mut denominator, mut rest_end) = scan_digits(rest, 0);
            // 1000000000 is one digit past the scanner limit.
            if rest_end == MAX_DIGITS && rest.get(rest_end) == Some(&b'0') && denominator == 100_000_000 {
                denominator = 1_000_000_000;
                rest_end += 1;
            }
            if rest_end == 0 || rest_end != rest.len() {
                return Err(TimecodeError::parse(text, "invalid fraction denominator"));
            }
            if denominator == 0 {
                return Err(TimecodeError::parse(text, "fraction denominator is zero"));
            }
            denominator
        };
        if numerator >= denominator {
            return Err(TimecodeError::parse(text, "fraction is not below one second"));
        }

        self.frames = numerator as u32;
        self.frames_max = (denominator - 1) as u32;
        self.flags.remove(
            TimecodeFlags::DROP_FRAME
                | TimecodeFlags::RATE_1001
                | TimecodeFlags::MUST_USE_SECOND_FIELD
                | TimecodeFlags::IS_SECOND_FIELD
                | TimecodeFlags::NEGATIVE
                | TimecodeFlags::NO_FRAMES_INFO,
        );
        self.flags.insert(TimecodeFlags::IS_TIME);
        Ok(())
    }

    fn parse_with_unit(&mut self, text: &str) -> Result<()> {
        let Some((&unit, body)) = text.as_bytes().split_last() else {
            return Err(TimecodeError::parse(text, "empty text"));
        };
        match unit {
            b's' => match body.split_last() {
                Some((b'm', body)) => self.parse_duration(text, body, DurationUnit::Milliseconds),
                _ => self.parse_duration(text, body, DurationUnit::Seconds),
            },
            b'm' => self.parse_duration(text, body, DurationUnit::Minutes),
            b'h' => self.parse_duration(text, body, DurationUnit::Hours),
            b'f' => self.parse_frame_count(text, body, false),
            b't' => self.parse_frame_count(text, body, true),
            _ => Err(TimecodeError::parse(text, "unknown unit")),
        }
    }

    /// `<n>[.<ddd>]` followed by a time unit; produces a time value.
    fn parse_duration(&mut self, text: &str, body: &[u8], unit: DurationUnit) -> Result<()> {
        let (whole, end) = scan_digits(body, 0);
        let fraction = match &body[end..] {
            [] => None,
            [b'.' | b',', digits @ ..] => Some(digits),
            _ => return Err(TimecodeError::parse(text, "duration must be digits")),
        };
        if end == 0 && fraction.is_none() {
            return Err(TimecodeError::parse(text, "missing digits"));
        }

        let (mut clock_seconds, leftover_ms) = match unit {
            DurationUnit::Hours => (whole * 3600, 0),
            DurationUnit::Minutes => (whole * 60, 0),
            DurationUnit::Seconds => (whole, 0),
            DurationUnit::Milliseconds => (whole / 1000, whole % 1000),
        };

        let (mut frames, denominator) = match (fraction, unit) {
            (None, DurationUnit::Milliseconds) => (leftover_ms, 1000),
            (None, _) => (0, 1),
            (Some(digits), _) => {
                let (value, digit_count) = scan_digits(digits, 0);
                if digit_count == 0 || digit_count != digits.len() {
                    return Err(TimecodeError::parse(text, "fraction must be digits"));
                }
                let scale = pow10(digit_count);
                match unit {
                    DurationUnit::Milliseconds => {
                        let mut numerator = leftover_ms * scale + value;
                        let mut denominator = 1000 * scale;
                        if digit_count > 6 {
                            let divider = pow10(digit_count - 6);
                            numerator = (numerator + divider / 2) / divider;
                            denominator = 1_000_000_000;
                        }
                        (numerator, denominator)
                    }
                    _ => {
                        // Keep a power-of-ten denominator: a hundredth of an
                        // hour is 36 s, a tenth of a minute is 6 s.
                        let (unit_seconds, divider) = match unit {
                            DurationUnit::Hours => (3600, 100),
                            DurationUnit::Minutes => (60, 10),
                            _ => (1, 1),
                        };
                        let denominator = (scale / divider).max(1);
                        let sub = value * unit_seconds * denominator / scale;
                        clock_seconds += sub / denominator;
                        (sub % denominator, denominator)
                    }
                }
            }
        };
        if frames >= denominator {
            frames -= denominator;
            clock_seconds += 1;
        }

        let hours = u32::try_from(clock_seconds / 3600)
            .map_err(|_| TimecodeError::parse(text, "duration too long"))?;
        self.hours = hours;
        self.minutes = ((clock_seconds / 60) % 60) as u8;
        self.seconds = (clock_seconds % 60) as u8;
        self.frames = frames as u32;
        self.frames_max = (denominator - 1) as u32;
        self.flags = TimecodeFlags::IS_TIME | TimecodeFlags::VALID;
        Ok(())
    }

    /// `<n>f` / `<n>t`: a raw count at the current rate, without drop-frame
    /// correction.
    fn parse_frame_count(&mut self, text: &str, body: &[u8], is_time: bool) -> Result<()> {
        let (count, end) = scan_digits(body, 0);
        if end == 0 || end != body.len() {
            return Err(TimecodeError::parse(text, "frame count must be digits"));
        }
        let rate = self.frames_max as u64 + 1;
        let hour = 3600 * rate;
        let minute = 60 * rate;
        self.hours = (count / hour) as u32;
        self.minutes = ((count % hour) / minute) as u8;
        self.seconds = ((count % minute) / rate) as u8;
        self.frames = (count % rate) as u32;
        self.flags.remove(
            TimecodeFlags::MUST_USE_SECOND_FIELD
                | TimecodeFlags::IS_SECOND_FIELD
                | TimecodeFlags::NEGATIVE
                | TimecodeFlags::NO_FRAMES_INFO,
        );
        self.flags.set(TimecodeFlags::IS_TIME, is_time);
        self.flags.insert(TimecodeFlags::VALID);
        Ok(())
    }
}

/// Parses at a nominal rate of one frame per second; use
/// [`Timecode::parse_with_frames_max`] when `FF` matters.
impl FromStr for Timecode {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_with_frames_max(s, 0)
    }
}
