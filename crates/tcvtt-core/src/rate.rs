//! Frame rate descriptors.
//!
//! A frame rate is kept as an exact ratio so that 30000/1001 never turns
//! into 29.97 on its way to a timecode. Timecodes themselves only store
//! the nominal integer rate (`frames_max + 1`) plus a 1001 flag.

use crate::error::{Result, TimecodeError};
use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Duration of a single frame in seconds.
    #[inline]
    pub fn frame_duration(self) -> Rational64 {
        Rational64::new(self.denominator as i64, self.numerator as i64)
    }

    /// Whether this is an NTSC-style rate (denominator 1001).
    #[inline]
    pub fn is_1001(self) -> bool {
        self.denominator == 1001
    }

    /// Highest frame number of the nominal rate: `ceil(numerator / denominator) - 1`.
    ///
    /// Fails when the rate is zero or when the nominal rate does not fit
    /// a `u32` frame counter.
    pub fn frames_max(self) -> Result<u32> {
        if self.numerator == 0 || self.denominator == 0 {
            return Err(self.invalid());
        }
        let nominal = (self.numerator as u64).div_ceil(self.denominator as u64);
        u32::try_from(nominal - 1).map_err(|_| self.invalid())
    }

    fn invalid(self) -> TimecodeError {
        TimecodeError::InvalidFrameRate {
            numerator: self.numerator as u64,
            denominator: self.denominator as u64,
        }
    }

    /// Common frame rates
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_50: Self = Self::new(50, 1);
    pub const FPS_59_94: Self = Self::new(60000, 1001);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_25
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

/// Parses `"N"` or `"N/D"`, the way MediaInfo writes frame rates.
impl FromStr for FrameRate {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || TimecodeError::parse(s, "expected N or N/D frame rate");
        let (num, den) = match s.trim().split_once('/') {
            Some((num, den)) => (num, den),
            None => (s.trim(), "1"),
        };
        let numerator = num.parse::<u32>().map_err(|_| bad())?;
        let denominator = den.parse::<u32>().map_err(|_| bad())?;
        let rate = Self::new(numerator, denominator);
        rate.frames_max()?;
        Ok(rate)
    }
}
