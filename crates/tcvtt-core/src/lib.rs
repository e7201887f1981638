//! TCVTT Core - broadcast timecode value type
//!
//! This crate provides the timecode arithmetic used by the TCVTT tools:
//! - Exact conversion between absolute frame counts and `H:M:S:F`
//! - SMPTE drop-frame counting and interlaced field precision
//! - Parsing and formatting of the textual timecode forms
//! - Mixed-rate addition, subtraction and ordering
//! - Rational frame-rate descriptors

pub mod error;
mod parse;
pub mod rate;
pub mod timecode;

pub use error::{Result, TimecodeError};
pub use rate::FrameRate;
pub use timecode::{Timecode, TimecodeFlags};
