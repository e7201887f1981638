//! Integration test crate for the timecode WebVTT tools.
//!
//! Holds cross-crate tests only: timecode scenarios driven through the
//! public core API, and whole-document conversions through the CLI library.

#[cfg(test)]
mod timecode;

#[cfg(test)]
mod conversion;
