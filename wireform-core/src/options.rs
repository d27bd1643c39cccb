//! Per-field wire options
//!
//! A [`FieldOptions`] value is the declarative half of a field descriptor:
//! everything about a member's wire form that is not its Rust type. The
//! other half (order index, name, accessors) lives in
//! [`crate::field::FieldDef`]. Options are read once, at codec synthesis,
//! and baked into the composed routines.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TERMINATOR;

/// Byte order for multi-byte scalar values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endianness {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
}

impl Endianness {
    /// The byte order of the machine this code was compiled for
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endianness = Endianness::Little;

    /// The byte order of the machine this code was compiled for
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endianness = Endianness::Big;

    /// True if values must be byte-swapped relative to native order
    pub fn swaps_native(self) -> bool {
        self != Self::NATIVE
    }
}

impl Default for Endianness {
    fn default() -> Self {
        Endianness::Big
    }
}

/// Character encoding for text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    /// UTF-8 (default)
    Utf8,
    /// Strict 7-bit ASCII; bytes above 0x7F are malformed
    Ascii,
    /// UTF-16, little-endian code units
    Utf16Le,
    /// UTF-16, big-endian code units
    Utf16Be,
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding::Utf8
    }
}

/// How a text field's extent is framed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextFraming {
    /// A 4-byte byte-count prefix precedes the text
    LengthPrefixed,
    /// Exactly `length` bytes, NUL-padded on encode, trailing NULs trimmed
    /// on decode
    FixedLength,
    /// Text runs until the terminator byte sequence
    NullTerminated,
}

impl Default for TextFraming {
    fn default() -> Self {
        TextFraming::LengthPrefixed
    }
}

/// Wire representation of a [`crate::types::Timestamp`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRepr {
    /// Signed 64-bit count of 100-nanosecond ticks (default)
    Ticks,
    /// OLE automation date: f64 day count from 1899-12-30
    OleDate,
    /// Signed 64-bit seconds since the Unix epoch
    UnixSeconds,
}

impl Default for TimeRepr {
    fn default() -> Self {
        TimeRepr::Ticks
    }
}

/// Wire options for a single field
///
/// `Default` gives the conventions most formats want: big-endian, UTF-8,
/// length-prefixed text, tick timestamps, single-NUL terminator. The
/// builder-style setters override one knob at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOptions {
    /// Byte order override; fields inherit `Endianness::default()` otherwise
    pub endianness: Endianness,
    /// Fixed byte length, required by `TextFraming::FixedLength`
    pub length: Option<usize>,
    /// Text extent framing
    pub framing: TextFraming,
    /// Text character encoding
    pub encoding: TextEncoding,
    /// Terminator byte sequence for `TextFraming::NullTerminated`
    pub terminator: Vec<u8>,
    /// Timestamp wire representation
    pub time_repr: TimeRepr,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            endianness: Endianness::default(),
            length: None,
            framing: TextFraming::default(),
            encoding: TextEncoding::default(),
            terminator: DEFAULT_TERMINATOR.to_vec(),
            time_repr: TimeRepr::default(),
        }
    }
}

impl FieldOptions {
    /// Options with every knob at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte order
    pub fn endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Set a fixed byte length and switch to fixed-length framing
    pub fn fixed_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self.framing = TextFraming::FixedLength;
        self
    }

    /// Switch to null-terminated framing with the default terminator
    pub fn null_terminated(mut self) -> Self {
        self.framing = TextFraming::NullTerminated;
        self
    }

    /// Set the terminator sequence and switch to null-terminated framing
    pub fn terminator(mut self, terminator: Vec<u8>) -> Self {
        self.terminator = terminator;
        self.framing = TextFraming::NullTerminated;
        self
    }

    /// Set the text encoding
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the timestamp representation
    pub fn time_repr(mut self, repr: TimeRepr) -> Self {
        self.time_repr = repr;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_format_conventions() {
        let opts = FieldOptions::default();
        assert_eq!(opts.endianness, Endianness::Big);
        assert_eq!(opts.framing, TextFraming::LengthPrefixed);
        assert_eq!(opts.encoding, TextEncoding::Utf8);
        assert_eq!(opts.terminator, &[0]);
        assert_eq!(opts.time_repr, TimeRepr::Ticks);
        assert!(opts.length.is_none());
    }

    #[test]
    fn test_fixed_length_switches_framing() {
        let opts = FieldOptions::new().fixed_length(4);
        assert_eq!(opts.length, Some(4));
        assert_eq!(opts.framing, TextFraming::FixedLength);
    }

    #[test]
    fn test_native_endianness_never_swaps() {
        assert!(!Endianness::NATIVE.swaps_native());
    }
}
