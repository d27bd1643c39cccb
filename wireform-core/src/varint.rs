//! Variable-length integer encodings
//!
//! Two independent compact encodings, each round-tripping 8/16/32/64-bit
//! signed and unsigned integers exactly. Signed values travel as the two's
//! complement bit pattern of their declared width, so `-1i16` costs three
//! grouped bytes, not ten.
//!
//! **Grouped** (continuation-bit framing): the value's big-endian bit
//! pattern split into 7-bit groups, most significant group first, leading
//! all-zero groups dropped (zero itself keeps one byte). Every byte but the
//! last carries the 0x80 continuation bit.
//!
//! **Prefixed** (prefix-length framing): a unary run of leading one-bits,
//! read across any number of 0xFF bytes, counts the payload bytes that
//! follow; the low bits of the byte holding the terminating zero-bit are
//! the most significant value bits.
//!
//! ```text
//! grouped  0x1234:  10100100 00110100            (2 bytes)
//! prefixed 0x1234:  10010010 00110100            (2 bytes)
//! ```
//!
//! Within each scheme, encoded length is monotone in magnitude: a larger
//! value never encodes strictly shorter.

use crate::constants::{MAX_GROUPED_LEN, MAX_PREFIXED_PAYLOAD};
use crate::cursor::Cursor;
use crate::error::WireError;
use crate::sink::Sink;
use crate::Result;
use alloc::format;

/// Number of bytes `write_grouped` will emit for `value`
pub fn grouped_len(value: u64) -> usize {
    if value == 0 {
        1
    } else {
        (64 - value.leading_zeros() as usize).div_ceil(7)
    }
}

/// Encode a value with continuation-bit framing, most significant group
/// first. Returns the number of bytes written.
pub fn write_grouped(sink: &mut Sink<'_>, value: u64) -> Result<usize> {
    let groups = grouped_len(value);
    for i in (0..groups).rev() {
        let mut byte = ((value >> (i * 7)) & 0x7F) as u8;
        if i != 0 {
            byte |= 0x80;
        }
        sink.write_byte(byte)?;
    }
    Ok(groups)
}

/// Decode a continuation-bit framed value
///
/// Exhausting the source while the continuation bit is still set is
/// [`WireError::MalformedEncoding`]; an empty source is plain
/// [`WireError::EndOfInput`].
pub fn read_grouped(cursor: &mut Cursor<'_>) -> Result<u64> {
    let mut value = 0u64;
    let mut count = 0usize;
    loop {
        let byte = match cursor.read_byte() {
            Ok(byte) => byte,
            Err(WireError::EndOfInput { .. }) if count > 0 => {
                return Err(WireError::MalformedEncoding(
                    "input ended with the continuation bit set".into(),
                ));
            }
            Err(err) => return Err(err),
        };
        if count == MAX_GROUPED_LEN {
            return Err(WireError::MalformedEncoding(format!(
                "grouped varint exceeds {MAX_GROUPED_LEN} bytes"
            )));
        }
        if value >> 57 != 0 {
            return Err(WireError::MalformedEncoding(
                "grouped varint overflows 64 bits".into(),
            ));
        }
        value = (value << 7) | (byte & 0x7F) as u64;
        count += 1;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
}

/// Number of bytes `write_prefixed` will emit for `value`
pub fn prefixed_len(value: u64) -> usize {
    // With e payload bytes (e <= 7) the frame byte keeps 7 - e value bits,
    // for 7 * (e + 1) bits of capacity. Past 56 bits the unary prefix
    // spills into a full 0xFF byte: 1 + 1 + 8 = 10 bytes.
    for extra in 0..=7usize {
        let capacity = 7 * (extra + 1);
        if capacity >= 64 || value < (1u64 << capacity) {
            return extra + 1;
        }
    }
    10
}

/// Encode a value with prefix-length framing. Returns the number of bytes
/// written.
pub fn write_prefixed(sink: &mut Sink<'_>, value: u64) -> Result<usize> {
    let total = prefixed_len(value);
    if total <= 8 {
        let extra = total - 1;
        // Frame byte: `extra` one-bits, a zero, then the top value bits
        let prefix = !(0xFFu8 >> extra);
        let frame = prefix | (value >> (8 * extra)) as u8;
        sink.write_byte(frame)?;
        for i in (0..extra).rev() {
            sink.write_byte((value >> (8 * i)) as u8)?;
        }
    } else {
        // 57..64-bit values: a full 0xFF prefix byte, a zero frame byte,
        // then the whole value big-endian
        sink.write_byte(0xFF)?;
        sink.write_byte(0x00)?;
        sink.write_bytes(&value.to_be_bytes())?;
    }
    Ok(total)
}

/// Decode a prefix-length framed value
///
/// Exhausting the source inside the 0xFF run, inside the payload, or
/// meeting a prefix that announces more than 8 payload bytes is
/// [`WireError::MalformedEncoding`]; an empty source is plain
/// [`WireError::EndOfInput`].
pub fn read_prefixed(cursor: &mut Cursor<'_>) -> Result<u64> {
    let mut ff_count = 0usize;
    let frame = loop {
        let byte = match cursor.read_byte() {
            Ok(byte) => byte,
            Err(WireError::EndOfInput { .. }) if ff_count > 0 => {
                return Err(WireError::MalformedEncoding(
                    "input ended inside the 0xFF prefix run".into(),
                ));
            }
            Err(err) => return Err(err),
        };
        if byte != 0xFF {
            break byte;
        }
        ff_count += 1;
        if ff_count * 8 > MAX_PREFIXED_PAYLOAD {
            return Err(WireError::MalformedEncoding(format!(
                "prefix announces more than {MAX_PREFIXED_PAYLOAD} payload bytes"
            )));
        }
    };
    let ones = frame.leading_ones() as usize;
    let extra = ff_count * 8 + ones;
    if extra > MAX_PREFIXED_PAYLOAD {
        return Err(WireError::MalformedEncoding(format!(
            "prefix announces {extra} payload bytes, max {MAX_PREFIXED_PAYLOAD}"
        )));
    }
    let mut value = (frame & (0x7F >> ones)) as u64;
    if extra == 8 && value != 0 {
        return Err(WireError::MalformedEncoding(
            "prefixed varint overflows 64 bits".into(),
        ));
    }
    for _ in 0..extra {
        let byte = match cursor.read_byte() {
            Ok(byte) => byte,
            Err(WireError::EndOfInput { .. }) => {
                return Err(WireError::MalformedEncoding(
                    "input ended inside the announced payload".into(),
                ));
            }
            Err(err) => return Err(err),
        };
        value = (value << 8) | byte as u64;
    }
    Ok(value)
}

fn narrow<T: TryFrom<u64>>(raw: u64, width: &str) -> Result<T> {
    T::try_from(raw)
        .map_err(|_| WireError::MalformedEncoding(format!("value {raw} does not fit in {width}")))
}

macro_rules! width_codecs {
    ($($ty:ty => $carrier:ty, $rg:ident, $wg:ident, $rp:ident, $wp:ident);+ $(;)?) => {
        $(
            #[doc = concat!("Grouped encode of a `", stringify!($ty), "` via its width's bit pattern")]
            pub fn $wg(sink: &mut Sink<'_>, value: $ty) -> Result<usize> {
                write_grouped(sink, value as $carrier as u64)
            }

            #[doc = concat!("Grouped decode into a `", stringify!($ty), "`; wider values are malformed")]
            pub fn $rg(cursor: &mut Cursor<'_>) -> Result<$ty> {
                Ok(narrow::<$carrier>(read_grouped(cursor)?, stringify!($ty))? as $ty)
            }

            #[doc = concat!("Prefixed encode of a `", stringify!($ty), "` via its width's bit pattern")]
            pub fn $wp(sink: &mut Sink<'_>, value: $ty) -> Result<usize> {
                write_prefixed(sink, value as $carrier as u64)
            }

            #[doc = concat!("Prefixed decode into a `", stringify!($ty), "`; wider values are malformed")]
            pub fn $rp(cursor: &mut Cursor<'_>) -> Result<$ty> {
                Ok(narrow::<$carrier>(read_prefixed(cursor)?, stringify!($ty))? as $ty)
            }
        )+
    };
}

width_codecs! {
    u8  => u8,  read_grouped_u8,  write_grouped_u8,  read_prefixed_u8,  write_prefixed_u8;
    u16 => u16, read_grouped_u16, write_grouped_u16, read_prefixed_u16, write_prefixed_u16;
    u32 => u32, read_grouped_u32, write_grouped_u32, read_prefixed_u32, write_prefixed_u32;
    u64 => u64, read_grouped_u64, write_grouped_u64, read_prefixed_u64, write_prefixed_u64;
    i8  => u8,  read_grouped_i8,  write_grouped_i8,  read_prefixed_i8,  write_prefixed_i8;
    i16 => u16, read_grouped_i16, write_grouped_i16, read_prefixed_i16, write_prefixed_i16;
    i32 => u32, read_grouped_i32, write_grouped_i32, read_prefixed_i32, write_prefixed_i32;
    i64 => u64, read_grouped_i64, write_grouped_i64, read_prefixed_i64, write_prefixed_i64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn grouped_bytes(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut sink = Sink::new(&mut buf);
        write_grouped(&mut sink, value).unwrap();
        buf
    }

    fn prefixed_bytes(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut sink = Sink::new(&mut buf);
        write_prefixed(&mut sink, value).unwrap();
        buf
    }

    #[test]
    fn test_grouped_known_patterns() {
        assert_eq!(grouped_bytes(0), &[0x00]);
        assert_eq!(grouped_bytes(1), &[0x01]);
        assert_eq!(grouped_bytes(127), &[0x7F]);
        assert_eq!(grouped_bytes(128), &[0x81, 0x00]);
        assert_eq!(grouped_bytes(300), &[0x82, 0x2C]);
        assert_eq!(grouped_bytes(16383), &[0xFF, 0x7F]);
        let max = grouped_bytes(u64::MAX);
        assert_eq!(max.len(), 10);
        assert_eq!(max[0], 0x81);
        assert_eq!(max[9], 0x7F);
    }

    #[test]
    fn test_prefixed_known_patterns() {
        assert_eq!(prefixed_bytes(0), &[0x00]);
        assert_eq!(prefixed_bytes(127), &[0x7F]);
        assert_eq!(prefixed_bytes(128), &[0x80, 0x80]);
        assert_eq!(prefixed_bytes(0x1234), &[0x92, 0x34]);
        let max = prefixed_bytes(u64::MAX);
        assert_eq!(max.len(), 10);
        assert_eq!(max[0], 0xFF);
        assert_eq!(max[1], 0x00);
        assert!(max[2..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_round_trip_spec_values() {
        for value in [0u64, 1, 127, 128, 16383, (1 << 31) - 1, u64::MAX] {
            let g = grouped_bytes(value);
            assert_eq!(read_grouped(&mut Cursor::new(&g)).unwrap(), value);
            let p = prefixed_bytes(value);
            assert_eq!(read_prefixed(&mut Cursor::new(&p)).unwrap(), value);
        }
    }

    #[test]
    fn test_length_monotone_in_magnitude() {
        let buckets = [0u64, 1, 127, 128, 16383, 16384, (1 << 31) - 1, u64::MAX];
        for pair in buckets.windows(2) {
            assert!(grouped_len(pair[0]) <= grouped_len(pair[1]));
            assert!(prefixed_len(pair[0]) <= prefixed_len(pair[1]));
        }
    }

    #[test]
    fn test_length_predictors_match_writes() {
        for value in [0u64, 1, 255, 256, 65535, 1 << 20, 1 << 56, (1 << 56) + 1, u64::MAX] {
            assert_eq!(grouped_bytes(value).len(), grouped_len(value));
            assert_eq!(prefixed_bytes(value).len(), prefixed_len(value));
        }
    }

    #[test]
    fn test_grouped_truncation_is_malformed() {
        let mut bytes = grouped_bytes(16383);
        bytes.pop();
        let err = read_grouped(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, WireError::MalformedEncoding(_)));
    }

    #[test]
    fn test_grouped_empty_is_end_of_input() {
        let err = read_grouped(&mut Cursor::new(&[])).unwrap_err();
        assert!(matches!(err, WireError::EndOfInput { .. }));
    }

    #[test]
    fn test_grouped_overlong_is_malformed() {
        let bytes = [0xFFu8; 11];
        let err = read_grouped(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, WireError::MalformedEncoding(_)));
    }

    #[test]
    fn test_prefixed_ff_run_exhaustion_is_malformed() {
        let err = read_prefixed(&mut Cursor::new(&[0xFF])).unwrap_err();
        assert!(matches!(err, WireError::MalformedEncoding(_)));
    }

    #[test]
    fn test_prefixed_truncated_payload_is_malformed() {
        // Frame announces two payload bytes, only one present
        let err = read_prefixed(&mut Cursor::new(&[0xC0, 0x01])).unwrap_err();
        assert!(matches!(err, WireError::MalformedEncoding(_)));
    }

    #[test]
    fn test_prefixed_oversized_prefix_is_malformed() {
        let err = read_prefixed(&mut Cursor::new(&[0xFF, 0xFF, 0x00])).unwrap_err();
        assert!(matches!(err, WireError::MalformedEncoding(_)));
        // 0xFF run byte plus a frame with further ones announces 9+ bytes
        let err = read_prefixed(&mut Cursor::new(&[0xFF, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0]))
            .unwrap_err();
        assert!(matches!(err, WireError::MalformedEncoding(_)));
    }

    #[test]
    fn test_signed_widths_use_their_own_bit_pattern() {
        let mut buf = Vec::new();
        let mut sink = Sink::new(&mut buf);
        write_grouped_i16(&mut sink, -1).unwrap();
        assert_eq!(buf, &[0x83, 0xFF, 0x7F]); // 0xFFFF in three groups
        assert_eq!(read_grouped_i16(&mut Cursor::new(&buf)).unwrap(), -1);

        let mut buf = Vec::new();
        let mut sink = Sink::new(&mut buf);
        write_prefixed_i8(&mut sink, -2).unwrap();
        assert_eq!(read_prefixed_i8(&mut Cursor::new(&buf)).unwrap(), -2);
    }

    #[test]
    fn test_narrowing_rejects_wide_values() {
        let bytes = grouped_bytes(300);
        let err = read_grouped_u8(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, WireError::MalformedEncoding(_)));
    }

    #[test]
    fn test_signed_round_trip_all_widths() {
        for value in [i64::MIN, -1, 0, 1, i64::MAX] {
            let mut buf = Vec::new();
            write_grouped_i64(&mut Sink::new(&mut buf), value).unwrap();
            assert_eq!(read_grouped_i64(&mut Cursor::new(&buf)).unwrap(), value);

            let mut buf = Vec::new();
            write_prefixed_i64(&mut Sink::new(&mut buf), value).unwrap();
            assert_eq!(read_prefixed_i64(&mut Cursor::new(&buf)).unwrap(), value);
        }
    }
}
