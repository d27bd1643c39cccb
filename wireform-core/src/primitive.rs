//! Fixed-width scalar, text, timestamp and GUID codecs
//!
//! Every routine takes the field's [`FieldOptions`] so the same function
//! serves any endianness, framing or encoding a descriptor declares.
//! [`install`] registers the whole set with a
//! [`CodecRegistry`](crate::registry::CodecRegistry) at construction.

use crate::constants::{DEFAULT_TERMINATOR, MAX_TEXT_LENGTH};
use crate::cursor::Cursor;
use crate::error::WireError;
use crate::options::{Endianness, FieldOptions, TextEncoding, TextFraming, TimeRepr};
use crate::registry::CodecRegistry;
use crate::sink::Sink;
use crate::types::{Guid, Timestamp};
use crate::Result;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

macro_rules! numeric_codecs {
    ($($ty:ty, $read:ident, $write:ident, $size:expr);+ $(;)?) => {
        $(
            #[doc = concat!("Read a `", stringify!($ty), "` honoring the field's byte order")]
            pub fn $read(cursor: &mut Cursor<'_>, options: &FieldOptions) -> Result<$ty> {
                let mut bytes = [0u8; $size];
                cursor.read_into(&mut bytes)?;
                Ok(match options.endianness {
                    Endianness::Big => <$ty>::from_be_bytes(bytes),
                    Endianness::Little => <$ty>::from_le_bytes(bytes),
                })
            }

            #[doc = concat!("Write a `", stringify!($ty), "` honoring the field's byte order")]
            pub fn $write(sink: &mut Sink<'_>, value: $ty, options: &FieldOptions) -> Result<()> {
                let bytes = match options.endianness {
                    Endianness::Big => value.to_be_bytes(),
                    Endianness::Little => value.to_le_bytes(),
                };
                sink.write_bytes(&bytes)
            }
        )+
    };
}

numeric_codecs! {
    u8,  read_u8,  write_u8,  1;
    u16, read_u16, write_u16, 2;
    u32, read_u32, write_u32, 4;
    u64, read_u64, write_u64, 8;
    i8,  read_i8,  write_i8,  1;
    i16, read_i16, write_i16, 2;
    i32, read_i32, write_i32, 4;
    i64, read_i64, write_i64, 8;
    f32, read_f32, write_f32, 4;
    f64, read_f64, write_f64, 8;
}

/// Read a bool as a single byte; any nonzero byte is true
pub fn read_bool(cursor: &mut Cursor<'_>, _options: &FieldOptions) -> Result<bool> {
    Ok(cursor.read_byte()? != 0)
}

/// Write a bool as a single 0 or 1 byte
pub fn write_bool(sink: &mut Sink<'_>, value: bool, _options: &FieldOptions) -> Result<()> {
    sink.write_byte(value as u8)
}

/// Encode text to bytes under the given character encoding
pub fn encode_text(text: &str, encoding: TextEncoding) -> Result<Vec<u8>> {
    match encoding {
        TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        TextEncoding::Ascii => {
            if !text.is_ascii() {
                return Err(WireError::MalformedEncoding(format!(
                    "non-ASCII text in an ASCII field: {text:?}"
                )));
            }
            Ok(text.as_bytes().to_vec())
        }
        TextEncoding::Utf16Le => Ok(text
            .encode_utf16()
            .flat_map(|unit| unit.to_le_bytes())
            .collect()),
        TextEncoding::Utf16Be => Ok(text
            .encode_utf16()
            .flat_map(|unit| unit.to_be_bytes())
            .collect()),
    }
}

/// Decode bytes to text under the given character encoding
pub fn decode_text(bytes: &[u8], encoding: TextEncoding) -> Result<String> {
    match encoding {
        TextEncoding::Utf8 => core::str::from_utf8(bytes)
            .map(String::from)
            .map_err(|err| WireError::MalformedEncoding(format!("invalid UTF-8: {err}"))),
        TextEncoding::Ascii => {
            if bytes.iter().any(|&b| b > 0x7F) {
                return Err(WireError::MalformedEncoding(
                    "byte above 0x7F in an ASCII field".into(),
                ));
            }
            // ASCII is a UTF-8 subset
            Ok(core::str::from_utf8(bytes)
                .map_err(|err| WireError::MalformedEncoding(format!("invalid ASCII: {err}")))?
                .into())
        }
        TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
            if bytes.len() % 2 != 0 {
                return Err(WireError::MalformedEncoding(
                    "odd byte count in a UTF-16 field".into(),
                ));
            }
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if encoding == TextEncoding::Utf16Le {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    }
                })
                .collect();
            String::from_utf16(&units)
                .map_err(|err| WireError::MalformedEncoding(format!("invalid UTF-16: {err}")))
        }
    }
}

/// Largest prefix of `bytes` no longer than `limit` that ends on a
/// character boundary for `encoding`
fn boundary_prefix(bytes: &[u8], limit: usize, encoding: TextEncoding) -> usize {
    let mut cut = limit.min(bytes.len());
    match encoding {
        TextEncoding::Utf8 => {
            while cut > 0 && cut < bytes.len() && bytes[cut] & 0xC0 == 0x80 {
                cut -= 1;
            }
        }
        TextEncoding::Ascii => {}
        TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
            cut &= !1;
            // A high surrogate just before the cut means the pair was split
            if cut >= 2 && cut < bytes.len() {
                let pair = [bytes[cut - 2], bytes[cut - 1]];
                let unit = if encoding == TextEncoding::Utf16Le {
                    u16::from_le_bytes(pair)
                } else {
                    u16::from_be_bytes(pair)
                };
                if (0xD800..0xDC00).contains(&unit) {
                    cut -= 2;
                }
            }
        }
    }
    cut
}

/// Read a text field per its declared framing
pub fn read_string(cursor: &mut Cursor<'_>, options: &FieldOptions) -> Result<String> {
    match options.framing {
        TextFraming::LengthPrefixed => {
            let len = read_u32(cursor, options)? as usize;
            if len > MAX_TEXT_LENGTH {
                return Err(WireError::MalformedEncoding(format!(
                    "text length prefix {len} exceeds cap {MAX_TEXT_LENGTH}"
                )));
            }
            let bytes = cursor.read_bytes(len)?;
            decode_text(bytes, options.encoding)
        }
        TextFraming::FixedLength => {
            let len = fixed_length(options)?;
            let mut bytes = cursor.read_bytes(len)?;
            // Trim padding: trailing NUL bytes, in code-unit steps
            let step = code_unit_size(options.encoding);
            while bytes.len() >= step && bytes[bytes.len() - step..].iter().all(|&b| b == 0) {
                bytes = &bytes[..bytes.len() - step];
            }
            decode_text(bytes, options.encoding)
        }
        TextFraming::NullTerminated => {
            let terminator = effective_terminator(options);
            let step = code_unit_size(options.encoding);
            let remaining = cursor.remaining();
            // Only matches on a code-unit boundary end the text; a zero
            // byte inside a UTF-16 unit must not
            let mut from = 0;
            let at = loop {
                let found = memchr::memmem::find(&remaining[from..], terminator).ok_or({
                    WireError::EndOfInput {
                        expected: terminator.len(),
                        actual: 0,
                    }
                })?;
                let at = from + found;
                if at % step == 0 {
                    break at;
                }
                from = at + 1;
            };
            let bytes = cursor.read_bytes(at)?;
            let text = decode_text(bytes, options.encoding)?;
            cursor.read_bytes(terminator.len())?;
            Ok(text)
        }
    }
}

/// Write a text field per its declared framing
pub fn write_string(sink: &mut Sink<'_>, text: &str, options: &FieldOptions) -> Result<()> {
    let bytes = encode_text(text, options.encoding)?;
    match options.framing {
        TextFraming::LengthPrefixed => {
            write_u32(sink, bytes.len() as u32, options)?;
            sink.write_bytes(&bytes)
        }
        TextFraming::FixedLength => {
            let len = fixed_length(options)?;
            let cut = boundary_prefix(&bytes, len, options.encoding);
            sink.write_bytes(&bytes[..cut])?;
            for _ in cut..len {
                sink.write_byte(0)?;
            }
            Ok(())
        }
        TextFraming::NullTerminated => {
            sink.write_bytes(&bytes)?;
            sink.write_bytes(effective_terminator(options))
        }
    }
}

fn code_unit_size(encoding: TextEncoding) -> usize {
    match encoding {
        TextEncoding::Utf16Le | TextEncoding::Utf16Be => 2,
        _ => 1,
    }
}

/// The terminator to frame with: a caller-set sequence verbatim, but the
/// single-NUL default widens to one NUL code unit for UTF-16 fields
fn effective_terminator(options: &FieldOptions) -> &[u8] {
    if options.terminator.as_slice() == DEFAULT_TERMINATOR
        && code_unit_size(options.encoding) == 2
    {
        &[0, 0]
    } else {
        options.terminator.as_slice()
    }
}

fn fixed_length(options: &FieldOptions) -> Result<usize> {
    options.length.ok_or_else(|| {
        WireError::Configuration("fixed-length text requires a declared length".into())
    })
}

/// Read a timestamp per the field's declared representation
pub fn read_timestamp(cursor: &mut Cursor<'_>, options: &FieldOptions) -> Result<Timestamp> {
    Ok(match options.time_repr {
        TimeRepr::Ticks => Timestamp::from_ticks(read_i64(cursor, options)?),
        TimeRepr::OleDate => Timestamp::from_ole_date(read_f64(cursor, options)?),
        TimeRepr::UnixSeconds => Timestamp::from_unix_seconds(read_i64(cursor, options)?),
    })
}

/// Write a timestamp per the field's declared representation
pub fn write_timestamp(sink: &mut Sink<'_>, value: Timestamp, options: &FieldOptions) -> Result<()> {
    match options.time_repr {
        TimeRepr::Ticks => write_i64(sink, value.ticks, options),
        TimeRepr::OleDate => write_f64(sink, value.ole_date(), options),
        TimeRepr::UnixSeconds => write_i64(sink, value.unix_seconds(), options),
    }
}

/// Read a GUID: three byte-order-sensitive groups, then eight raw bytes
pub fn read_guid(cursor: &mut Cursor<'_>, options: &FieldOptions) -> Result<Guid> {
    let data1 = read_u32(cursor, options)?;
    let data2 = read_u16(cursor, options)?;
    let data3 = read_u16(cursor, options)?;
    let mut data4 = [0u8; 8];
    cursor.read_into(&mut data4)?;
    Ok(Guid::from_fields(data1, data2, data3, data4))
}

/// Write a GUID: three byte-order-sensitive groups, then eight raw bytes
pub fn write_guid(sink: &mut Sink<'_>, value: &Guid, options: &FieldOptions) -> Result<()> {
    write_u32(sink, value.data1, options)?;
    write_u16(sink, value.data2, options)?;
    write_u16(sink, value.data3, options)?;
    sink.write_bytes(&value.data4)
}

/// Register the primitive codec set with a registry
///
/// Called once at [`CodecRegistry::new`]; first registration wins, so a
/// caller wanting a nonstandard primitive codec registers it on an empty
/// registry instead.
pub fn install(registry: &mut CodecRegistry) {
    registry.register_leaf::<u8>(read_u8, write_u8);
    registry.register_leaf::<u16>(read_u16, write_u16);
    registry.register_leaf::<u32>(read_u32, write_u32);
    registry.register_leaf::<u64>(read_u64, write_u64);
    registry.register_leaf::<i8>(read_i8, write_i8);
    registry.register_leaf::<i16>(read_i16, write_i16);
    registry.register_leaf::<i32>(read_i32, write_i32);
    registry.register_leaf::<i64>(read_i64, write_i64);
    registry.register_leaf::<f32>(read_f32, write_f32);
    registry.register_leaf::<f64>(read_f64, write_f64);
    registry.register_leaf::<bool>(read_bool, write_bool);
    registry.register_leaf_ref::<String>(read_string, write_string_ref);
    registry.register_leaf::<Timestamp>(read_timestamp, write_timestamp);
    registry.register_leaf_ref::<Guid>(read_guid, write_guid);
}

fn write_string_ref(sink: &mut Sink<'_>, value: &String, options: &FieldOptions) -> Result<()> {
    write_string(sink, value, options)
}
