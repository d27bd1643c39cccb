use std::fs;
use tempfile::tempdir;

use wireform_cli::commands::{inspect, scalar, varint};
use wireform_cli::{Scheme, WidthArg};

#[test]
fn test_encode_varint_grouped() {
    let result = varint::encode("300", Scheme::Grouped, WidthArg::U64);
    assert!(result.is_ok());
}

#[test]
fn test_encode_varint_prefixed_hex_value() {
    let result = varint::encode("0x1234", Scheme::Prefixed, WidthArg::U32);
    assert!(result.is_ok());
}

#[test]
fn test_encode_varint_negative_signed() {
    let result = varint::encode("-5", Scheme::Grouped, WidthArg::I32);
    assert!(result.is_ok());
}

#[test]
fn test_encode_varint_rejects_negative_unsigned() {
    let result = varint::encode("-5", Scheme::Grouped, WidthArg::U32);
    assert!(result.is_err());
}

#[test]
fn test_encode_varint_rejects_width_overflow() {
    let result = varint::encode("300", Scheme::Grouped, WidthArg::U8);
    assert!(result.is_err());
}

#[test]
fn test_decode_varint_grouped() {
    // 300 encoded as [0x82, 0x2C]
    let result = varint::decode("82 2c", Scheme::Grouped);
    assert!(result.is_ok());
}

#[test]
fn test_decode_varint_prefixed() {
    // 0x1234 encoded as [0x92, 0x34]
    let result = varint::decode("9234", Scheme::Prefixed);
    assert!(result.is_ok());
}

#[test]
fn test_decode_varint_rejects_truncated() {
    // Continuation bit set with no byte following
    let result = varint::decode("82", Scheme::Grouped);
    assert!(result.is_err());
}

#[test]
fn test_decode_varint_rejects_bad_hex() {
    let result = varint::decode("zz", Scheme::Grouped);
    assert!(result.is_err());
}

#[test]
fn test_decode_varint_rejects_empty() {
    let result = varint::decode("", Scheme::Grouped);
    assert!(result.is_err());
}

#[test]
fn test_scalar_u32() {
    let result = scalar::execute("u32", "305419896", false);
    assert!(result.is_ok());
}

#[test]
fn test_scalar_little_endian() {
    let result = scalar::execute("u16", "4660", true);
    assert!(result.is_ok());
}

#[test]
fn test_scalar_string() {
    let result = scalar::execute("string", "hello", false);
    assert!(result.is_ok());
}

#[test]
fn test_scalar_unknown_type() {
    let result = scalar::execute("u128", "1", false);
    assert!(result.is_err());
}

#[test]
fn test_scalar_bad_value() {
    let result = scalar::execute("u32", "not-a-number", false);
    assert!(result.is_err());
}

#[test]
fn test_inspect_whole_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.bin");
    fs::write(&path, b"hello wireform\x00\x01\x02").unwrap();

    let result = inspect::execute(path.to_str().unwrap(), 0, None, false);
    assert!(result.is_ok());
}

#[test]
fn test_inspect_window() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.bin");
    fs::write(&path, (0u8..64).collect::<Vec<u8>>()).unwrap();

    let result = inspect::execute(path.to_str().unwrap(), 16, Some(16), false);
    assert!(result.is_ok());
}

#[test]
fn test_inspect_json_report() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.bin");
    fs::write(&path, b"abcdef").unwrap();

    let result = inspect::execute(path.to_str().unwrap(), 0, None, true);
    assert!(result.is_ok());
}

#[test]
fn test_inspect_offset_past_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.bin");
    fs::write(&path, b"abc").unwrap();

    let result = inspect::execute(path.to_str().unwrap(), 10, None, false);
    assert!(result.is_err());
}

#[test]
fn test_inspect_length_past_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.bin");
    fs::write(&path, b"abc").unwrap();

    let result = inspect::execute(path.to_str().unwrap(), 1, Some(100), false);
    assert!(result.is_err());
}

#[test]
fn test_inspect_missing_file() {
    let result = inspect::execute("/nonexistent/path.bin", 0, None, false);
    assert!(result.is_err());
}
