//! Constants and limits for the Wireform codec engine

/// Number of 100-nanosecond ticks in one second
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Number of 100-nanosecond ticks in one day
pub const TICKS_PER_DAY: i64 = 864_000_000_000;

/// Tick count of the Unix epoch (1970-01-01T00:00:00) on the proleptic
/// Gregorian calendar starting at 0001-01-01
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Tick count of the OLE automation date epoch (1899-12-30T00:00:00)
pub const OLE_EPOCH_TICKS: i64 = 599_264_352_000_000_000;

/// Width in bytes of the default text length prefix
pub const TEXT_PREFIX_WIDTH: usize = 4;

/// Default terminator sequence for null-terminated text: a single NUL
pub const DEFAULT_TERMINATOR: &[u8] = &[0];

/// Sanity cap on decoded text length prefixes (16 MB)
pub const MAX_TEXT_LENGTH: usize = 16 * 1024 * 1024;

/// Maximum encoded length of a continuation-bit varint: a 64-bit value
/// splits into at most ceil(64 / 7) = 10 seven-bit groups
pub const MAX_GROUPED_LEN: usize = 10;

/// Maximum number of payload bytes a prefix-length varint frame may announce
/// before it can no longer fit in 64 bits
pub const MAX_PREFIXED_PAYLOAD: usize = 8;

/// Size of an encoded GUID in bytes
pub const GUID_SIZE: usize = 16;
