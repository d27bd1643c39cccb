//! Value types with dedicated wire layouts

use crate::constants::{OLE_EPOCH_TICKS, TICKS_PER_DAY, TICKS_PER_SECOND, UNIX_EPOCH_TICKS};
use crate::error::WireError;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// A point in time as a signed count of 100-nanosecond ticks
///
/// Ticks count from 0001-01-01T00:00:00 on the proleptic Gregorian
/// calendar. The wire form is chosen per field by
/// [`TimeRepr`](crate::options::TimeRepr), not by anything stored here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    /// Tick count
    pub ticks: i64,
}

impl Timestamp {
    /// Create a timestamp from a raw tick count
    pub fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    /// Create a timestamp from seconds since the Unix epoch
    ///
    /// Saturates at the representable tick range, so an arbitrary wire
    /// value never panics.
    pub fn from_unix_seconds(seconds: i64) -> Self {
        Self {
            ticks: seconds
                .saturating_mul(TICKS_PER_SECOND)
                .saturating_add(UNIX_EPOCH_TICKS),
        }
    }

    /// Whole seconds since the Unix epoch, rounding toward negative infinity
    pub fn unix_seconds(&self) -> i64 {
        self.ticks
            .saturating_sub(UNIX_EPOCH_TICKS)
            .div_euclid(TICKS_PER_SECOND)
    }

    /// Create a timestamp from an OLE automation date
    ///
    /// OLE dates count days from 1899-12-30. For negative values the whole
    /// part moves backward in time while the fractional part is a positive
    /// time-of-day offset, so -1.25 is 1899-12-29T06:00.
    pub fn from_ole_date(days: f64) -> Self {
        let whole = days.trunc();
        let frac = (days - whole).abs();
        let ticks = OLE_EPOCH_TICKS
            .saturating_add((whole * TICKS_PER_DAY as f64) as i64)
            .saturating_add((frac * TICKS_PER_DAY as f64) as i64);
        Self { ticks }
    }

    /// Convert to an OLE automation date
    pub fn ole_date(&self) -> f64 {
        let delta = self.ticks.saturating_sub(OLE_EPOCH_TICKS);
        if delta >= 0 {
            delta as f64 / TICKS_PER_DAY as f64
        } else {
            // Whole days backward, time-of-day forward
            let days = delta.div_euclid(TICKS_PER_DAY);
            let time = delta.rem_euclid(TICKS_PER_DAY);
            days as f64 - time as f64 / TICKS_PER_DAY as f64
        }
    }
}

/// A 128-bit identifier with the classic mixed-endian wire layout
///
/// The first three groups (u32, u16, u16) honor the field's requested byte
/// order; the trailing eight bytes are an opaque byte array and are never
/// swapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guid {
    /// First group, 32 bits
    pub data1: u32,
    /// Second group, 16 bits
    pub data2: u16,
    /// Third group, 16 bits
    pub data3: u16,
    /// Trailing eight bytes
    pub data4: [u8; 8],
}

impl Guid {
    /// Construct from the four wire groups
    pub fn from_fields(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }

    /// The all-zero identifier
    pub fn nil() -> Self {
        Self::default()
    }

    /// True if every bit is zero
    pub fn is_nil(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0],
            self.data4[1],
            self.data4[2],
            self.data4[3],
            self.data4[4],
            self.data4[5],
            self.data4[6],
            self.data4[7],
        )
    }
}

impl FromStr for Guid {
    type Err = WireError;

    /// Parse the hyphenated form `Display` emits, case-insensitively
    fn from_str(s: &str) -> core::result::Result<Self, WireError> {
        fn group(part: Option<&str>, width: usize) -> crate::Result<u64> {
            let part = part.filter(|p| p.len() == width).ok_or_else(|| {
                WireError::MalformedEncoding(
                    "GUID text must be five hyphenated hex groups (8-4-4-4-12)".into(),
                )
            })?;
            if !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(WireError::MalformedEncoding(
                    "GUID group is not hexadecimal".into(),
                ));
            }
            u64::from_str_radix(part, 16).map_err(|_| {
                WireError::MalformedEncoding("GUID group is not hexadecimal".into())
            })
        }

        let mut parts = s.split('-');
        let data1 = group(parts.next(), 8)? as u32;
        let data2 = group(parts.next(), 4)? as u16;
        let data3 = group(parts.next(), 4)? as u16;
        let head = group(parts.next(), 4)? as u16;
        let tail = group(parts.next(), 12)?;
        if parts.next().is_some() {
            return Err(WireError::MalformedEncoding(
                "GUID text must be five hyphenated hex groups (8-4-4-4-12)".into(),
            ));
        }

        let mut data4 = [0u8; 8];
        data4[..2].copy_from_slice(&head.to_be_bytes());
        data4[2..].copy_from_slice(&tail.to_be_bytes()[2..]);
        Ok(Self {
            data1,
            data2,
            data3,
            data4,
        })
    }
}
