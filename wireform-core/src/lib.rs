//! # Wireform Core
//!
//! A type-driven binary codec engine: declare per-field wire metadata once,
//! get paired encode/decode routines for the whole type, with no
//! hand-written per-type serialization code.
//!
//! ## Modules
//!
//! - `constants`: Wire format constants and limits
//! - `options`: Field descriptor metadata (endianness, framing, encodings)
//! - `types`: Value types with dedicated layouts (Timestamp, Guid)
//! - `cursor`: Read-side position tracking, save stacks, sub-views
//! - `sink`: Write-side position tracking, save stacks, sub-views
//! - `primitive`: Fixed-width scalar, text, timestamp and GUID codecs
//! - `varint`: Two variable-length integer encodings
//! - `field`: Field descriptors and the `Record` trait
//! - `registry`: Codec resolution, synthesis and caching

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod constants;
pub mod cursor;
pub mod error;
pub mod field;
pub mod options;
pub mod primitive;
pub mod registry;
pub mod sink;
pub mod types;
pub mod varint;

// Re-export commonly used types
pub use cursor::{Cursor, SeekOrigin};
pub use error::WireError;
pub use field::{FieldDef, Record};
pub use options::{Endianness, FieldOptions, TextEncoding, TextFraming, TimeRepr};
pub use registry::{Codec, CodecRegistry};
pub use sink::Sink;
pub use types::{Guid, Timestamp};

/// Result type alias for Wireform operations
pub type Result<T> = core::result::Result<T, WireError>;
