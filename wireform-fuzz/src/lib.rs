//! Fuzzing placeholder for wireform-core decoders
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_varint

use wireform_core::{Cursor, CodecRegistry, FieldDef, FieldOptions, Record, varint};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FuzzRecord {
    pub id: u32,
    pub label: String,
    pub weight: i16,
}

impl Record for FuzzRecord {
    fn fields() -> Vec<FieldDef<Self>> {
        vec![
            FieldDef::leaf(0, "id", FieldOptions::default(), |r: &Self| &r.id, |r, v| r.id = v),
            FieldDef::leaf(1, "label", FieldOptions::default(), |r: &Self| &r.label, |r, v| {
                r.label = v
            }),
            FieldDef::leaf(2, "weight", FieldOptions::default(), |r: &Self| &r.weight, |r, v| {
                r.weight = v
            }),
        ]
    }
}

pub fn fuzz_grouped_varint(data: &[u8]) {
    // Either decodes or fails cleanly - should never panic
    let _ = varint::read_grouped(&mut Cursor::new(data));
}

pub fn fuzz_prefixed_varint(data: &[u8]) {
    let _ = varint::read_prefixed(&mut Cursor::new(data));
}

pub fn fuzz_record_decode(data: &[u8]) {
    let mut registry = CodecRegistry::new();
    registry.register_record::<FuzzRecord>();
    let _ = registry.decode::<FuzzRecord>(&mut Cursor::new(data));
}

pub fn fuzz_string_decode(data: &[u8]) {
    let registry = CodecRegistry::new();
    let _ = registry.decode::<String>(&mut Cursor::new(data));
}
