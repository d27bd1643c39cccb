//! Declare a record, encode it, decode it back.
//!
//! Run with: cargo run --example basic_record

use wireform_core::{
    Cursor, CodecRegistry, Endianness, FieldDef, FieldOptions, Record, Sink, TimeRepr, Timestamp,
};

#[derive(Debug, Default, Clone, PartialEq)]
struct LogEntry {
    sequence: u64,
    level: u8,
    stamp: Timestamp,
    message: String,
}

impl Record for LogEntry {
    fn fields() -> Vec<FieldDef<Self>> {
        vec![
            FieldDef::leaf(0, "sequence", FieldOptions::default(), |e: &Self| &e.sequence, |e, v| {
                e.sequence = v
            }),
            FieldDef::leaf(1, "level", FieldOptions::default(), |e: &Self| &e.level, |e, v| {
                e.level = v
            }),
            FieldDef::leaf(
                2,
                "stamp",
                FieldOptions::new().time_repr(TimeRepr::UnixSeconds),
                |e: &Self| &e.stamp,
                |e, v| e.stamp = v,
            ),
            FieldDef::leaf(
                3,
                "message",
                FieldOptions::new().endianness(Endianness::Little),
                |e: &Self| &e.message,
                |e, v| e.message = v,
            ),
        ]
    }
}

fn main() {
    let mut registry = CodecRegistry::new();
    registry.register_record::<LogEntry>();

    let entry = LogEntry {
        sequence: 42,
        level: 3,
        stamp: Timestamp::from_unix_seconds(1_700_000_000),
        message: "engine started".to_string(),
    };

    let mut buf = Vec::new();
    registry.encode(&mut Sink::new(&mut buf), &entry).unwrap();
    println!("encoded {} bytes: {}", buf.len(), hex_dump(&buf));

    let decoded: LogEntry = registry.decode(&mut Cursor::new(&buf)).unwrap();
    println!("decoded: {decoded:?}");
    assert_eq!(decoded, entry);
}

fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
