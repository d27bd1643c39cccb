//! Property-based tests using proptest

use proptest::prelude::*;
use wireform_core::{
    primitive, varint, Cursor, CodecRegistry, Endianness, FieldDef, FieldOptions, Record, Sink,
    TextEncoding,
};

#[derive(Debug, Default, Clone, PartialEq)]
struct Packet {
    kind: u8,
    length: u32,
    label: String,
}

impl Record for Packet {
    fn fields() -> Vec<FieldDef<Self>> {
        vec![
            FieldDef::leaf(0, "kind", FieldOptions::default(), |p: &Self| &p.kind, |p, v| {
                p.kind = v
            }),
            FieldDef::leaf(1, "length", FieldOptions::default(), |p: &Self| &p.length, |p, v| {
                p.length = v
            }),
            FieldDef::leaf(2, "label", FieldOptions::default(), |p: &Self| &p.label, |p, v| {
                p.label = v
            }),
        ]
    }
}

proptest! {
    #[test]
    fn prop_grouped_round_trip(value in any::<u64>()) {
        let mut buf = Vec::new();
        varint::write_grouped(&mut Sink::new(&mut buf), value).unwrap();
        prop_assert_eq!(buf.len(), varint::grouped_len(value));
        prop_assert_eq!(varint::read_grouped(&mut Cursor::new(&buf)).unwrap(), value);
    }

    #[test]
    fn prop_prefixed_round_trip(value in any::<u64>()) {
        let mut buf = Vec::new();
        varint::write_prefixed(&mut Sink::new(&mut buf), value).unwrap();
        prop_assert_eq!(buf.len(), varint::prefixed_len(value));
        prop_assert_eq!(varint::read_prefixed(&mut Cursor::new(&buf)).unwrap(), value);
    }

    #[test]
    fn prop_varint_length_monotone(a in any::<u64>(), b in any::<u64>()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(varint::grouped_len(lo) <= varint::grouped_len(hi));
        prop_assert!(varint::prefixed_len(lo) <= varint::prefixed_len(hi));
    }

    #[test]
    fn prop_grouped_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..64)) {
        // Random bytes either decode or fail cleanly, never panic
        let _ = varint::read_grouped(&mut Cursor::new(&data));
    }

    #[test]
    fn prop_prefixed_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = varint::read_prefixed(&mut Cursor::new(&data));
    }

    #[test]
    fn prop_scalar_round_trip_both_orders(
        value in any::<i64>(),
        little in any::<bool>(),
    ) {
        let options = FieldOptions::new().endianness(if little {
            Endianness::Little
        } else {
            Endianness::Big
        });
        let mut buf = Vec::new();
        primitive::write_i64(&mut Sink::new(&mut buf), value, &options).unwrap();
        let back = primitive::read_i64(&mut Cursor::new(&buf), &options).unwrap();
        prop_assert_eq!(back, value);
    }

    #[test]
    fn prop_string_round_trip(text in "\\PC{0,64}") {
        for encoding in [TextEncoding::Utf8, TextEncoding::Utf16Le, TextEncoding::Utf16Be] {
            let options = FieldOptions::new().encoding(encoding);
            let mut buf = Vec::new();
            primitive::write_string(&mut Sink::new(&mut buf), &text, &options).unwrap();
            let back = primitive::read_string(&mut Cursor::new(&buf), &options).unwrap();
            prop_assert_eq!(&back, &text);
        }
    }

    #[test]
    fn prop_record_round_trip(
        kind in any::<u8>(),
        length in any::<u32>(),
        label in "[a-zA-Z0-9 ]{0,32}",
    ) {
        let mut registry = CodecRegistry::new();
        registry.register_record::<Packet>();
        let packet = Packet { kind, length, label };
        let mut buf = Vec::new();
        registry.encode(&mut Sink::new(&mut buf), &packet).unwrap();
        let back: Packet = registry.decode(&mut Cursor::new(&buf)).unwrap();
        prop_assert_eq!(back, packet);
    }

    #[test]
    fn prop_record_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..128)) {
        let mut registry = CodecRegistry::new();
        registry.register_record::<Packet>();
        let _ = registry.decode::<Packet>(&mut Cursor::new(&data));
    }

    #[test]
    fn prop_slice_isolation(
        data in prop::collection::vec(any::<u8>(), 8..128),
        start in 0usize..4,
        len in 0usize..4,
    ) {
        let cursor = Cursor::new(&data);
        let sub = cursor.slice(start, len).unwrap();
        // A sub-view never reports length beyond its own window
        prop_assert_eq!(sub.bytes_left(), len);
        prop_assert_eq!(sub.remaining(), &data[start..start + len]);
        prop_assert_eq!(cursor.position(), 0);
    }
}
