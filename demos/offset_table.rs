//! Build a container with an offset directory pointing into a data blob,
//! the way table-based formats lay out nested regions.
//!
//! Run with: cargo run --example offset_table

use wireform_core::{Cursor, CodecRegistry, FieldDef, FieldOptions, Record, SeekOrigin, Sink};

#[derive(Debug, Default, Clone, PartialEq)]
struct NameRecord {
    platform: u16,
    name: String,
}

impl Record for NameRecord {
    fn fields() -> Vec<FieldDef<Self>> {
        vec![
            FieldDef::leaf(0, "platform", FieldOptions::default(), |n: &Self| &n.platform, |n, v| {
                n.platform = v
            }),
            FieldDef::leaf(
                1,
                "name",
                FieldOptions::new().null_terminated(),
                |n: &Self| &n.name,
                |n, v| n.name = v,
            ),
        ]
    }
}

fn main() {
    let mut registry = CodecRegistry::new();
    registry.register_record::<NameRecord>();

    let records = vec![
        NameRecord {
            platform: 1,
            name: "Regular".to_string(),
        },
        NameRecord {
            platform: 3,
            name: "Bold Italic".to_string(),
        },
    ];

    // Reserve the directory, write the blob, patch offsets afterwards
    let mut buf = Vec::new();
    {
        let mut sink = Sink::new(&mut buf);
        let dir_bytes = (records.len() * 8) as i64;
        sink.seek(dir_bytes, SeekOrigin::Start).unwrap();

        let mut directory = Vec::new();
        for record in &records {
            let start = sink.position() as u32;
            registry.encode(&mut sink, record).unwrap();
            directory.push((start, sink.position() as u32 - start));
        }

        sink.push_seek(0, SeekOrigin::Start).unwrap();
        for (offset, length) in directory {
            registry.encode(&mut sink, &offset).unwrap();
            registry.encode(&mut sink, &length).unwrap();
        }
        sink.pop().unwrap();
    }

    // Read back through bounded sub-views
    let mut cursor = Cursor::new(&buf);
    for _ in 0..records.len() {
        let offset: u32 = registry.decode(&mut cursor).unwrap();
        let length: u32 = registry.decode(&mut cursor).unwrap();
        let mut region = cursor.slice(offset as usize, length as usize).unwrap();
        let record: NameRecord = registry.decode(&mut region).unwrap();
        println!("[{offset:>3}..+{length}] {record:?}");
    }
}
