use anyhow::{anyhow, Context, Result};
use colored::*;
use serde::Serialize;
use std::fs;
use std::io::Read;
use tracing::info;
use wireform_core::Cursor;

#[derive(Serialize)]
struct InspectReport {
    input: String,
    file_size: usize,
    offset: usize,
    length: usize,
    hex: String,
}

/// Hex dump a window of a file, 16 bytes per row with an ASCII column.
pub fn execute(input: &str, offset: usize, length: Option<usize>, json: bool) -> Result<()> {
    let data = if input == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .with_context(|| "Failed to read stdin")?;
        buf
    } else {
        fs::read(input).with_context(|| format!("Failed to read input file: {}", input))?
    };

    info!("Read {} bytes from {}", data.len(), input);

    if offset > data.len() {
        return Err(anyhow!(
            "Offset {} is past the end of the input ({} bytes)",
            offset,
            data.len()
        ));
    }
    let length = length.unwrap_or(data.len() - offset);

    let cursor = Cursor::new(&data);
    let mut window = cursor.slice(offset, length)?;
    let bytes = window.read_bytes(length)?;

    if json {
        let report = InspectReport {
            input: input.to_string(),
            file_size: data.len(),
            offset,
            length,
            hex: hex::encode(bytes),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (row, chunk) in bytes.chunks(16).enumerate() {
        let addr = format!("{:08x}", offset + row * 16);
        let mut hex_col = String::with_capacity(16 * 3);
        for (i, b) in chunk.iter().enumerate() {
            if i == 8 {
                hex_col.push(' ');
            }
            hex_col.push_str(&format!("{:02x} ", b));
        }
        let ascii: String = chunk
            .iter()
            .map(|&b| {
                if (0x20..0x7f).contains(&b) {
                    b as char
                } else {
                    '.'
                }
            })
            .collect();
        println!("{}  {:<49} |{}|", addr.cyan(), hex_col.trim_end(), ascii);
    }
    println!("{} byte(s)", length);
    Ok(())
}
