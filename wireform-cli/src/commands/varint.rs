use anyhow::{anyhow, Context, Result};
use colored::*;
use tracing::info;
use wireform_core::varint;
use wireform_core::{Cursor, Sink};

/// Varint scheme selector shared by the encode and decode subcommands
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Scheme {
    /// 7-bit groups with a continuation bit
    Grouped,
    /// Unary length prefix followed by payload bytes
    Prefixed,
}

/// Integer width a varint value is framed as
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum WidthArg {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
}

fn parse_u64(text: &str) -> Result<u64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).with_context(|| format!("Invalid hex value: {}", text))
    } else {
        text.parse::<u64>()
            .with_context(|| format!("Invalid value: {}", text))
    }
}

fn parse_i64(text: &str) -> Result<i64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).with_context(|| format!("Invalid hex value: {}", text))
    } else {
        text.parse::<i64>()
            .with_context(|| format!("Invalid value: {}", text))
    }
}

/// Encode a value and print the wire bytes as hex.
pub fn encode(value: &str, scheme: Scheme, width: WidthArg) -> Result<()> {
    let mut buf = Vec::new();
    let mut sink = Sink::new(&mut buf);

    let written = match (scheme, width) {
        (Scheme::Grouped, WidthArg::U8) => {
            varint::write_grouped_u8(&mut sink, parse_u64(value)?.try_into()?)?
        }
        (Scheme::Grouped, WidthArg::U16) => {
            varint::write_grouped_u16(&mut sink, parse_u64(value)?.try_into()?)?
        }
        (Scheme::Grouped, WidthArg::U32) => {
            varint::write_grouped_u32(&mut sink, parse_u64(value)?.try_into()?)?
        }
        (Scheme::Grouped, WidthArg::U64) => varint::write_grouped_u64(&mut sink, parse_u64(value)?)?,
        (Scheme::Grouped, WidthArg::I8) => {
            varint::write_grouped_i8(&mut sink, parse_i64(value)?.try_into()?)?
        }
        (Scheme::Grouped, WidthArg::I16) => {
            varint::write_grouped_i16(&mut sink, parse_i64(value)?.try_into()?)?
        }
        (Scheme::Grouped, WidthArg::I32) => {
            varint::write_grouped_i32(&mut sink, parse_i64(value)?.try_into()?)?
        }
        (Scheme::Grouped, WidthArg::I64) => varint::write_grouped_i64(&mut sink, parse_i64(value)?)?,
        (Scheme::Prefixed, WidthArg::U8) => {
            varint::write_prefixed_u8(&mut sink, parse_u64(value)?.try_into()?)?
        }
        (Scheme::Prefixed, WidthArg::U16) => {
            varint::write_prefixed_u16(&mut sink, parse_u64(value)?.try_into()?)?
        }
        (Scheme::Prefixed, WidthArg::U32) => {
            varint::write_prefixed_u32(&mut sink, parse_u64(value)?.try_into()?)?
        }
        (Scheme::Prefixed, WidthArg::U64) => {
            varint::write_prefixed_u64(&mut sink, parse_u64(value)?)?
        }
        (Scheme::Prefixed, WidthArg::I8) => {
            varint::write_prefixed_i8(&mut sink, parse_i64(value)?.try_into()?)?
        }
        (Scheme::Prefixed, WidthArg::I16) => {
            varint::write_prefixed_i16(&mut sink, parse_i64(value)?.try_into()?)?
        }
        (Scheme::Prefixed, WidthArg::I32) => {
            varint::write_prefixed_i32(&mut sink, parse_i64(value)?.try_into()?)?
        }
        (Scheme::Prefixed, WidthArg::I64) => {
            varint::write_prefixed_i64(&mut sink, parse_i64(value)?)?
        }
    };

    info!("Encoded {} as {:?}/{:?}", value, scheme, width);

    println!("{}", hex::encode(&buf).green());
    println!("{} byte(s)", written);
    Ok(())
}

/// Decode hex bytes and print the value plus how many bytes it spanned.
pub fn decode(hex_text: &str, scheme: Scheme) -> Result<()> {
    let cleaned: String = hex_text.chars().filter(|c| !c.is_whitespace()).collect();
    let data = hex::decode(&cleaned).with_context(|| format!("Invalid hex input: {}", hex_text))?;
    if data.is_empty() {
        return Err(anyhow!("Empty input"));
    }

    let mut cursor = Cursor::new(&data);
    let value = match scheme {
        Scheme::Grouped => varint::read_grouped(&mut cursor),
        Scheme::Prefixed => varint::read_prefixed(&mut cursor),
    }
    .with_context(|| "Failed to decode varint")?;

    println!("value:    {}", value.to_string().green());
    println!("hex:      0x{:x}", value);
    println!("consumed: {} of {} byte(s)", cursor.position(), data.len());
    if cursor.bytes_left() > 0 {
        println!(
            "{}",
            format!("trailing: {} unread byte(s)", cursor.bytes_left()).yellow()
        );
    }
    Ok(())
}
