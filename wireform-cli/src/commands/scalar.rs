use anyhow::{anyhow, Context, Result};
use colored::*;
use tracing::info;
use wireform_core::primitive;
use wireform_core::{Endianness, FieldOptions, Sink};

/// Encode one scalar value and print the wire bytes as hex.
pub fn execute(type_name: &str, value: &str, little: bool) -> Result<()> {
    let options = FieldOptions::default().endianness(if little {
        Endianness::Little
    } else {
        Endianness::Big
    });

    let mut buf = Vec::new();
    let mut sink = Sink::new(&mut buf);

    match type_name {
        "u8" => primitive::write_u8(&mut sink, parse(value)?, &options)?,
        "u16" => primitive::write_u16(&mut sink, parse(value)?, &options)?,
        "u32" => primitive::write_u32(&mut sink, parse(value)?, &options)?,
        "u64" => primitive::write_u64(&mut sink, parse(value)?, &options)?,
        "i8" => primitive::write_i8(&mut sink, parse(value)?, &options)?,
        "i16" => primitive::write_i16(&mut sink, parse(value)?, &options)?,
        "i32" => primitive::write_i32(&mut sink, parse(value)?, &options)?,
        "i64" => primitive::write_i64(&mut sink, parse(value)?, &options)?,
        "f32" => primitive::write_f32(&mut sink, parse(value)?, &options)?,
        "f64" => primitive::write_f64(&mut sink, parse(value)?, &options)?,
        "bool" => primitive::write_bool(&mut sink, parse(value)?, &options)?,
        "string" => primitive::write_string(&mut sink, value, &options)?,
        other => {
            return Err(anyhow!(
                "Unknown scalar type: {} (expected u8..u64, i8..i64, f32, f64, bool, string)",
                other
            ))
        }
    }

    info!("Encoded {} {} in {} bytes", type_name, value, buf.len());

    println!("{}", hex::encode(&buf).green());
    println!("{} byte(s)", buf.len());
    Ok(())
}

fn parse<T: std::str::FromStr>(value: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse::<T>()
        .with_context(|| format!("Invalid value: {}", value))
}
