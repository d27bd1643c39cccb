mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::varint::{Scheme, WidthArg};

#[derive(Parser)]
#[command(name = "wireform")]
#[command(about = "Wireform - Inspect and produce type-driven wire bytes", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an integer with a variable-length scheme
    EncodeVarint {
        /// Value to encode (decimal, or 0x-prefixed hex)
        value: String,

        /// Varint scheme
        #[arg(long, value_enum, default_value = "grouped")]
        scheme: Scheme,

        /// Integer width the value is framed as
        #[arg(long, value_enum, default_value = "u64")]
        width: WidthArg,
    },

    /// Decode a variable-length integer from hex bytes
    DecodeVarint {
        /// Hex byte string, spaces allowed (e.g. "92 34")
        hex: String,

        /// Varint scheme
        #[arg(long, value_enum, default_value = "grouped")]
        scheme: Scheme,
    },

    /// Encode a single scalar value to wire bytes
    Scalar {
        /// Scalar type name (u8..u64, i8..i64, f32, f64, string)
        #[arg(long, short)]
        r#type: String,

        /// Value to encode
        value: String,

        /// Use little-endian byte order
        #[arg(long)]
        little: bool,
    },

    /// Hex dump a file with offsets and an ASCII column
    Inspect {
        /// Input file ("-" for stdin)
        input: String,

        /// Start offset into the file
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Number of bytes to show (defaults to the rest of the file)
        #[arg(long)]
        length: Option<usize>,

        /// Emit a JSON report instead of the table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::EncodeVarint {
            value,
            scheme,
            width,
        } => commands::varint::encode(&value, scheme, width),
        Commands::DecodeVarint { hex, scheme } => commands::varint::decode(&hex, scheme),
        Commands::Scalar {
            r#type,
            value,
            little,
        } => commands::scalar::execute(&r#type, &value, little),
        Commands::Inspect {
            input,
            offset,
            length,
            json,
        } => commands::inspect::execute(&input, offset, length, json),
    }
}
