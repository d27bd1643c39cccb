//! Error types for Wireform operations

use alloc::string::String;

/// Errors that can occur while encoding or decoding wire data
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq)]
pub enum WireError {
    /// The byte source ran out before a complete value could be read
    #[cfg_attr(
        feature = "std",
        error("End of input: needed {expected} more bytes, only {actual} available")
    )]
    EndOfInput {
        /// The number of bytes the read required.
        expected: usize,
        /// The number of bytes actually remaining.
        actual: usize,
    },

    /// A positioning operation was requested that the source cannot honor
    #[cfg_attr(feature = "std", error("Unsupported operation: {0}"))]
    Unsupported(String),

    /// A variable-length integer's framing is internally inconsistent
    #[cfg_attr(feature = "std", error("Malformed encoding: {0}"))]
    MalformedEncoding(String),

    /// The registry has no codec for the requested type, or its declared
    /// field metadata cannot be synthesized into one
    #[cfg_attr(feature = "std", error("Configuration error: {0}"))]
    Configuration(String),

    /// IO error during read/write
    #[cfg_attr(feature = "std", error("IO error: {0}"))]
    Io(String),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for WireError {
    fn from(err: std::io::Error) -> Self {
        WireError::Io(err.to_string())
    }
}
