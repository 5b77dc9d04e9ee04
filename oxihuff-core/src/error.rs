//! Error types for OxiHuff operations.
//!
//! Every failure the bit layer, the codec, or the container can produce is a
//! variant of [`OxiHuffError`]. Decode failures carry enough context (bit
//! position, output position, symbol value) to diagnose a corrupt stream.

use std::io;
use thiserror::Error;

/// The main error type for OxiHuff operations.
#[derive(Debug, Error)]
pub enum OxiHuffError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source ran out before the requested bits or bytes were available.
    #[error("Unexpected end of stream at bit position {bit_position}")]
    EndOfStream {
        /// Number of bits successfully consumed before the stream ended.
        bit_position: u64,
    },

    /// The serialized code tree is invalid, or a symbol descent ran off the stream.
    #[error("Malformed Huffman tree at bit position {bit_position}: {message}")]
    MalformedTree {
        /// Bit position where the problem was detected.
        bit_position: u64,
        /// Description of the problem.
        message: String,
    },

    /// A length code was not followed by a distance code.
    #[error("Synchronization error: expected a distance code, found symbol {symbol} at output position {position}")]
    SynchronizationError {
        /// The symbol that was decoded instead of a distance code.
        symbol: u16,
        /// Output length at the time of the failure.
        position: usize,
    },

    /// A back-reference points before the start of the output.
    #[error("Invalid back-reference: distance {distance} exceeds {position} bytes of output")]
    InvalidBackReference {
        /// The decoded distance.
        distance: usize,
        /// Output length at the time of the failure.
        position: usize,
    },

    /// A decoded symbol is outside every range valid at that point.
    #[error("Unsupported symbol {symbol} at output position {position}")]
    UnsupportedSymbol {
        /// The offending symbol.
        symbol: u16,
        /// Output length at the time of the failure.
        position: usize,
    },

    /// The decoded length disagrees with the length recorded in the header.
    #[error("Length mismatch: header says {expected} bytes, stream produced {actual}")]
    LengthMismatch {
        /// Length recorded in the container header.
        expected: usize,
        /// Length the token stream actually produced. When symbols follow the
        /// last byte only the first is counted, so this is a lower bound.
        actual: usize,
    },

    /// Invalid container header.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Invalid matcher or filter parameters.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// A bit I/O call asked for more bits than the accumulator supports.
    #[error("Invalid bit count: {count} (must be at most 57)")]
    InvalidBitCount {
        /// The requested number of bits.
        count: u8,
    },

    /// The input does not fit the 32-bit length field of the container.
    #[error("Input too large: {size} bytes exceeds the 4 GiB container limit")]
    InputTooLarge {
        /// Size of the rejected input.
        size: usize,
    },
}

/// Result type alias for OxiHuff operations.
pub type Result<T> = std::result::Result<T, OxiHuffError>;

impl OxiHuffError {
    /// Create an end-of-stream error.
    pub fn end_of_stream(bit_position: u64) -> Self {
        Self::EndOfStream { bit_position }
    }

    /// Create a malformed tree error.
    pub fn malformed_tree(bit_position: u64, message: impl Into<String>) -> Self {
        Self::MalformedTree {
            bit_position,
            message: message.into(),
        }
    }

    /// Create a synchronization error.
    pub fn synchronization(symbol: u16, position: usize) -> Self {
        Self::SynchronizationError { symbol, position }
    }

    /// Create an invalid back-reference error.
    pub fn invalid_back_reference(distance: usize, position: usize) -> Self {
        Self::InvalidBackReference { distance, position }
    }

    /// Create an unsupported symbol error.
    pub fn unsupported_symbol(symbol: u16, position: usize) -> Self {
        Self::UnsupportedSymbol { symbol, position }
    }

    /// Create a length mismatch error.
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid bit count error.
    pub fn invalid_bit_count(count: u8) -> Self {
        Self::InvalidBitCount { count }
    }

    /// Create an input too large error.
    pub fn input_too_large(size: usize) -> Self {
        Self::InputTooLarge { size }
    }

    /// Whether this error indicates corrupt compressed data rather than an
    /// I/O or usage problem.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::EndOfStream { .. }
                | Self::MalformedTree { .. }
                | Self::SynchronizationError { .. }
                | Self::InvalidBackReference { .. }
                | Self::UnsupportedSymbol { .. }
                | Self::LengthMismatch { .. }
                | Self::InvalidHeader { .. }
        )
    }
}
