//! # OxiHuff Codec
//!
//! Pure Rust LZ77 + Huffman compression with a compact, self-describing
//! container.
//!
//! ## Pipeline
//!
//! - **LZ77**: hash-chain matcher over a sliding window (up to 64KB) with
//!   one-step lazy matching
//! - **Alphabet**: literals 0-255, end-of-stream 256, DEFLATE-style length
//!   codes 257-285 and distance codes 300-331, each with raw extra bits
//! - **Huffman**: one tree per message, built from token frequencies with
//!   deterministic tie-breaking and shipped pre-order in the container
//! - **Container**: 9-byte header (data type, width, original length)
//!   followed by the tree and the coded tokens
//!
//! Raw image samples can be passed through a delta filter first; see
//! [`payload::compress_image`]. A plain run-length codec lives in [`rle`].
//!
//! ## Example
//!
//! ```rust
//! use oxihuff_codec::{DataType, MatcherConfig, compress, decompress};
//!
//! let original = b"Hello, World! Hello, World!";
//! let packed = compress(original, DataType::Generic, 0, &MatcherConfig::GENERIC).unwrap();
//!
//! let restored = decompress(&packed).unwrap();
//! assert_eq!(&restored, original);
//! ```
//!
//! ## Compression Levels
//!
//! - `Fast`: 16-candidate chain walks, greedy matching
//! - `Normal`: 128-candidate chain walks, lazy matching (default)
//! - `Best`: 64KB window, 4096-candidate chain walks

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod container;
pub mod filter;
pub mod huffman;
pub mod lz77;
pub mod payload;
pub mod rle;
pub mod tables;

// Re-exports
pub use config::{CompressionLevel, MatcherConfig};
pub use container::{
    CompressionStats, ContainerHeader, DataType, HEADER_SIZE, Packer, Unpacker, compress,
    decompress, read_header,
};
pub use filter::{apply_delta_filter, remove_delta_filter};
pub use huffman::{CodeTable, FrequencyTable, HuffmanTree};
pub use lz77::{Lz77Encoder, Token};
pub use payload::{Payload, compress_bytes, compress_image, decompress_payload};
