//! Container framing.
//!
//! A compressed message is a fixed 9-byte header followed by one bitstream
//! holding the serialized code tree and the Huffman-coded tokens:
//!
//! ```text
//! [1 byte]  data type
//! [4 bytes] auxiliary width (little-endian; image row width, 0 otherwise)
//! [4 bytes] original length (little-endian)
//! [bits]    code tree, pre-order
//! [bits]    token codes with their extra bits, padded to a byte
//! ```
//!
//! The original length is checked against the end-of-stream symbol during
//! decoding, so truncated or padded payloads are reported rather than
//! silently accepted.

use crate::config::MatcherConfig;
use crate::huffman::{FrequencyTable, HuffmanTree};
use crate::lz77::Lz77Encoder;
use crate::tables::{
    END_OF_STREAM, SymbolClass, classify, code_to_distance_base, code_to_length_base,
};
use log::debug;
use oxihuff_core::error::{OxiHuffError, Result};
use oxihuff_core::{BitReader, BitWriter};
use std::io::{self, Read, Write};

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 9;

/// Upper bound on the output buffer reserved up front from an untrusted header.
const MAX_PREALLOC: usize = 1 << 24;

/// Kind of payload stored in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// Arbitrary bytes.
    Generic = 0,
    /// Delta-filtered interleaved RGB samples.
    FilteredRgb = 1,
    /// Delta-filtered single-channel samples.
    FilteredGray = 2,
}

impl DataType {
    /// Parse the header byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Generic),
            1 => Some(Self::FilteredRgb),
            2 => Some(Self::FilteredGray),
            _ => None,
        }
    }

    /// Filtered data type for an image with `channels` samples per pixel.
    pub fn for_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(Self::FilteredGray),
            3 => Some(Self::FilteredRgb),
            _ => None,
        }
    }

    /// Samples per pixel, or `None` for unfiltered data.
    pub fn channels(self) -> Option<u8> {
        match self {
            Self::Generic => None,
            Self::FilteredRgb => Some(3),
            Self::FilteredGray => Some(1),
        }
    }

    /// Whether the payload went through the delta filter.
    pub fn is_filtered(self) -> bool {
        self != Self::Generic
    }

    /// Short name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::FilteredRgb => "filtered-rgb",
            Self::FilteredGray => "filtered-gray",
        }
    }
}

/// The fixed container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Payload kind.
    pub data_type: DataType,
    /// Image row width in pixels; 0 for generic data.
    pub aux_width: u32,
    /// Length of the decoded payload in bytes.
    pub original_length: u32,
}

impl ContainerHeader {
    /// Header for generic data.
    pub fn generic(original_length: u32) -> Self {
        Self {
            data_type: DataType::Generic,
            aux_width: 0,
            original_length,
        }
    }

    /// Check that the width agrees with the data type.
    pub fn validate(&self) -> Result<()> {
        match (self.data_type.is_filtered(), self.aux_width) {
            (false, 0) => Ok(()),
            (false, width) => Err(OxiHuffError::invalid_header(format!(
                "generic data with non-zero width {}",
                width
            ))),
            (true, 0) => Err(OxiHuffError::invalid_header(format!(
                "{} data with zero width",
                self.data_type.name()
            ))),
            (true, _) => Ok(()),
        }
    }

    /// Encode the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0] = self.data_type as u8;
        bytes[1..5].copy_from_slice(&self.aux_width.to_le_bytes());
        bytes[5..9].copy_from_slice(&self.original_length.to_le_bytes());
        bytes
    }

    /// Write the header.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Read and validate a header.
    ///
    /// A source shorter than [`HEADER_SIZE`] is
    /// [`OxiHuffError::EndOfStream`]; an unknown data type or a width that
    /// disagrees with it is [`OxiHuffError::InvalidHeader`].
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        let mut filled = 0;
        while filled < HEADER_SIZE {
            match reader.read(&mut bytes[filled..]) {
                Ok(0) => return Err(OxiHuffError::end_of_stream(filled as u64 * 8)),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let data_type = DataType::from_u8(bytes[0]).ok_or_else(|| {
            OxiHuffError::invalid_header(format!("unknown data type {}", bytes[0]))
        })?;
        let header = Self {
            data_type,
            aux_width: u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]),
            original_length: u32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]),
        };
        header.validate()?;
        Ok(header)
    }
}

/// Figures collected while packing one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressionStats {
    /// Input size in bytes.
    pub input_len: usize,
    /// Tokens emitted, end-of-stream included.
    pub tokens: usize,
    /// Literal tokens.
    pub literals: usize,
    /// Back-references (each one is a length and a distance token).
    pub matches: usize,
    /// Leaves in the code tree.
    pub tree_leaves: usize,
    /// Bits used by the serialized tree.
    pub tree_bits: u64,
    /// Bits used by the coded tokens, before padding.
    pub payload_bits: u64,
    /// Container size in bytes.
    pub compressed_len: usize,
}

impl CompressionStats {
    /// Compressed size as a fraction of the input size.
    pub fn ratio(&self) -> f64 {
        if self.input_len == 0 {
            return 0.0;
        }
        self.compressed_len as f64 / self.input_len as f64
    }
}

/// Compressor producing containers.
#[derive(Debug)]
pub struct Packer {
    encoder: Lz77Encoder,
}

impl Packer {
    /// Create a packer with the given matcher configuration.
    pub fn new(config: MatcherConfig) -> Result<Self> {
        Ok(Self {
            encoder: Lz77Encoder::new(config)?,
        })
    }

    /// Compress `data` into a container.
    pub fn compress(&mut self, data: &[u8], data_type: DataType, aux_width: u32) -> Result<Vec<u8>> {
        self.compress_with_stats(data, data_type, aux_width)
            .map(|(packed, _)| packed)
    }

    /// Compress `data` into a container and report what went into it.
    pub fn compress_with_stats(
        &mut self,
        data: &[u8],
        data_type: DataType,
        aux_width: u32,
    ) -> Result<(Vec<u8>, CompressionStats)> {
        let original_length =
            u32::try_from(data.len()).map_err(|_| OxiHuffError::input_too_large(data.len()))?;
        let header = ContainerHeader {
            data_type,
            aux_width,
            original_length,
        };
        header.validate()?;

        let tokens = self.encoder.encode(data);
        let tree = HuffmanTree::build(&FrequencyTable::from_tokens(&tokens))?;
        let codes = tree.generate_codes()?;

        let mut stats = CompressionStats {
            input_len: data.len(),
            tokens: tokens.len(),
            tree_leaves: tree.leaf_count(),
            ..CompressionStats::default()
        };
        for token in &tokens {
            match token.class() {
                SymbolClass::Literal(_) => stats.literals += 1,
                SymbolClass::Length => stats.matches += 1,
                _ => {}
            }
        }

        let mut output = Vec::with_capacity(HEADER_SIZE + data.len() / 2 + 64);
        header.write_to(&mut output)?;

        let mut writer = BitWriter::new(output);
        tree.serialize(&mut writer)?;
        stats.tree_bits = writer.bits_written();
        for token in &tokens {
            codes.write_token(token, &mut writer)?;
        }
        stats.payload_bits = writer.bits_written() - stats.tree_bits;

        let output = writer.finish()?;
        stats.compressed_len = output.len();

        debug!(
            "packed {} bytes -> {} bytes ({} tokens, {} leaves, {} tree bits, {} payload bits)",
            stats.input_len,
            stats.compressed_len,
            stats.tokens,
            stats.tree_leaves,
            stats.tree_bits,
            stats.payload_bits
        );

        Ok((output, stats))
    }
}

impl Default for Packer {
    fn default() -> Self {
        Self {
            encoder: Lz77Encoder::default(),
        }
    }
}

/// Decompressor for containers.
///
/// A successful [`unpack`](Self::unpack) hands the decoded buffer to the
/// caller and leaves the internal one empty. After a failure the bytes
/// decoded before it stay available through [`output`](Self::output); they
/// are never returned as a result.
#[derive(Debug, Default)]
pub struct Unpacker {
    output: Vec<u8>,
    header: Option<ContainerHeader>,
}

impl Unpacker {
    /// Create a new unpacker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Header of the last container read, if it got that far.
    pub fn header(&self) -> Option<&ContainerHeader> {
        self.header.as_ref()
    }

    /// Reset state for a new message.
    pub fn reset(&mut self) {
        self.output.clear();
        self.header = None;
    }

    /// Decompress a container held in memory.
    pub fn unpack(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        self.unpack_reader(data)
    }

    /// Decompress a container from a reader.
    pub fn unpack_reader<R: Read>(&mut self, mut reader: R) -> Result<Vec<u8>> {
        self.reset();

        let header = ContainerHeader::read_from(&mut reader)?;
        self.header = Some(header);
        let expected = header.original_length as usize;
        self.output.reserve(expected.min(MAX_PREALLOC));

        let mut bits = BitReader::new(reader);
        let tree = HuffmanTree::deserialize(&mut bits)?;

        while self.output.len() < expected {
            let position = self.output.len();
            let symbol = tree.decode_symbol(&mut bits)?;

            match classify(symbol) {
                SymbolClass::Literal(byte) => self.output.push(byte),
                SymbolClass::EndOfStream => {
                    return Err(OxiHuffError::length_mismatch(expected, position));
                }
                SymbolClass::Length => {
                    let (base, extra) = code_to_length_base(symbol)
                        .ok_or_else(|| OxiHuffError::unsupported_symbol(symbol, position))?;
                    let length = base as usize + bits.read_bits(extra)? as usize;

                    let distance_symbol = tree.decode_symbol(&mut bits)?;
                    let (base, extra) = code_to_distance_base(distance_symbol)
                        .ok_or_else(|| OxiHuffError::synchronization(distance_symbol, position))?;
                    let distance = base as usize + bits.read_bits(extra)? as usize;

                    self.copy_match(length, distance, expected)?;
                }
                SymbolClass::Distance | SymbolClass::Unknown => {
                    return Err(OxiHuffError::unsupported_symbol(symbol, position));
                }
            }
        }

        // Anything but end-of-stream here means the payload holds more than
        // the header declared
        let symbol = tree.decode_symbol(&mut bits)?;
        if symbol != END_OF_STREAM {
            // Only one stray symbol is read, so `actual` is a lower bound
            return Err(OxiHuffError::length_mismatch(expected, expected + 1));
        }

        debug!(
            "unpacked {} bits -> {} bytes ({})",
            bits.bits_read(),
            self.output.len(),
            header.data_type.name()
        );

        Ok(std::mem::take(&mut self.output))
    }

    /// Append `length` bytes copied from `distance` bytes back.
    ///
    /// The regions may overlap, so the copy goes one byte at a time.
    fn copy_match(&mut self, length: usize, distance: usize, expected: usize) -> Result<()> {
        let position = self.output.len();
        if distance > position {
            return Err(OxiHuffError::invalid_back_reference(distance, position));
        }
        if position + length > expected {
            return Err(OxiHuffError::length_mismatch(expected, position + length));
        }

        let start = position - distance;
        for i in 0..length {
            let byte = self.output[start + i];
            self.output.push(byte);
        }
        Ok(())
    }

    /// Bytes decoded by the last call that failed; empty after a success.
    pub fn output(&self) -> &[u8] {
        &self.output
    }
}

/// Compress `data` into a container.
pub fn compress(
    data: &[u8],
    data_type: DataType,
    aux_width: u32,
    config: &MatcherConfig,
) -> Result<Vec<u8>> {
    let mut packer = Packer::new(*config)?;
    packer.compress(data, data_type, aux_width)
}

/// Decompress a container.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut unpacker = Unpacker::new();
    unpacker.unpack(data)
}

/// Parse only the fixed header of a container.
pub fn read_header(data: &[u8]) -> Result<ContainerHeader> {
    let mut reader = data;
    ContainerHeader::read_from(&mut reader)
}
