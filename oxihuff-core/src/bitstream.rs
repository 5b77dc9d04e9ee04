//! Bit-level I/O operations for the OxiHuff codec.
//!
//! This module provides `BitReader` and `BitWriter` for reading and writing
//! data at the bit level, which is what the serialized code tree and the
//! Huffman-coded token stream are made of.
//!
//! # Bit Ordering
//!
//! OxiHuff uses MSB-first (Most Significant Bit first) ordering: the first
//! bit written lands in bit 7 of the first byte. A final partial byte keeps
//! its bits in the high positions and is padded with zeros in the low ones,
//! so a stream of `n` bits always occupies exactly `ceil(n / 8)` bytes.
//!
//! # Example
//!
//! ```
//! use oxihuff_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! // Writing bits
//! let mut output = Vec::new();
//! {
//!     let mut writer = BitWriter::new(&mut output);
//!     writer.write_bits(0b101, 3).unwrap();  // Write 3 bits
//!     writer.write_bits(0b1100, 4).unwrap(); // Write 4 bits
//!     writer.flush().unwrap();
//! }
//! assert_eq!(output, vec![0b1011_1000]);
//!
//! // Reading bits
//! let mut reader = BitReader::new(Cursor::new(&output));
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! ```

use crate::error::{OxiHuffError, Result};
use std::io::{self, Read, Write};

/// Largest bit count a single `read_bits`/`write_bits` call accepts.
///
/// Up to 7 bits may already be pending, and a refill adds whole bytes, so 57
/// keeps the 64-bit accumulator from ever overflowing.
pub const MAX_BITS_PER_CALL: u8 = 57;

/// Mask selecting the low `count` bits (`count < 64`).
#[inline(always)]
fn low_mask(count: u8) -> u64 {
    (1u64 << count).wrapping_sub(1)
}

/// A bit-level reader that wraps any `Read` implementation.
///
/// Bits are drawn MSB-first; the cache is refilled one byte at a time from
/// the underlying source. Wrap unbuffered sources (files, sockets) in a
/// `BufReader` first.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Underlying reader.
    reader: R,
    /// Bit cache; only the low `bits_in_buffer` bits are valid.
    buffer: u64,
    /// Number of valid bits in buffer.
    bits_in_buffer: u8,
    /// Total bits read (for error reporting).
    total_bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new `BitReader` wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_read: 0,
        }
    }

    /// Get the total number of bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.total_bits_read
    }

    /// Pull one byte from the source.
    fn next_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Err(OxiHuffError::end_of_stream(self.total_bits_read)),
                Ok(_) => return Ok(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read up to 57 bits from the stream.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of bits to read (0-57)
    ///
    /// # Returns
    ///
    /// The bits read as a u64, with the first bit read in the most
    /// significant of the `count` positions.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u64> {
        if count > MAX_BITS_PER_CALL {
            return Err(OxiHuffError::invalid_bit_count(count));
        }
        if count == 0 {
            return Ok(0);
        }

        while self.bits_in_buffer < count {
            let byte = self.next_byte()?;
            self.buffer = (self.buffer << 8) | byte as u64;
            self.bits_in_buffer += 8;
        }

        let shift = self.bits_in_buffer - count;
        let value = (self.buffer >> shift) & low_mask(count);

        self.bits_in_buffer = shift;
        self.buffer &= low_mask(shift);
        self.total_bits_read += count as u64;

        Ok(value)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }
}

/// A bit-level writer that wraps any `Write` implementation.
///
/// `BitWriter` accumulates bits MSB-first and hands complete bytes to the
/// underlying writer as soon as they are available. Call `flush()` (or
/// `finish()`) when done to write the final partial byte.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    /// Underlying writer.
    writer: W,
    /// Pending bits; only the low `bits_in_buffer` bits are valid.
    buffer: u64,
    /// Number of pending bits, always below 8 between calls.
    bits_in_buffer: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new `BitWriter` wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_written: 0,
        }
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.writer)
    }

    /// Get the total number of bits written so far (padding excluded).
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Move every complete byte from the accumulator to the writer.
    #[inline]
    fn drain_bytes(&mut self) -> Result<()> {
        let mut bytes = [0u8; 8];
        let mut n = 0;
        while self.bits_in_buffer >= 8 {
            self.bits_in_buffer -= 8;
            bytes[n] = (self.buffer >> self.bits_in_buffer) as u8;
            n += 1;
        }
        self.buffer &= low_mask(self.bits_in_buffer);

        if n > 0 {
            self.writer.write_all(&bytes[..n])?;
        }
        Ok(())
    }

    /// Write up to 57 bits to the stream.
    ///
    /// # Arguments
    ///
    /// * `value` - The bits to write; only the low `count` bits are used,
    ///   most significant first
    /// * `count` - Number of bits to write (0-57)
    #[inline]
    pub fn write_bits(&mut self, value: u64, count: u8) -> Result<()> {
        if count > MAX_BITS_PER_CALL {
            return Err(OxiHuffError::invalid_bit_count(count));
        }
        if count == 0 {
            return Ok(());
        }

        self.buffer = (self.buffer << count) | (value & low_mask(count));
        self.bits_in_buffer += count;
        self.total_bits_written += count as u64;

        self.drain_bytes()
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(bit as u64, 1)
    }

    /// Flush any remaining bits to the underlying writer.
    ///
    /// A partial final byte keeps its bits in the high positions and is
    /// padded with zeros.
    pub fn flush(&mut self) -> Result<()> {
        if self.bits_in_buffer > 0 {
            let byte = (self.buffer << (8 - self.bits_in_buffer)) as u8;
            self.writer.write_all(&[byte])?;
            self.buffer = 0;
            self.bits_in_buffer = 0;
        }

        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_bitreader_basic() {
        // 0b10110101 = 0xB5
        let data = vec![0xB5];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(1).unwrap(), 1); // MSB first
        assert_eq!(reader.read_bits(1).unwrap(), 0);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.read_bits(1).unwrap(), 0);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.read_bits(1).unwrap(), 0);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.bits_read(), 8);
    }

    #[test]
    fn test_bitreader_multi_byte() {
        let data = vec![0xFF, 0x00];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(4).unwrap(), 0xF);
        assert_eq!(reader.read_bits(8).unwrap(), 0xF0); // Crosses byte boundary
        assert_eq!(reader.read_bits(4).unwrap(), 0x0);
    }

    #[test]
    fn test_bitreader_eof() {
        let mut reader = BitReader::new(Cursor::new(vec![0xAB]));
        assert_eq!(reader.read_bits(6).unwrap(), 0b101010);

        let err = reader.read_bits(3).unwrap_err();
        assert!(matches!(err, OxiHuffError::EndOfStream { bit_position: 6 }));
    }

    #[test]
    fn test_bit_count_limit() {
        let mut reader = BitReader::new(Cursor::new(vec![0u8; 16]));
        assert!(matches!(
            reader.read_bits(58),
            Err(OxiHuffError::InvalidBitCount { count: 58 })
        ));

        let mut output = Vec::new();
        let mut writer = BitWriter::new(&mut output);
        assert!(matches!(
            writer.write_bits(0, 64),
            Err(OxiHuffError::InvalidBitCount { count: 64 })
        ));
    }

    #[test]
    fn test_bitwriter_basic() {
        let mut output = Vec::new();
        {
            let mut writer = BitWriter::new(&mut output);
            // Write 0b10110101 bit by bit
            writer.write_bit(true).unwrap(); // 1
            writer.write_bit(false).unwrap(); // 0
            writer.write_bit(true).unwrap(); // 1
            writer.write_bit(true).unwrap(); // 1
            writer.write_bit(false).unwrap(); // 0
            writer.write_bit(true).unwrap(); // 1
            writer.write_bit(false).unwrap(); // 0
            writer.write_bit(true).unwrap(); // 1
            writer.flush().unwrap();
        }
        assert_eq!(output, vec![0xB5]);
    }

    #[test]
    fn test_bitwriter_multi_bits() {
        let mut output = Vec::new();
        {
            let mut writer = BitWriter::new(&mut output);
            writer.write_bits(0b101, 3).unwrap();
            writer.write_bits(0b11001, 5).unwrap();
            writer.flush().unwrap();
        }
        // 3 bits: 101, 5 bits: 11001 -> 101_11001 = 0xB9
        assert_eq!(output, vec![0xB9]);
    }

    #[test]
    fn test_flush_pads_low_bits() {
        let mut output = Vec::new();
        {
            let mut writer = BitWriter::new(&mut output);
            writer.write_bits(0xABC, 12).unwrap();
            writer.write_bit(true).unwrap();
            writer.flush().unwrap();
            // A second flush must not emit another byte
            writer.flush().unwrap();
            assert_eq!(writer.bits_written(), 13);
        }
        // 1010_1011 1100_1 + 000 padding
        assert_eq!(output, vec![0xAB, 0xC8]);
    }

    #[test]
    fn test_output_length_is_ceil_of_bits() {
        for bits in 0..=40u8 {
            let mut output = Vec::new();
            let mut writer = BitWriter::new(&mut output);
            for _ in 0..bits {
                writer.write_bit(true).unwrap();
            }
            writer.flush().unwrap();
            assert_eq!(output.len(), (bits as usize).div_ceil(8), "bits = {}", bits);
        }
    }

    #[test]
    fn test_roundtrip() {
        let mut output = Vec::new();
        {
            let mut writer = BitWriter::new(&mut output);
            writer.write_bits(0b101, 3).unwrap();
            writer.write_bits(0b1111, 4).unwrap();
            writer.write_bits(0b10, 2).unwrap();
            writer.write_bits(0b110011, 6).unwrap();
            writer.flush().unwrap();
        }

        let mut reader = BitReader::new(Cursor::new(&output));
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(4).unwrap(), 0b1111);
        assert_eq!(reader.read_bits(2).unwrap(), 0b10);
        assert_eq!(reader.read_bits(6).unwrap(), 0b110011);
    }

    #[test]
    fn test_roundtrip_mixed_widths() {
        // Deterministic (value, width) pairs with widths 1..=32
        let mut seed = 0x1234_5678u32;
        let mut pairs = Vec::new();
        for _ in 0..2000 {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            let width = (seed >> 16) as u8 % 32 + 1;
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            let value = seed as u64 & low_mask(width);
            pairs.push((value, width));
        }

        let writer = BitWriter::new(Vec::new());
        let output = pairs
            .iter()
            .try_fold(writer, |mut w, &(value, width)| {
                w.write_bits(value, width).map(|_| w)
            })
            .unwrap()
            .finish()
            .unwrap();

        let total_bits: usize = pairs.iter().map(|&(_, w)| w as usize).sum();
        assert_eq!(output.len(), total_bits.div_ceil(8));

        let mut reader = BitReader::new(Cursor::new(&output));
        for &(value, width) in &pairs {
            assert_eq!(reader.read_bits(width).unwrap(), value);
        }
    }

    #[test]
    fn test_wide_values() {
        let values = [
            (0x1FF_FFFF_FFFF_FFFFu64, 57u8),
            (0x0123_4567_89AB_CDEF & low_mask(57), 57),
            (1, 1),
            (0, 57),
        ];

        let mut writer = BitWriter::new(Vec::new());
        // Misalign first so the wide writes straddle bytes
        writer.write_bits(0b101, 3).unwrap();
        for &(value, width) in &values {
            writer.write_bits(value, width).unwrap();
        }
        let output = writer.finish().unwrap();

        let mut reader = BitReader::new(Cursor::new(output));
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        for &(value, width) in &values {
            assert_eq!(reader.read_bits(width).unwrap(), value);
        }
    }

    #[test]
    fn test_value_is_masked() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0xFFFF_FFFF, 4).unwrap();
        writer.write_bits(0, 4).unwrap();
        assert_eq!(writer.finish().unwrap(), vec![0xF0]);
    }
}
