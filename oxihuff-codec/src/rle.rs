//! Byte-oriented run-length coding.
//!
//! A standalone codec kept beside the LZ77 pipeline for comparison runs.
//! Each run of identical bytes becomes a `[count][byte]` pair, with
//! `count` in `1..=255`; longer runs are split across several pairs.
//! There is no header, so the decoder only checks that the input holds
//! whole pairs.

use oxihuff_core::error::{OxiHuffError, Result};

/// Longest run a single pair can carry.
pub const MAX_RUN: usize = u8::MAX as usize;

/// Encode `data` as `[count][byte]` pairs.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut output = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let byte = data[i];
        let run = data[i..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == byte)
            .count();
        output.push(run as u8);
        output.push(byte);
        i += run;
    }
    output
}

/// Expand `[count][byte]` pairs.
///
/// A trailing count without its byte is [`OxiHuffError::EndOfStream`].
/// Zero counts are accepted and expand to nothing.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() % 2 != 0 {
        return Err(OxiHuffError::end_of_stream(data.len() as u64 * 8));
    }

    let total: usize = data.chunks_exact(2).map(|pair| pair[0] as usize).sum();
    let mut output = Vec::with_capacity(total);
    for pair in data.chunks_exact(2) {
        output.extend(std::iter::repeat_n(pair[1], pair[0] as usize));
    }
    Ok(output)
}
