//! Delta filter for raw image samples.
//!
//! Each sample is replaced by its difference from the average of its left
//! neighbour (same channel, one pixel back) and the sample directly above.
//! Neighbours outside the image count as 0. Smooth images turn into long
//! runs of small residuals, which the matcher and the Huffman coder handle
//! much better than the raw samples.
//!
//! Samples are row-major and interleaved. The buffer does not need to hold
//! a whole number of rows.

use oxihuff_core::error::{OxiHuffError, Result};

/// Check the filter parameters and return the row size in bytes.
fn row_size(width: u32, channels: u8) -> Result<usize> {
    if width == 0 {
        return Err(OxiHuffError::invalid_config("image width must be non-zero"));
    }
    if channels != 1 && channels != 3 {
        return Err(OxiHuffError::invalid_config(format!(
            "unsupported channel count {} (expected 1 or 3)",
            channels
        )));
    }
    (width as usize)
        .checked_mul(channels as usize)
        .ok_or_else(|| OxiHuffError::invalid_config("image row too large"))
}

/// Average of the left and upper neighbours of sample `i`.
#[inline]
fn predict(data: &[u8], i: usize, row_size: usize, bpp: usize) -> u8 {
    let left = if i % row_size >= bpp { data[i - bpp] as u16 } else { 0 };
    let up = if i >= row_size { data[i - row_size] as u16 } else { 0 };
    ((left + up) / 2) as u8
}

/// Replace each sample with its residual against the neighbour average.
pub fn apply_delta_filter(data: &[u8], width: u32, channels: u8) -> Result<Vec<u8>> {
    let row_size = row_size(width, channels)?;
    let bpp = channels as usize;

    Ok(data
        .iter()
        .enumerate()
        .map(|(i, &sample)| sample.wrapping_sub(predict(data, i, row_size, bpp)))
        .collect())
}

/// Undo [`apply_delta_filter`].
///
/// Predictions are taken from samples that have already been restored, so
/// the buffer is rebuilt front to back.
pub fn remove_delta_filter(data: &[u8], width: u32, channels: u8) -> Result<Vec<u8>> {
    let row_size = row_size(width, channels)?;
    let bpp = channels as usize;

    let mut output = Vec::with_capacity(data.len());
    for (i, &residual) in data.iter().enumerate() {
        let prediction = predict(&output, i, row_size, bpp);
        output.push(residual.wrapping_add(prediction));
    }
    Ok(output)
}
