//! Payload helpers tying the delta filter to the container.

use crate::config::CompressionLevel;
use crate::container::{ContainerHeader, DataType, Unpacker, compress};
use crate::filter::{apply_delta_filter, remove_delta_filter};
use log::debug;
use oxihuff_core::error::{OxiHuffError, Result};

/// A decompressed payload together with the header it came with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Decoded bytes, with any delta filter already removed.
    pub data: Vec<u8>,
    /// Header of the container.
    pub header: ContainerHeader,
}

/// Compress generic bytes.
pub fn compress_bytes(data: &[u8], level: CompressionLevel) -> Result<Vec<u8>> {
    compress(data, DataType::Generic, 0, &level.matcher_config())
}

/// Filter and compress raw interleaved image samples.
///
/// `channels` must be 1 (gray) or 3 (RGB); `width` is the row width in
/// pixels. The last row may be incomplete.
pub fn compress_image(
    samples: &[u8],
    width: u32,
    channels: u8,
    level: CompressionLevel,
) -> Result<Vec<u8>> {
    let data_type = DataType::for_channels(channels).ok_or_else(|| {
        OxiHuffError::invalid_config(format!(
            "unsupported channel count {} (expected 1 or 3)",
            channels
        ))
    })?;
    let filtered = apply_delta_filter(samples, width, channels)?;
    debug!(
        "filtered {} samples ({} px wide, {} channel(s))",
        samples.len(),
        width,
        channels
    );
    compress(&filtered, data_type, width, &level.image_config())
}

/// Decompress a container and undo the delta filter if its header asks for it.
pub fn decompress_payload(bytes: &[u8]) -> Result<Payload> {
    let mut unpacker = Unpacker::new();
    let data = unpacker.unpack(bytes)?;
    let header = *unpacker
        .header()
        .ok_or_else(|| OxiHuffError::invalid_header("container header missing"))?;

    let data = match header.data_type.channels() {
        Some(channels) => remove_delta_filter(&data, header.aux_width, channels)?,
        None => data,
    };

    Ok(Payload { data, header })
}
