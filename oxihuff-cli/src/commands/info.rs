//! Info command implementation.

use crate::utils::savings_percent;
use oxihuff_codec::{HEADER_SIZE, HuffmanTree, read_header};
use oxihuff_core::BitReader;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// JSON output structure for the info command.
#[derive(Debug, Serialize)]
struct InfoOutput {
    file: String,
    data_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channels: Option<u8>,
    original_size: u32,
    compressed_size: usize,
    savings_percent: f64,
    tree_leaves: usize,
    tree_bits: u64,
}

pub fn cmd_info(file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(file)?;
    let header = read_header(&data)?;

    let mut bits = BitReader::new(&data[HEADER_SIZE..]);
    let tree = HuffmanTree::deserialize(&mut bits)?;

    let channels = header.data_type.channels();
    let output = InfoOutput {
        file: file.display().to_string(),
        data_type: header.data_type.name(),
        width: channels.map(|_| header.aux_width),
        channels,
        original_size: header.original_length,
        compressed_size: data.len(),
        savings_percent: savings_percent(header.original_length as usize, data.len()),
        tree_leaves: tree.leaf_count(),
        tree_bits: bits.bits_read(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("File Information");
    println!("================");
    println!("File: {}", output.file);
    println!("Data type: {}", output.data_type);
    if let (Some(width), Some(channels)) = (output.width, output.channels) {
        println!("Image width: {} px", width);
        println!("Channels: {}", channels);
    }
    println!("Original size: {} bytes", output.original_size);
    println!("Compressed size: {} bytes", output.compressed_size);
    if output.original_size > 0 {
        println!("Space saved: {:.1}%", output.savings_percent);
    }
    println!();
    println!("Huffman tree:");
    println!("  Symbols: {}", output.tree_leaves);
    println!("  Size: {} bits", output.tree_bits);

    Ok(())
}
