//! Decompress command implementation.

use crate::utils::decompressed_path;
use log::info;
use oxihuff_codec::decompress_payload;
use std::fs;
use std::path::Path;

pub fn cmd_decompress(
    file: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(file)?;
    let payload = decompress_payload(&data)?;

    let header = payload.header;
    if let Some(channels) = header.data_type.channels() {
        info!(
            "restored image samples: {} px wide, {} channel(s)",
            header.aux_width, channels
        );
    }

    let target = output.map_or_else(|| decompressed_path(file), Path::to_path_buf);
    fs::write(&target, &payload.data)?;

    println!(
        "{} -> {} ({} bytes)",
        file.display(),
        target.display(),
        payload.data.len()
    );
    Ok(())
}
