//! Compress command implementation.

use crate::utils::{compressed_path, create_progress_bar, savings_percent};
use log::info;
use oxihuff_codec::{CompressionLevel, DataType, Packer, compress_image};
use std::fs;
use std::path::{Path, PathBuf};

/// Shape of raw image input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLayout {
    /// Row width in pixels.
    pub width: u32,
    /// Samples per pixel (1 or 3).
    pub channels: u8,
}

pub fn cmd_compress(
    files: &[PathBuf],
    output: Option<&Path>,
    level: CompressionLevel,
    image: Option<ImageLayout>,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if output.is_some() && files.len() > 1 {
        return Err("--output can only be used with a single input file".into());
    }

    let pb = create_progress_bar(files.len() as u64, progress && files.len() > 1);
    let mut packer = Packer::new(level.matcher_config())?;
    let mut total_in = 0usize;
    let mut total_out = 0usize;

    for file in files {
        pb.set_message(file.display().to_string());

        let data = fs::read(file)?;
        let packed = match image {
            Some(layout) => compress_image(&data, layout.width, layout.channels, level)?,
            None => {
                let (packed, stats) = packer.compress_with_stats(&data, DataType::Generic, 0)?;
                info!(
                    "{}: {} tokens ({} literals, {} matches), {} tree leaves",
                    file.display(),
                    stats.tokens,
                    stats.literals,
                    stats.matches,
                    stats.tree_leaves
                );
                packed
            }
        };

        let target = output.map_or_else(|| compressed_path(file), Path::to_path_buf);
        fs::write(&target, &packed)?;

        pb.suspend(|| {
            println!(
                "{} -> {} ({} -> {} bytes, {:.1}% saved)",
                file.display(),
                target.display(),
                data.len(),
                packed.len(),
                savings_percent(data.len(), packed.len())
            );
        });

        total_in += data.len();
        total_out += packed.len();
        pb.inc(1);
    }

    pb.finish_and_clear();

    if files.len() > 1 {
        println!();
        println!(
            "Compressed {} files ({} level): {} -> {} bytes ({:.1}% saved)",
            files.len(),
            level.name(),
            total_in,
            total_out,
            savings_percent(total_in, total_out)
        );
    }

    Ok(())
}
