//! OxiHuff CLI
//!
//! Compress and decompress files with the OxiHuff LZ77 + Huffman codec.

mod commands;
mod utils;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{ImageLayout, cmd_compress, cmd_decompress, cmd_info, cmd_test};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oxihuff")]
#[command(author, version, about = "Pure Rust LZ77 + Huffman compressor")]
#[command(long_about = "
OxiHuff compresses files into a compact, self-describing container
(LZ77 matching followed by a per-file Huffman code).

Raw interleaved image samples (gray or RGB) can be delta-filtered before
compression by giving their row width.

Examples:
  oxihuff compress notes.txt
  oxihuff compress -l best a.bin b.bin c.bin
  oxihuff compress --width 640 --channels 3 frame.rgb
  oxihuff decompress notes.txt.oxh
  oxihuff info --json frame.rgb.oxh
  oxihuff test *.oxh
")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress files
    #[command(alias = "c")]
    Compress {
        /// Files to compress
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (single input only; defaults to <FILE>.oxh)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compression level
        #[arg(short = 'l', long, value_enum, default_value = "normal")]
        level: Level,

        /// Treat input as raw image samples with this row width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Samples per pixel for image input (1 = gray, 3 = RGB)
        #[arg(long, default_value_t = 3, requires = "width")]
        channels: u8,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decompress a file
    #[command(alias = "d")]
    Decompress {
        /// Compressed file
        file: PathBuf,

        /// Output file (defaults to the input without .oxh)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show information about a compressed file
    #[command(alias = "i")]
    Info {
        /// Compressed file to inspect
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Test compressed file integrity
    #[command(alias = "t")]
    Test {
        /// Compressed files to test
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum Level {
    /// Fast compression
    Fast,
    /// Normal compression (default)
    #[default]
    Normal,
    /// Best compression
    Best,
}

impl From<Level> for oxihuff_codec::CompressionLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Fast => Self::Fast,
            Level::Normal => Self::Normal,
            Level::Best => Self::Best,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = utils::init_logging(cli.verbose) {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    let result = match cli.command {
        Commands::Compress {
            files,
            output,
            level,
            width,
            channels,
            progress,
        } => {
            let image = width.map(|width| ImageLayout { width, channels });
            cmd_compress(&files, output.as_deref(), level.into(), image, progress)
        }
        Commands::Decompress { file, output } => cmd_decompress(&file, output.as_deref()),
        Commands::Info { file, json } => cmd_info(&file, json),
        Commands::Test { files } => cmd_test(&files, cli.verbose > 0),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
