//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};

/// Extension given to compressed files.
pub const EXTENSION: &str = "oxh";

/// Install the terminal logger on stderr.
///
/// Warnings and errors are always shown; each `-v` adds a level.
pub fn init_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
}

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░ "));
    }
    pb
}

/// Default output path for compressing `input`: `<input>.oxh`.
pub fn compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// Default output path for decompressing `input`: strip `.oxh`, or append
/// `.out` when the input has some other extension.
pub fn decompressed_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext == EXTENSION => input.with_extension(""),
        _ => {
            let mut name = input.as_os_str().to_owned();
            name.push(".out");
            PathBuf::from(name)
        }
    }
}

/// Space saved, in percent of `original`.
pub fn savings_percent(original: usize, compressed: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - compressed as f64 / original as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compressed_path() {
        assert_eq!(
            compressed_path(Path::new("dir/notes.txt")),
            PathBuf::from("dir/notes.txt.oxh")
        );
        assert_eq!(compressed_path(Path::new("raw")), PathBuf::from("raw.oxh"));
    }

    #[test]
    fn test_decompressed_path() {
        assert_eq!(
            decompressed_path(Path::new("dir/notes.txt.oxh")),
            PathBuf::from("dir/notes.txt")
        );
        assert_eq!(
            decompressed_path(Path::new("blob.bin")),
            PathBuf::from("blob.bin.out")
        );
        assert_eq!(decompressed_path(Path::new("blob")), PathBuf::from("blob.out"));
    }

    #[test]
    fn test_savings_percent() {
        assert_eq!(savings_percent(0, 11), 0.0);
        assert!((savings_percent(200, 50) - 75.0).abs() < 1e-9);
        assert!(savings_percent(10, 20) < 0.0);
    }
}
