//! Matcher configuration and compression levels.

use crate::tables::{MAX_DISTANCE, MAX_LENGTH, MIN_LENGTH};
use oxihuff_core::error::{OxiHuffError, Result};

/// Default window size (32KB).
pub const DEFAULT_WINDOW_SIZE: usize = 32768;

/// Largest window the distance alphabet can express (64KB).
pub const MAX_WINDOW_SIZE: usize = MAX_DISTANCE as usize;

/// LZ77 matcher parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// How far back a match may point, in bytes (1-65536).
    pub window_size: usize,
    /// Shortest match worth emitting (3-258).
    pub min_match: usize,
    /// Longest match to emit (`min_match`-258).
    pub max_match: usize,
    /// Maximum number of hash-chain candidates examined per position.
    pub max_chain: usize,
    /// Whether to defer a match by one byte when the next position matches better.
    pub lazy: bool,
}

impl MatcherConfig {
    /// Generic byte payloads.
    ///
    /// - 32KB window
    /// - 3-byte minimum match
    /// - 128-candidate chain walk, lazy matching
    pub const GENERIC: Self = Self {
        window_size: DEFAULT_WINDOW_SIZE,
        min_match: 3,
        max_match: MAX_LENGTH as usize,
        max_chain: 128,
        lazy: true,
    };

    /// Delta-filtered image payloads.
    ///
    /// Short matches in filtered residuals rarely pay for their length and
    /// distance codes, so the minimum match is raised to 6.
    pub const IMAGE: Self = Self {
        min_match: 6,
        ..Self::GENERIC
    };

    /// Quick scan: short chain walks, no lazy matching.
    pub const FAST: Self = Self {
        max_chain: 16,
        lazy: false,
        ..Self::GENERIC
    };

    /// Thorough scan: 64KB window and long chain walks.
    pub const BEST: Self = Self {
        window_size: MAX_WINDOW_SIZE,
        max_chain: 4096,
        ..Self::GENERIC
    };

    /// Create a configuration with the given window and minimum match, and
    /// default chain depth and lazy matching.
    pub fn new(window_size: usize, min_match: usize) -> Self {
        Self {
            window_size,
            min_match,
            ..Self::GENERIC
        }
    }

    /// Same configuration with a different minimum match length.
    pub fn with_min_match(self, min_match: usize) -> Self {
        Self { min_match, ..self }
    }

    /// Check every parameter against the limits of the format.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 || self.window_size > MAX_WINDOW_SIZE {
            return Err(OxiHuffError::invalid_config(format!(
                "window size {} outside 1..={}",
                self.window_size, MAX_WINDOW_SIZE
            )));
        }
        if self.min_match < MIN_LENGTH as usize || self.min_match > MAX_LENGTH as usize {
            return Err(OxiHuffError::invalid_config(format!(
                "minimum match {} outside {}..={}",
                self.min_match, MIN_LENGTH, MAX_LENGTH
            )));
        }
        if self.max_match < self.min_match || self.max_match > MAX_LENGTH as usize {
            return Err(OxiHuffError::invalid_config(format!(
                "maximum match {} outside {}..={}",
                self.max_match, self.min_match, MAX_LENGTH
            )));
        }
        if self.max_chain == 0 {
            return Err(OxiHuffError::invalid_config("chain length must be at least 1"));
        }
        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self::GENERIC
    }
}

/// Compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Fast compression
    Fast,
    /// Normal compression (default)
    #[default]
    Normal,
    /// Best compression
    Best,
}

impl CompressionLevel {
    /// Matcher configuration for generic payloads at this level.
    pub fn matcher_config(self) -> MatcherConfig {
        match self {
            Self::Fast => MatcherConfig::FAST,
            Self::Normal => MatcherConfig::GENERIC,
            Self::Best => MatcherConfig::BEST,
        }
    }

    /// Matcher configuration for filtered image payloads at this level.
    pub fn image_config(self) -> MatcherConfig {
        self.matcher_config()
            .with_min_match(MatcherConfig::IMAGE.min_match)
    }

    /// Level name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Normal => "normal",
            Self::Best => "best",
        }
    }
}
