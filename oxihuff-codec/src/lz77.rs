//! LZ77 matching.
//!
//! This module turns raw bytes into the token stream consumed by the
//! Huffman coder. Repeated sequences are replaced with back-references
//! (length, distance pairs) into a bounded window of preceding input.
//!
//! # Algorithm
//!
//! A hash of the 3 bytes at each position indexes the most recent position
//! with the same hash; a `prev` chain (indexed modulo the window size) links
//! each position to the previous one with that hash. For each position the
//! matcher walks the chain, newest first, for at most `max_chain` candidates
//! and keeps the longest verified match. With lazy matching enabled it also
//! looks one byte ahead and emits a literal instead when the next position
//! offers a better match.

use crate::config::MatcherConfig;
use crate::tables::{END_OF_STREAM, SymbolClass, classify, distance_to_code, length_to_code};
use log::{debug, trace};
use oxihuff_core::error::Result;

/// Size of the hash table (power of 2).
const HASH_SIZE: usize = 32768;

/// Hash mask.
const HASH_MASK: usize = HASH_SIZE - 1;

/// Number of bytes hashed per position.
const HASH_PREFIX: usize = 3;

/// Empty slot marker in `head` and `prev`.
const NO_POS: usize = usize::MAX;

/// A same-length match one byte later wins if its distance is below
/// `current_distance / LAZY_DISTANCE_RATIO`.
pub const LAZY_DISTANCE_RATIO: usize = 2;

/// A token produced by the matcher.
///
/// `code` is a symbol of the combined alphabet (see [`crate::tables`]);
/// `extra_bits`/`extra_value` carry the remainder of a length or distance
/// that the code alone does not capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// Symbol of the combined alphabet.
    pub code: u16,
    /// Number of raw bits following the code (0-14).
    pub extra_bits: u8,
    /// Value of the raw bits.
    pub extra_value: u32,
}

impl Token {
    /// The end-of-stream token.
    pub const END_OF_STREAM: Self = Self {
        code: END_OF_STREAM,
        extra_bits: 0,
        extra_value: 0,
    };

    /// A literal byte.
    pub fn literal(byte: u8) -> Self {
        Self {
            code: byte as u16,
            extra_bits: 0,
            extra_value: 0,
        }
    }

    /// The length half of a back-reference (3-258).
    pub fn length(length: u16) -> Self {
        let (code, extra_bits, extra_value) = length_to_code(length);
        Self {
            code,
            extra_bits,
            extra_value: extra_value as u32,
        }
    }

    /// The distance half of a back-reference (1-65536).
    pub fn distance(distance: u32) -> Self {
        let (code, extra_bits, extra_value) = distance_to_code(distance);
        Self {
            code,
            extra_bits,
            extra_value,
        }
    }

    /// What kind of symbol this token carries.
    pub fn class(&self) -> SymbolClass {
        classify(self.code)
    }
}

/// A verified match candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
    length: usize,
    distance: usize,
}

impl Match {
    /// Whether `next` (found one byte later) should win over `self`.
    fn loses_to(self, next: Match) -> bool {
        next.length > self.length
            || (next.length == self.length
                && next.distance < self.distance / LAZY_DISTANCE_RATIO)
    }
}

/// LZ77 encoder.
///
/// The hash and chain tables are reset at the start of every
/// [`encode`](Self::encode) call, so one encoder can be reused for
/// independent messages.
#[derive(Debug)]
pub struct Lz77Encoder {
    /// Matcher parameters.
    config: MatcherConfig,
    /// Hash table: maps hash -> most recent position.
    head: Vec<usize>,
    /// Hash chain: previous position with same hash, indexed by position mod window.
    prev: Vec<usize>,
}

impl Lz77Encoder {
    /// Create a new LZ77 encoder with the given configuration.
    pub fn new(config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            head: vec![NO_POS; HASH_SIZE],
            prev: vec![NO_POS; config.window_size],
        })
    }

    /// Reset the encoder state.
    fn reset(&mut self) {
        self.head.fill(NO_POS);
        self.prev.fill(NO_POS);
    }

    /// Compute hash for 3 bytes.
    #[inline(always)]
    fn hash(b0: u8, b1: u8, b2: u8) -> usize {
        let h = ((b0 as usize).wrapping_mul(506832829))
            ^ ((b1 as usize).wrapping_mul(2654435761) << 8)
            ^ ((b2 as usize).wrapping_mul(374761393) << 16);
        (h ^ (h >> 15)) & HASH_MASK
    }

    /// Register `pos` in the hash index.
    #[inline]
    fn insert(&mut self, data: &[u8], pos: usize) {
        if pos + HASH_PREFIX > data.len() {
            return;
        }
        let h = Self::hash(data[pos], data[pos + 1], data[pos + 2]);
        self.prev[pos % self.config.window_size] = self.head[h];
        self.head[h] = pos;
    }

    /// Find the longest match for `pos` among already registered positions.
    fn find_match(&self, data: &[u8], pos: usize) -> Option<Match> {
        let max_len = self.config.max_match.min(data.len() - pos);
        if max_len < self.config.min_match {
            return None;
        }

        let h = Self::hash(data[pos], data[pos + 1], data[pos + 2]);
        let mut candidate = self.head[h];
        let mut best = Match {
            length: self.config.min_match - 1,
            distance: 0,
        };
        let mut chain_len = 0;

        while candidate != NO_POS && candidate < pos && chain_len < self.config.max_chain {
            let distance = pos - candidate;
            if distance > self.config.window_size {
                break;
            }

            // Check the byte that would extend the current best first; most
            // candidates fail there.
            if data[candidate + best.length] == data[pos + best.length] {
                let length = data[candidate..]
                    .iter()
                    .zip(&data[pos..pos + max_len])
                    .take_while(|(a, b)| a == b)
                    .count();

                if length > best.length {
                    best = Match { length, distance };
                    if length >= max_len {
                        break;
                    }
                }
            }

            // Slots can be recycled by newer positions; only follow links
            // that keep moving backwards.
            let next = self.prev[candidate % self.config.window_size];
            if next == NO_POS || next >= candidate {
                break;
            }
            candidate = next;
            chain_len += 1;
        }

        trace!(
            "pos {}: {} candidates, best length {} distance {}",
            pos, chain_len, best.length, best.distance
        );

        (best.distance > 0 && best.length >= self.config.min_match).then_some(best)
    }

    /// Compress input data to tokens, terminated by one end-of-stream token.
    pub fn encode(&mut self, input: &[u8]) -> Vec<Token> {
        self.reset();

        let mut tokens = Vec::with_capacity(input.len() / 2 + 1);
        let mut pos = 0;
        // Best match at `pos` when it was already found by the lookahead
        let mut deferred: Option<Match> = None;
        let mut matches = 0usize;

        while pos < input.len() {
            let current = match deferred.take() {
                Some(m) => Some(m),
                None => self.find_match(input, pos),
            };
            self.insert(input, pos);

            let Some(current) = current else {
                tokens.push(Token::literal(input[pos]));
                pos += 1;
                continue;
            };

            if self.config.lazy && pos + 1 < input.len() {
                if let Some(next) = self.find_match(input, pos + 1) {
                    if current.loses_to(next) {
                        tokens.push(Token::literal(input[pos]));
                        deferred = Some(next);
                        pos += 1;
                        continue;
                    }
                }
            }

            tokens.push(Token::length(current.length as u16));
            tokens.push(Token::distance(current.distance as u32));
            matches += 1;

            for skipped in pos + 1..pos + current.length {
                self.insert(input, skipped);
            }
            pos += current.length;
        }

        tokens.push(Token::END_OF_STREAM);

        debug!(
            "LZ77: {} bytes -> {} tokens ({} matches, {} literals)",
            input.len(),
            tokens.len(),
            matches,
            tokens.len() - 1 - 2 * matches
        );

        tokens
    }

    /// Compress all data at once (convenience method).
    pub fn encode_all(input: &[u8], config: MatcherConfig) -> Result<Vec<Token>> {
        let mut encoder = Self::new(config)?;
        Ok(encoder.encode(input))
    }
}

impl Default for Lz77Encoder {
    fn default() -> Self {
        Self {
            config: MatcherConfig::GENERIC,
            head: vec![NO_POS; HASH_SIZE],
            prev: vec![NO_POS; MatcherConfig::GENERIC.window_size],
        }
    }
}
