//! Huffman coding over the combined token alphabet.
//!
//! The code tree is built bottom-up from token frequencies with a min-heap
//! keyed by `(frequency, code)`, so ties always resolve the same way and the
//! encoder and decoder never disagree. The tree itself travels in the
//! container, serialized pre-order:
//!
//! - internal node: bit `0`, then the left subtree, then the right subtree
//! - leaf: bit `1`, then the 9-bit symbol code
//!
//! Codes are read off the tree with `0` for every left edge and `1` for
//! every right edge; decoding walks the same tree one bit at a time.

use crate::lz77::Token;
use crate::tables::{ALPHABET_SIZE, END_OF_STREAM, is_valid_code};
use oxihuff_core::BitReader;
use oxihuff_core::BitWriter;
use oxihuff_core::bitstream::MAX_BITS_PER_CALL;
use oxihuff_core::error::{OxiHuffError, Result};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::io::{Read, Write};

/// Width of a serialized leaf code; covers every symbol up to 511.
pub const LEAF_CODE_BITS: u8 = 9;

/// A node of the code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A leaf carrying one symbol.
    Leaf(u16),
    /// An internal node owning exactly two children (left = `0`, right = `1`).
    Internal(Box<Node>, Box<Node>),
}

/// Occurrence counts over the combined alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u64>,
}

impl FrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            counts: vec![0; ALPHABET_SIZE],
        }
    }

    /// Count the codes of a token stream.
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut table = Self::new();
        for token in tokens {
            table.add(token.code);
        }
        table
    }

    /// Add a symbol occurrence.
    pub fn add(&mut self, symbol: u16) {
        self.add_count(symbol, 1);
    }

    /// Add multiple occurrences of a symbol.
    pub fn add_count(&mut self, symbol: u16, count: u64) {
        if let Some(slot) = self.counts.get_mut(symbol as usize) {
            *slot += count;
        }
    }

    /// Count for `symbol`.
    pub fn get(&self, symbol: u16) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// Symbols with a non-zero count, in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u16, count))
    }

    /// Number of distinct symbols seen.
    pub fn distinct(&self) -> usize {
        self.iter().count()
    }

    /// Whether no symbol has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A prefix code: the low `len` bits of `bits`, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    /// Code bits, right-aligned.
    pub bits: u64,
    /// Code length in bits.
    pub len: u8,
}

/// Symbol → code mapping produced from a tree, used by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Code assigned to `symbol`, if the symbol is in the tree.
    pub fn get(&self, symbol: u16) -> Option<Code> {
        self.codes.get(symbol as usize).copied().flatten()
    }

    /// Write the code for `token` followed by its extra bits.
    pub fn write_token<W: Write>(&self, token: &Token, writer: &mut BitWriter<W>) -> Result<()> {
        let code = self
            .get(token.code)
            .ok_or_else(|| OxiHuffError::unsupported_symbol(token.code, 0))?;
        writer.write_bits(code.bits, code.len)?;
        writer.write_bits(token.extra_value as u64, token.extra_bits)
    }
}

/// Priority queue entry. Ordered so that `BinaryHeap` (a max-heap) pops the
/// smallest `(freq, key)` first.
#[derive(Debug)]
struct HeapEntry {
    freq: u64,
    /// Leaf: its symbol. Internal: the smallest symbol below it.
    key: u16,
    node: Node,
}

impl HeapEntry {
    fn merge(left: HeapEntry, right: HeapEntry) -> HeapEntry {
        HeapEntry {
            freq: left.freq + right.freq,
            key: left.key.min(right.key),
            node: Node::Internal(Box::new(left.node), Box::new(right.node)),
        }
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.key == other.key
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .freq
            .cmp(&self.freq)
            .then_with(|| other.key.cmp(&self.key))
    }
}

/// A Huffman code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Build a tree from symbol frequencies.
    ///
    /// A table with a single symbol yields a one-leaf tree whose only code is
    /// empty. An empty table is rejected.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        let mut heap: BinaryHeap<HeapEntry> = frequencies
            .iter()
            .map(|(symbol, freq)| HeapEntry {
                freq,
                key: symbol,
                node: Node::Leaf(symbol),
            })
            .collect();

        loop {
            let Some(left) = heap.pop() else {
                return Err(OxiHuffError::invalid_config(
                    "cannot build a Huffman tree from an empty frequency table",
                ));
            };
            let Some(right) = heap.pop() else {
                return Ok(Self { root: left.node });
            };
            heap.push(HeapEntry::merge(left, right));
        }
    }

    /// Wrap an existing root node.
    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Assign codes: `0` for each left edge, `1` for each right edge.
    pub fn generate_codes(&self) -> Result<CodeTable> {
        fn walk(node: &Node, code: Code, codes: &mut [Option<Code>]) -> Result<()> {
            match node {
                Node::Leaf(symbol) => {
                    if let Some(slot) = codes.get_mut(*symbol as usize) {
                        *slot = Some(code);
                    }
                    Ok(())
                }
                Node::Internal(left, right) => {
                    if code.len >= MAX_BITS_PER_CALL {
                        return Err(OxiHuffError::invalid_config(format!(
                            "Huffman code deeper than {} bits",
                            MAX_BITS_PER_CALL
                        )));
                    }
                    let len = code.len + 1;
                    walk(left, Code { bits: code.bits << 1, len }, codes)?;
                    walk(
                        right,
                        Code {
                            bits: (code.bits << 1) | 1,
                            len,
                        },
                        codes,
                    )
                }
            }
        }

        let mut codes = vec![None; ALPHABET_SIZE];
        walk(&self.root, Code { bits: 0, len: 0 }, &mut codes)?;
        Ok(CodeTable { codes })
    }

    /// `(symbol, depth)` for every leaf, in pre-order.
    pub fn leaf_depths(&self) -> Vec<(u16, usize)> {
        fn walk(node: &Node, depth: usize, out: &mut Vec<(u16, usize)>) {
            match node {
                Node::Leaf(symbol) => out.push((*symbol, depth)),
                Node::Internal(left, right) => {
                    walk(left, depth + 1, out);
                    walk(right, depth + 1, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.root, 0, &mut out);
        out
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaf_depths().len()
    }

    /// Write the tree in pre-order.
    pub fn serialize<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        fn write_node<W: Write>(node: &Node, writer: &mut BitWriter<W>) -> Result<()> {
            match node {
                Node::Leaf(symbol) => {
                    writer.write_bit(true)?;
                    writer.write_bits(*symbol as u64, LEAF_CODE_BITS)
                }
                Node::Internal(left, right) => {
                    writer.write_bit(false)?;
                    write_node(left, writer)?;
                    write_node(right, writer)
                }
            }
        }

        write_node(&self.root, writer)
    }

    /// Read a tree written by [`serialize`](Self::serialize).
    ///
    /// Running out of input, unknown or repeated leaf symbols, and nesting
    /// deeper than any valid tree can reach are all reported as
    /// [`OxiHuffError::MalformedTree`].
    pub fn deserialize<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        fn truncated(err: OxiHuffError) -> OxiHuffError {
            match err {
                OxiHuffError::EndOfStream { bit_position } => {
                    OxiHuffError::malformed_tree(bit_position, "stream ended inside the tree")
                }
                other => other,
            }
        }

        fn read_node<R: Read>(
            reader: &mut BitReader<R>,
            depth: usize,
            seen: &mut [bool],
        ) -> Result<Node> {
            // A tree over N symbols is at most N - 1 levels deep
            if depth >= ALPHABET_SIZE {
                return Err(OxiHuffError::malformed_tree(
                    reader.bits_read(),
                    format!("tree deeper than {} levels", ALPHABET_SIZE - 1),
                ));
            }

            if reader.read_bit().map_err(truncated)? {
                let position = reader.bits_read();
                let symbol = reader.read_bits(LEAF_CODE_BITS).map_err(truncated)? as u16;
                if !is_valid_code(symbol) {
                    return Err(OxiHuffError::malformed_tree(
                        position,
                        format!("leaf symbol {} is not in the alphabet", symbol),
                    ));
                }
                let slot = &mut seen[symbol as usize];
                if *slot {
                    return Err(OxiHuffError::malformed_tree(
                        position,
                        format!("leaf symbol {} appears twice", symbol),
                    ));
                }
                *slot = true;
                Ok(Node::Leaf(symbol))
            } else {
                let left = read_node(reader, depth + 1, seen)?;
                let right = read_node(reader, depth + 1, seen)?;
                Ok(Node::Internal(Box::new(left), Box::new(right)))
            }
        }

        let mut seen = vec![false; ALPHABET_SIZE];
        let root = read_node(reader, 0, &mut seen)?;
        if !seen[END_OF_STREAM as usize] {
            return Err(OxiHuffError::malformed_tree(
                reader.bits_read(),
                "tree has no end-of-stream leaf",
            ));
        }
        Ok(Self { root })
    }

    /// Decode one symbol by walking from the root.
    ///
    /// A one-leaf tree returns its symbol without consuming input. Running
    /// out of input before the first bit is [`OxiHuffError::EndOfStream`];
    /// running out in the middle of a code is [`OxiHuffError::MalformedTree`].
    #[inline]
    pub fn decode_symbol<R: Read>(&self, reader: &mut BitReader<R>) -> Result<u16> {
        let mut node = &self.root;
        let mut depth = 0usize;

        loop {
            match node {
                Node::Leaf(symbol) => return Ok(*symbol),
                Node::Internal(left, right) => {
                    let bit = match reader.read_bit() {
                        Ok(bit) => bit,
                        Err(OxiHuffError::EndOfStream { bit_position }) if depth > 0 => {
                            return Err(OxiHuffError::malformed_tree(
                                bit_position,
                                "stream ended inside a code",
                            ));
                        }
                        Err(e) => return Err(e),
                    };
                    node = if bit { right } else { left };
                    depth += 1;
                }
            }
        }
    }
}
