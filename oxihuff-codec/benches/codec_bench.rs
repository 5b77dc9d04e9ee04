//! Performance benchmarks for oxihuff-codec
//!
//! This benchmark suite evaluates:
//! - Compression speed per level and per data pattern
//! - Decompression speed per data pattern
//! - LZ77 matching and Huffman tree construction in isolation
//! - Delta-filtered image payloads

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxihuff_codec::{
    CompressionLevel, DataType, FrequencyTable, HuffmanTree, Lz77Encoder, MatcherConfig,
    compress, compress_bytes, compress_image, decompress, decompress_payload, rle,
};
use std::hint::black_box;

/// Type alias for pattern generator functions
type PatternGenerator = fn(usize) -> Vec<u8>;

/// Generate test data patterns for benchmarking
mod test_data {
    /// Uniform data - all bytes are the same (best compression)
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    /// Random data - no patterns (worst compression)
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            // Linear congruential generator
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    /// Short repeating pattern
    pub fn repetitive(size: usize) -> Vec<u8> {
        b"WXYZ".iter().copied().cycle().take(size).collect()
    }

    /// Text-like data - realistic scenario
    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"The quick brown fox jumps over the lazy dog. \
                     Pack my box with five dozen liquor jugs. \
                     How vexingly quick daft zebras jump! \
                     Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
        text.iter().copied().cycle().take(size).collect()
    }

    /// Smooth RGB gradient with a little noise
    pub fn rgb_image(width: usize, height: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height * 3);
        let mut seed: u64 = 0x0F0E0D0C0B0A0908;
        for y in 0..height {
            for x in 0..width {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                let noise = ((seed >> 60) & 0x3) as usize;
                data.push((x + noise) as u8);
                data.push((y + noise) as u8);
                data.push(((x + y) / 2) as u8);
            }
        }
        data
    }
}

/// Standard data sizes for benchmarking
mod data_sizes {
    pub const SMALL: usize = 4 * 1024; // 4 KB
    pub const MEDIUM: usize = 64 * 1024; // 64 KB
    pub const LARGE: usize = 1024 * 1024; // 1 MB
}

const PATTERNS: [(&str, PatternGenerator); 4] = [
    ("uniform", test_data::uniform as PatternGenerator),
    ("random", test_data::random as PatternGenerator),
    ("repetitive", test_data::repetitive as PatternGenerator),
    ("text", test_data::text_like as PatternGenerator),
];

/// Benchmark compression across levels
fn bench_compression_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_levels");

    let data = test_data::text_like(data_sizes::MEDIUM);
    for level in [
        CompressionLevel::Fast,
        CompressionLevel::Normal,
        CompressionLevel::Best,
    ] {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(level.name()), &data, |b, data| {
            b.iter(|| {
                let compressed = compress_bytes(black_box(data), level).unwrap();
                black_box(compressed);
            });
        });
    }

    group.finish();
}

/// Benchmark compression speed for different data types
fn bench_compression_data_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_data_types");

    for (name, generator) in PATTERNS {
        let data = generator(data_sizes::MEDIUM);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| {
                let compressed =
                    compress(black_box(data), DataType::Generic, 0, &MatcherConfig::GENERIC)
                        .unwrap();
                black_box(compressed);
            });
        });
    }

    group.finish();
}

/// Benchmark decompression speed for different data types
fn bench_decompression_data_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression_data_types");

    for (name, generator) in PATTERNS {
        let data = generator(data_sizes::MEDIUM);
        let compressed =
            compress(&data, DataType::Generic, 0, &MatcherConfig::GENERIC).unwrap();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &compressed, |b, packed| {
            b.iter(|| {
                let decompressed = decompress(black_box(packed)).unwrap();
                black_box(decompressed);
            });
        });
    }

    group.finish();
}

/// Benchmark the matcher alone over increasing input sizes
fn bench_lz77_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("lz77_sizes");

    let sizes = [
        ("4KB", data_sizes::SMALL),
        ("64KB", data_sizes::MEDIUM),
        ("1MB", data_sizes::LARGE),
    ];

    for (size_name, size) in sizes {
        let data = test_data::text_like(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &data, |b, data| {
            let mut encoder = Lz77Encoder::new(MatcherConfig::GENERIC).unwrap();
            b.iter(|| {
                let tokens = encoder.encode(black_box(data));
                black_box(tokens);
            });
        });
    }

    group.finish();
}

/// Benchmark tree construction from a realistic token distribution
fn bench_huffman_build(c: &mut Criterion) {
    let data = test_data::random(data_sizes::MEDIUM);
    let tokens = Lz77Encoder::encode_all(&data, MatcherConfig::GENERIC).unwrap();
    let frequencies = FrequencyTable::from_tokens(&tokens);

    c.bench_function("huffman_build", |b| {
        b.iter(|| {
            let tree = HuffmanTree::build(black_box(&frequencies)).unwrap();
            let codes = tree.generate_codes().unwrap();
            black_box(codes);
        });
    });
}

/// Benchmark filtered image payloads end to end
fn bench_image_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_roundtrip");

    let (width, height) = (256, 256);
    let samples = test_data::rgb_image(width, height);
    group.throughput(Throughput::Bytes(samples.len() as u64));
    group.bench_function("rgb_256x256", |b| {
        b.iter(|| {
            let packed =
                compress_image(black_box(&samples), width as u32, 3, CompressionLevel::Normal)
                    .unwrap();
            let payload = decompress_payload(&packed).unwrap();
            black_box(payload);
        });
    });

    group.finish();
}

/// Benchmark the run-length codec on the same patterns
fn bench_rle_data_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("rle_data_types");

    for (name, generator) in PATTERNS {
        let data = generator(data_sizes::MEDIUM);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| {
                let encoded = rle::compress(black_box(data));
                black_box(rle::decompress(&encoded).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compression_levels,
    bench_compression_data_types,
    bench_decompression_data_types,
    bench_lz77_sizes,
    bench_huffman_build,
    bench_image_roundtrip,
    bench_rle_data_types,
);
criterion_main!(benches);
