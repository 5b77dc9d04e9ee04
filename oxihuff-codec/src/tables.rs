//! Symbol alphabet tables.
//!
//! Literals, the end-of-stream marker, match lengths and match distances
//! share a single Huffman alphabet:
//!
//! | Codes   | Meaning                                   |
//! |---------|-------------------------------------------|
//! | 0-255   | literal byte                              |
//! | 256     | end of stream                             |
//! | 257-285 | match length 3-258 (DEFLATE buckets)      |
//! | 300-331 | match distance 1-65536 (DEFLATE buckets, extended by two codes) |
//!
//! Lengths and distances are bucketed: the code selects a base value and the
//! low-order remainder travels as raw extra bits right after the code.

/// Literal codes occupy 0-255.
pub const LITERAL_LIMIT: u16 = 256;

/// End-of-stream marker.
pub const END_OF_STREAM: u16 = 256;

/// First length code.
pub const LENGTH_CODE_FIRST: u16 = 257;

/// Last length code.
pub const LENGTH_CODE_LAST: u16 = 285;

/// Distance codes start here, clear of the length codes.
pub const DISTANCE_CODE_OFFSET: u16 = 300;

/// Last distance code.
pub const DISTANCE_CODE_LAST: u16 = 331;

/// Size of the combined alphabet (codes 0-331, with 286-299 unused).
pub const ALPHABET_SIZE: usize = DISTANCE_CODE_LAST as usize + 1;

/// Minimum encodable match length.
pub const MIN_LENGTH: u16 = 3;

/// Maximum encodable match length.
pub const MAX_LENGTH: u16 = 258;

/// Maximum encodable match distance.
pub const MAX_DISTANCE: u32 = 65536;

/// Length code base values.
///
/// For length codes 257-285, this gives the base length value.
/// Extra bits are added to get the final length.
pub const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, // 257-264: 0 extra bits
    11, 13, 15, 17, // 265-268: 1 extra bit
    19, 23, 27, 31, // 269-272: 2 extra bits
    35, 43, 51, 59, // 273-276: 3 extra bits
    67, 83, 99, 115, // 277-280: 4 extra bits
    131, 163, 195, 227, // 281-284: 5 extra bits
    258, // 285: 0 extra bits (special case)
];

/// Number of extra bits for length codes 257-285.
pub const LENGTH_EXTRA_BITS: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, // 257-264
    1, 1, 1, 1, // 265-268
    2, 2, 2, 2, // 269-272
    3, 3, 3, 3, // 273-276
    4, 4, 4, 4, // 277-280
    5, 5, 5, 5, // 281-284
    0, // 285
];

/// Distance code base values, indexed by `code - DISTANCE_CODE_OFFSET`.
pub const DISTANCE_BASE: [u32; 32] = [
    1, 2, 3, 4, // 300-303: 0 extra bits
    5, 7, // 304-305: 1 extra bit
    9, 13, // 306-307: 2 extra bits
    17, 25, // 308-309: 3 extra bits
    33, 49, // 310-311: 4 extra bits
    65, 97, // 312-313: 5 extra bits
    129, 193, // 314-315: 6 extra bits
    257, 385, // 316-317: 7 extra bits
    513, 769, // 318-319: 8 extra bits
    1025, 1537, // 320-321: 9 extra bits
    2049, 3073, // 322-323: 10 extra bits
    4097, 6145, // 324-325: 11 extra bits
    8193, 12289, // 326-327: 12 extra bits
    16385, 24577, // 328-329: 13 extra bits
    32769, 49153, // 330-331: 14 extra bits
];

/// Number of extra bits for distance codes 300-331.
pub const DISTANCE_EXTRA_BITS: [u8; 32] = [
    0, 0, 0, 0, // 300-303
    1, 1, // 304-305
    2, 2, // 306-307
    3, 3, // 308-309
    4, 4, // 310-311
    5, 5, // 312-313
    6, 6, // 314-315
    7, 7, // 316-317
    8, 8, // 318-319
    9, 9, // 320-321
    10, 10, // 322-323
    11, 11, // 324-325
    12, 12, // 326-327
    13, 13, // 328-329
    14, 14, // 330-331
];

/// What a code of the combined alphabet stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    /// A literal byte.
    Literal(u8),
    /// The end-of-stream marker.
    EndOfStream,
    /// A match length code.
    Length,
    /// A match distance code.
    Distance,
    /// Not part of the alphabet.
    Unknown,
}

/// Classify a code of the combined alphabet.
pub fn classify(code: u16) -> SymbolClass {
    match code {
        0..=255 => SymbolClass::Literal(code as u8),
        END_OF_STREAM => SymbolClass::EndOfStream,
        LENGTH_CODE_FIRST..=LENGTH_CODE_LAST => SymbolClass::Length,
        DISTANCE_CODE_OFFSET..=DISTANCE_CODE_LAST => SymbolClass::Distance,
        _ => SymbolClass::Unknown,
    }
}

/// Whether `code` belongs to the alphabet at all.
pub fn is_valid_code(code: u16) -> bool {
    classify(code) != SymbolClass::Unknown
}

/// Convert a length value (3-258) to `(code, extra_bits, extra_value)`.
pub fn length_to_code(length: u16) -> (u16, u8, u16) {
    debug_assert!(
        (MIN_LENGTH..=MAX_LENGTH).contains(&length),
        "Length out of range: {}",
        length
    );

    let length = length as usize;

    let code = match length {
        3..=10 => length - 3 + 257,
        11..=18 => (length - 11) / 2 + 265,
        19..=34 => (length - 19) / 4 + 269,
        35..=66 => (length - 35) / 8 + 273,
        67..=130 => (length - 67) / 16 + 277,
        131..=257 => (length - 131) / 32 + 281,
        _ => 285,
    };

    let idx = code - LENGTH_CODE_FIRST as usize;
    let extra_value = (length - LENGTH_BASE[idx] as usize) as u16;

    (code as u16, LENGTH_EXTRA_BITS[idx], extra_value)
}

/// Base length and extra-bit count for a length code, or `None` if `code`
/// is not a length code.
pub fn code_to_length_base(code: u16) -> Option<(u16, u8)> {
    if !(LENGTH_CODE_FIRST..=LENGTH_CODE_LAST).contains(&code) {
        return None;
    }
    let idx = (code - LENGTH_CODE_FIRST) as usize;
    Some((LENGTH_BASE[idx], LENGTH_EXTRA_BITS[idx]))
}

/// Convert a distance value (1-65536) to `(code, extra_bits, extra_value)`.
pub fn distance_to_code(distance: u32) -> (u16, u8, u32) {
    debug_assert!(
        (1..=MAX_DISTANCE).contains(&distance),
        "Distance out of range: {}",
        distance
    );

    // Distances 1-4 are singletons; above that each power-of-two range
    // splits into two codes sharing one extra-bit count.
    let d = distance - 1;
    let idx = if d < 4 {
        d as usize
    } else {
        let msb = 31 - d.leading_zeros();
        (2 * msb + ((d >> (msb - 1)) & 1)) as usize
    };

    let extra_value = distance - DISTANCE_BASE[idx];
    (
        DISTANCE_CODE_OFFSET + idx as u16,
        DISTANCE_EXTRA_BITS[idx],
        extra_value,
    )
}

/// Base distance and extra-bit count for a distance code, or `None` if
/// `code` is not a distance code.
pub fn code_to_distance_base(code: u16) -> Option<(u32, u8)> {
    if !(DISTANCE_CODE_OFFSET..=DISTANCE_CODE_LAST).contains(&code) {
        return None;
    }
    let idx = (code - DISTANCE_CODE_OFFSET) as usize;
    Some((DISTANCE_BASE[idx], DISTANCE_EXTRA_BITS[idx]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_to_code_roundtrip() {
        for length in MIN_LENGTH..=MAX_LENGTH {
            let (code, extra_bits, extra_value) = length_to_code(length);
            let (base, table_bits) = code_to_length_base(code).unwrap();
            assert_eq!(extra_bits, table_bits, "extra bits differ for {}", length);
            assert!(extra_value < (1 << extra_bits).max(1));
            assert_eq!(
                base + extra_value,
                length,
                "Roundtrip failed for length {}: code={}, extra_bits={}, extra_value={}",
                length,
                code,
                extra_bits,
                extra_value
            );
        }
    }

    #[test]
    fn test_distance_to_code_roundtrip() {
        for distance in 1..=MAX_DISTANCE {
            let (code, extra_bits, extra_value) = distance_to_code(distance);
            let (base, table_bits) = code_to_distance_base(code).unwrap();
            assert_eq!(extra_bits, table_bits, "extra bits differ for {}", distance);
            assert!(extra_value < (1u32 << extra_bits));
            assert_eq!(
                base + extra_value,
                distance,
                "Roundtrip failed for distance {}: code={}, extra_bits={}, extra_value={}",
                distance,
                code,
                extra_bits,
                extra_value
            );
        }
    }

    #[test]
    fn test_every_code_is_reached() {
        let mut seen = [false; ALPHABET_SIZE];
        for length in MIN_LENGTH..=MAX_LENGTH {
            seen[length_to_code(length).0 as usize] = true;
        }
        for distance in 1..=MAX_DISTANCE {
            seen[distance_to_code(distance).0 as usize] = true;
        }
        for code in LENGTH_CODE_FIRST..=LENGTH_CODE_LAST {
            assert!(seen[code as usize], "length code {} unused", code);
        }
        for code in DISTANCE_CODE_OFFSET..=DISTANCE_CODE_LAST {
            assert!(seen[code as usize], "distance code {} unused", code);
        }
    }

    #[test]
    fn test_bucket_boundaries_are_contiguous() {
        for pair in LENGTH_BASE[..28].windows(2).zip(LENGTH_EXTRA_BITS.iter()) {
            let (bases, &bits) = pair;
            assert_eq!(bases[0] + (1 << bits), bases[1]);
        }
        for pair in DISTANCE_BASE.windows(2).zip(DISTANCE_EXTRA_BITS.iter()) {
            let (bases, &bits) = pair;
            assert_eq!(bases[0] + (1 << bits), bases[1]);
        }
        assert_eq!(DISTANCE_BASE[31] + (1 << 14) - 1, MAX_DISTANCE);
    }

    #[test]
    fn test_specific_lengths() {
        assert_eq!(length_to_code(3), (257, 0, 0));
        assert_eq!(length_to_code(9), (263, 0, 0));
        assert_eq!(length_to_code(10), (264, 0, 0));
        assert_eq!(length_to_code(11), (265, 1, 0));
        assert_eq!(length_to_code(12), (265, 1, 1));
        assert_eq!(length_to_code(257), (284, 5, 30));
        assert_eq!(length_to_code(258), (285, 0, 0));
    }

    #[test]
    fn test_specific_distances() {
        assert_eq!(distance_to_code(1), (300, 0, 0));
        assert_eq!(distance_to_code(4), (303, 0, 0));
        assert_eq!(distance_to_code(5), (304, 1, 0));
        assert_eq!(distance_to_code(6), (304, 1, 1));
        assert_eq!(distance_to_code(32768), (329, 13, 8191));
        assert_eq!(distance_to_code(32769), (330, 14, 0));
        assert_eq!(distance_to_code(65536), (331, 14, 16383));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(0), SymbolClass::Literal(0));
        assert_eq!(classify(255), SymbolClass::Literal(255));
        assert_eq!(classify(256), SymbolClass::EndOfStream);
        assert_eq!(classify(257), SymbolClass::Length);
        assert_eq!(classify(285), SymbolClass::Length);
        assert_eq!(classify(286), SymbolClass::Unknown);
        assert_eq!(classify(299), SymbolClass::Unknown);
        assert_eq!(classify(300), SymbolClass::Distance);
        assert_eq!(classify(331), SymbolClass::Distance);
        assert_eq!(classify(332), SymbolClass::Unknown);
    }

    #[test]
    fn test_inverse_rejects_foreign_codes() {
        assert_eq!(code_to_length_base(256), None);
        assert_eq!(code_to_length_base(300), None);
        assert_eq!(code_to_distance_base(285), None);
        assert_eq!(code_to_distance_base(332), None);
    }
}
