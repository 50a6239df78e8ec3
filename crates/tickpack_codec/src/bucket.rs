//! # Bucket Table
//!
//! Maps an unsigned magnitude to one of 16 buckets. A packed integer is
//! written as its bucket symbol followed by `BUCKET_SIZES[bucket]` raw bits
//! holding `value - BUCKET_OFFSETS[bucket]`.
//!
//! ```text
//! bucket:  0  1  2  3  4  5   6   7    8     9    10     11 ...   15
//! offset:  0  1  2  4  8  16  32  96   352  1376  5472  38240 ... 153392480
//! extra:   0  0  1  2  3  4   6   8    10    12   15     18  ...   32
//! ```
//!
//! Each offset is the previous offset plus the previous bucket's range, so
//! the buckets tile `0..=u32::MAX` without gaps. Bucket 15 carries a full
//! 32 extra bits and absorbs everything above its offset.

/// Number of buckets, which is also the Huffman alphabet size.
pub const BUCKET_COUNT: usize = 16;

/// Extra raw bits emitted after each bucket symbol.
pub const BUCKET_SIZES: [u8; BUCKET_COUNT] = [0, 0, 1, 2, 3, 4, 6, 8, 10, 12, 15, 18, 21, 24, 27, 32];

/// Smallest magnitude that falls into each bucket.
pub const BUCKET_OFFSETS: [u32; BUCKET_COUNT] = [
    0,
    1,
    2,
    4,
    8,
    16,
    32,
    96,
    352,
    1376,
    5472,
    38240,
    300_384,
    2_397_536,
    19_174_752,
    153_392_480,
];

/// Bucket holding the smallest value with a given leading-zero count.
///
/// Indexed by `value.leading_zeros()` (0..=32). Every power-of-two range
/// spans at most two buckets, so one comparison against the next offset
/// finishes the classification.
const FIRST_BUCKET_CANDIDATE: [u8; 33] = first_bucket_candidates();

const fn first_bucket_candidates() -> [u8; 33] {
    let mut table = [0u8; 33];
    let mut zeros = 0;
    while zeros < 32 {
        table[zeros] = classify_linear(1u32 << (31 - zeros)) as u8;
        zeros += 1;
    }
    table
}

/// Forward scan over the offset table.
const fn classify_linear(value: u32) -> usize {
    let mut bucket = 0;
    while bucket + 1 < BUCKET_COUNT && value >= BUCKET_OFFSETS[bucket + 1] {
        bucket += 1;
    }
    bucket
}

/// Returns the bucket `b` with `BUCKET_OFFSETS[b] <= value` and
/// `value < BUCKET_OFFSETS[b + 1]` (or `b == 15`).
#[inline]
#[must_use]
pub fn classify_bucket(value: u32) -> usize {
    let mut bucket = FIRST_BUCKET_CANDIDATE[value.leading_zeros() as usize] as usize;
    if bucket + 1 < BUCKET_COUNT && value >= BUCKET_OFFSETS[bucket + 1] {
        bucket += 1;
    }
    bucket
}

/// Total bits a value costs beyond its bucket symbol.
#[inline]
#[must_use]
pub fn extra_bits(value: u32) -> u8 {
    BUCKET_SIZES[classify_bucket(value)]
}
