//! # Stream Protocol
//!
//! One read/write contract, two families:
//!
//! - [`HuffmanWriter`] / [`HuffmanReader`]: bit-packed against a [`Model`](crate::Model)
//! - [`RawWriter`] / [`RawReader`]: byte-aligned, fixed width, no model
//!
//! The wire carries no schema. A reader must issue exactly the calls the
//! writer issued, in the same order, with the same contexts.
//!
//! ## Packed integers
//!
//! ```text
//! value ──► bucket (0..16) ──► Huffman symbol ─┐
//!       └─► value - offset ──► extra raw bits ─┴──► stream
//! ```
//!
//! Deltas are zig-zag folded first (`0, -1, 1, -2, 2 ...` → `0, 1, 2, 3, 4 ...`),
//! so small tick-to-tick changes land in the cheapest buckets.

mod huffman;
mod raw;

pub use huffman::{HuffmanReader, HuffmanWriter};
pub use raw::{RawReader, RawWriter};

/// Largest bit count accepted by the raw-bit calls.
pub const MAX_RAW_BITS: u32 = 32;

/// Folds a signed difference into an unsigned value, small magnitudes first.
#[inline]
#[must_use]
pub const fn zigzag_encode(diff: i32) -> u32 {
    ((diff >> 31) ^ (diff << 1)) as u32
}

/// Inverse of [`zigzag_encode`].
#[inline]
#[must_use]
pub const fn zigzag_decode(folded: u32) -> i32 {
    ((folded >> 1) as i32) ^ -((folded & 1) as i32)
}

/// Write half of the stream protocol.
///
/// Contract violations (value wider than its bit count, nibble >= 16,
/// more than 32 raw bits, unknown context, full buffer) panic.
pub trait StreamWriter {
    /// Writes the low `bits` bits of `value` unencoded (`bits <= 32`).
    fn write_raw_bits(&mut self, value: u32, bits: u32);

    /// Copies `bytes` at the next byte boundary, bypassing the model.
    fn write_raw_bytes(&mut self, bytes: &[u8]);

    /// Writes a value in `0..16` as a single symbol.
    fn write_packed_nibble(&mut self, value: u8, context: usize);

    /// Writes `value` as a bucket symbol plus extra bits.
    fn write_packed_uint(&mut self, value: u32, context: usize);

    /// Writes `value` relative to `baseline`.
    fn write_packed_int_delta(&mut self, value: i32, baseline: i32, context: usize) {
        self.write_packed_uint(zigzag_encode(baseline.wrapping_sub(value)), context);
    }

    /// Writes `value` relative to `baseline`, wrapping at `u32` bounds.
    fn write_packed_uint_delta(&mut self, value: u32, baseline: u32, context: usize) {
        self.write_packed_uint(zigzag_encode(baseline.wrapping_sub(value) as i32), context);
    }

    /// Bits written since the stream started.
    fn bit_position(&self) -> usize;

    /// Pads to a byte boundary and returns the total bytes emitted.
    fn flush(&mut self) -> usize;
}

/// Read half of the stream protocol.
pub trait StreamReader {
    /// Reads `bits` unencoded bits (`bits <= 32`).
    fn read_raw_bits(&mut self, bits: u32) -> u32;

    /// Fills `out` from the next byte boundary.
    fn read_raw_bytes(&mut self, out: &mut [u8]);

    /// Reads a value written by [`StreamWriter::write_packed_nibble`].
    fn read_packed_nibble(&mut self, context: usize) -> u8;

    /// Reads a value written by [`StreamWriter::write_packed_uint`].
    fn read_packed_uint(&mut self, context: usize) -> u32;

    /// Reads a value written by [`StreamWriter::write_packed_int_delta`].
    fn read_packed_int_delta(&mut self, baseline: i32, context: usize) -> i32 {
        baseline.wrapping_sub(zigzag_decode(self.read_packed_uint(context)))
    }

    /// Reads a value written by [`StreamWriter::write_packed_uint_delta`].
    fn read_packed_uint_delta(&mut self, baseline: u32, context: usize) -> u32 {
        baseline.wrapping_sub(zigzag_decode(self.read_packed_uint(context)) as u32)
    }

    /// Bits consumed since the stream started.
    fn bit_position(&self) -> usize;
}

/// Mask of the low `bits` bits (`bits <= 32`).
#[inline]
pub(crate) const fn low_mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

/// True if `value` fits in `bits` bits.
#[inline]
pub(crate) const fn fits(value: u32, bits: u32) -> bool {
    bits >= 32 || value >> bits == 0
}
