//! # Huffman Streams
//!
//! Bit-packed writer and reader. Bits enter and leave a 64-bit accumulator
//! least-significant first; whole bytes move between the accumulator and
//! the caller's buffer.
//!
//! ```text
//!            bit_count
//!   ┌──────────┴──────────┐
//!   [ .... pending bits .. ]  ◄── new bits OR'd in above bit_count
//!   └► low byte out first
//! ```

use super::{fits, low_mask, StreamReader, StreamWriter, MAX_RAW_BITS};
use crate::bucket::{classify_bucket, BUCKET_OFFSETS, BUCKET_SIZES};
use crate::model::{Model, MAX_CODE_LENGTH};

/// Reader refills while it holds at most this many bits, leaving at least
/// 57 bits after a refill: enough for any 32-bit raw read or symbol peek.
const REFILL_THRESHOLD: u32 = 56;

/// Bit-packed writer over a caller-owned buffer.
///
/// # Thread Safety
///
/// One writer per buffer, used from one thread. The model may be shared.
pub struct HuffmanWriter<'a> {
    model: &'a Model,
    buffer: &'a mut [u8],
    /// Next byte to write.
    position: usize,
    /// Pending bits, low bits first.
    bit_buffer: u64,
    /// Valid bits in `bit_buffer` (always < 8 between calls).
    bit_count: u32,
}

impl<'a> HuffmanWriter<'a> {
    /// Creates a writer at the start of `buffer`.
    #[must_use]
    pub fn new(model: &'a Model, buffer: &'a mut [u8]) -> Self {
        Self {
            model,
            buffer,
            position: 0,
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// The model symbols are encoded against.
    #[inline]
    #[must_use]
    pub const fn model(&self) -> &'a Model {
        self.model
    }

    /// Size of the backing buffer in bytes.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes already moved to the buffer. Pending bits appear after
    /// [`flush`](StreamWriter::flush).
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.position]
    }

    /// Rewinds to the start of the buffer, dropping pending bits.
    pub fn reset(&mut self) {
        self.position = 0;
        self.bit_buffer = 0;
        self.bit_count = 0;
    }

    #[inline]
    fn write_bits(&mut self, value: u32, bits: u32) {
        self.bit_buffer |= (u64::from(value) & low_mask(bits)) << self.bit_count;
        self.bit_count += bits;
        while self.bit_count >= 8 {
            self.push_byte(self.bit_buffer as u8);
            self.bit_buffer >>= 8;
            self.bit_count -= 8;
        }
    }

    #[inline]
    fn write_symbol(&mut self, symbol: usize, context: usize) {
        let (code, length) = self.model.encode_entry(context, symbol);
        assert!(length > 0, "symbol {symbol} has no code in context {context}");
        self.write_bits(u32::from(code), u32::from(length));
    }

    #[inline]
    fn push_byte(&mut self, byte: u8) {
        assert!(
            self.position < self.buffer.len(),
            "stream buffer overflow: capacity {} bytes",
            self.buffer.len()
        );
        self.buffer[self.position] = byte;
        self.position += 1;
    }

    /// Emits the partial byte, if any, zero padded.
    fn align(&mut self) {
        if self.bit_count > 0 {
            self.push_byte(self.bit_buffer as u8);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }
}

impl StreamWriter for HuffmanWriter<'_> {
    fn write_raw_bits(&mut self, value: u32, bits: u32) {
        assert!(bits <= MAX_RAW_BITS, "{bits} raw bits");
        debug_assert!(fits(value, bits), "value {value} does not fit in {bits} bits");
        self.write_bits(value, bits);
    }

    fn write_raw_bytes(&mut self, bytes: &[u8]) {
        self.align();
        let end = self.position + bytes.len();
        assert!(
            end <= self.buffer.len(),
            "stream buffer overflow: capacity {} bytes",
            self.buffer.len()
        );
        self.buffer[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }

    fn write_packed_nibble(&mut self, value: u8, context: usize) {
        assert!(value < 16, "nibble {value}");
        self.write_symbol(usize::from(value), context);
    }

    fn write_packed_uint(&mut self, value: u32, context: usize) {
        let bucket = classify_bucket(value);
        self.write_symbol(bucket, context);
        self.write_bits(value - BUCKET_OFFSETS[bucket], u32::from(BUCKET_SIZES[bucket]));
    }

    fn bit_position(&self) -> usize {
        self.position * 8 + self.bit_count as usize
    }

    fn flush(&mut self) -> usize {
        self.align();
        tracing::trace!(bytes = self.position, "huffman stream flushed");
        self.position
    }
}

/// Bit-packed reader over a received buffer.
///
/// Bytes past the end of the buffer read as zero. The reader trusts its
/// producer and does not detect corrupt input.
pub struct HuffmanReader<'a> {
    model: &'a Model,
    buffer: &'a [u8],
    /// Next byte to load into the accumulator.
    position: usize,
    /// Loaded, unconsumed bits, low bits first.
    bit_buffer: u64,
    /// Valid bits in `bit_buffer`.
    bit_count: u32,
}

impl<'a> HuffmanReader<'a> {
    /// Creates a reader at the start of `buffer`.
    #[must_use]
    pub const fn new(model: &'a Model, buffer: &'a [u8]) -> Self {
        Self {
            model,
            buffer,
            position: 0,
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// The model symbols are decoded against.
    #[inline]
    #[must_use]
    pub const fn model(&self) -> &'a Model {
        self.model
    }

    /// Bytes of real input left, counting partially consumed bytes.
    #[must_use]
    pub fn remaining_bytes(&self) -> usize {
        self.buffer.len().saturating_sub(self.bit_position() / 8)
    }

    fn refill(&mut self) {
        while self.bit_count <= REFILL_THRESHOLD {
            let byte = self.buffer.get(self.position).copied().unwrap_or(0);
            self.bit_buffer |= u64::from(byte) << self.bit_count;
            self.position += 1;
            self.bit_count += 8;
        }
    }

    #[inline]
    fn read_bits(&mut self, bits: u32) -> u32 {
        if self.bit_count < bits {
            self.refill();
        }
        let value = (self.bit_buffer & low_mask(bits)) as u32;
        self.bit_buffer >>= bits;
        self.bit_count -= bits;
        value
    }

    #[inline]
    fn read_symbol(&mut self, context: usize) -> usize {
        if self.bit_count < u32::from(MAX_CODE_LENGTH) {
            self.refill();
        }
        let (symbol, length) = self.model.decode_entry(context, self.bit_buffer);
        debug_assert!(length > 0, "no code matches the next bits in context {context}");
        self.bit_buffer >>= length;
        self.bit_count -= u32::from(length);
        usize::from(symbol)
    }
}

impl StreamReader for HuffmanReader<'_> {
    fn read_raw_bits(&mut self, bits: u32) -> u32 {
        assert!(bits <= MAX_RAW_BITS, "{bits} raw bits");
        self.read_bits(bits)
    }

    fn read_raw_bytes(&mut self, out: &mut [u8]) {
        // Hand back whole buffered bytes, drop the partial byte's padding
        self.position -= (self.bit_count / 8) as usize;
        self.bit_buffer = 0;
        self.bit_count = 0;

        let end = self.position + out.len();
        assert!(
            end <= self.buffer.len(),
            "read past end of stream: {} of {} bytes",
            end,
            self.buffer.len()
        );
        out.copy_from_slice(&self.buffer[self.position..end]);
        self.position = end;
    }

    fn read_packed_nibble(&mut self, context: usize) -> u8 {
        self.read_symbol(context) as u8
    }

    fn read_packed_uint(&mut self, context: usize) -> u32 {
        let bucket = self.read_symbol(context);
        BUCKET_OFFSETS[bucket] + self.read_bits(u32::from(BUCKET_SIZES[bucket]))
    }

    fn bit_position(&self) -> usize {
        self.position * 8 - self.bit_count as usize
    }
}
