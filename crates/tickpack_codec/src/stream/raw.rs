//! # Raw Streams
//!
//! Byte-aligned, uncompressed implementation of the stream protocol. Used
//! when bandwidth does not matter, while debugging a schema, or as the
//! reference the Huffman streams are checked against.
//!
//! | Call          | Encoding                          |
//! |---------------|-----------------------------------|
//! | raw bits `n`  | `ceil(n / 8)` bytes, little-endian |
//! | raw bytes     | copied as-is                      |
//! | packed nibble | 1 byte                            |
//! | packed uint   | 4 bytes, little-endian            |
//! | deltas        | zig-zag, then packed uint         |
//!
//! Contexts are accepted and ignored.

use super::{fits, StreamReader, StreamWriter, MAX_RAW_BITS};

/// Byte-aligned writer over a caller-owned buffer.
pub struct RawWriter<'a> {
    buffer: &'a mut [u8],
    position: usize,
}

impl<'a> RawWriter<'a> {
    /// Creates a writer at the start of `buffer`.
    #[must_use]
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Bytes written so far.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.position]
    }

    /// Rewinds to the start of the buffer.
    #[inline]
    pub fn reset(&mut self) {
        self.position = 0;
    }

    #[inline]
    fn put(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        assert!(
            end <= self.buffer.len(),
            "stream buffer overflow: capacity {} bytes",
            self.buffer.len()
        );
        self.buffer[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }
}

impl StreamWriter for RawWriter<'_> {
    fn write_raw_bits(&mut self, value: u32, bits: u32) {
        assert!(bits <= MAX_RAW_BITS, "{bits} raw bits");
        debug_assert!(fits(value, bits), "value {value} does not fit in {bits} bits");
        let bytes = bits.div_ceil(8) as usize;
        self.put(&value.to_le_bytes()[..bytes]);
    }

    fn write_raw_bytes(&mut self, bytes: &[u8]) {
        self.put(bytes);
    }

    fn write_packed_nibble(&mut self, value: u8, _context: usize) {
        assert!(value < 16, "nibble {value}");
        self.put(&[value]);
    }

    fn write_packed_uint(&mut self, value: u32, _context: usize) {
        self.put(&value.to_le_bytes());
    }

    fn bit_position(&self) -> usize {
        self.position * 8
    }

    fn flush(&mut self) -> usize {
        tracing::trace!(bytes = self.position, "raw stream flushed");
        self.position
    }
}

/// Byte-aligned reader matching [`RawWriter`].
pub struct RawReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> RawReader<'a> {
    /// Creates a reader at the start of `buffer`.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Bytes left to read.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    #[inline]
    fn take(&mut self, count: usize) -> &'a [u8] {
        let end = self.position + count;
        assert!(
            end <= self.buffer.len(),
            "read past end of stream: {} of {} bytes",
            end,
            self.buffer.len()
        );
        let slice = &self.buffer[self.position..end];
        self.position = end;
        slice
    }
}

impl StreamReader for RawReader<'_> {
    fn read_raw_bits(&mut self, bits: u32) -> u32 {
        assert!(bits <= MAX_RAW_BITS, "{bits} raw bits");
        let mut le = [0u8; 4];
        let count = bits.div_ceil(8) as usize;
        le[..count].copy_from_slice(self.take(count));
        u32::from_le_bytes(le)
    }

    fn read_raw_bytes(&mut self, out: &mut [u8]) {
        out.copy_from_slice(self.take(out.len()));
    }

    fn read_packed_nibble(&mut self, _context: usize) -> u8 {
        self.take(1)[0]
    }

    fn read_packed_uint(&mut self, _context: usize) -> u32 {
        let bytes = self.take(4);
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn bit_position(&self) -> usize {
        self.position * 8
    }
}
