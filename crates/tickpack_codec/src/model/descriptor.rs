//! # Model Descriptor
//!
//! Byte form of a model, shipped out of band between peers:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ alphabet (1) │ default lengths (16) │ override count (2 LE) │
//! ├────────────────────────────────────────────────────────────┤
//! │ per override: context (2 LE) │ alphabet (1) │ lengths (16) │
//! └────────────────────────────────────────────────────────────┘
//! ```

use crate::bucket::BUCKET_COUNT;
use crate::error::{CodecError, CodecResult};

/// Symbols per context: one per bucket.
pub const ALPHABET_SIZE: usize = BUCKET_COUNT;

/// Built-in code lengths, shortest codes for the smallest buckets.
pub const DEFAULT_LENGTHS: [u8; ALPHABET_SIZE] = [2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 6, 6, 6];

/// Built-in descriptor: default lengths, no overrides.
pub const DEFAULT_DESCRIPTOR: [u8; 1 + ALPHABET_SIZE + 2] = default_descriptor();

const fn default_descriptor() -> [u8; 1 + ALPHABET_SIZE + 2] {
    let mut bytes = [0u8; 1 + ALPHABET_SIZE + 2];
    bytes[0] = ALPHABET_SIZE as u8;
    let mut symbol = 0;
    while symbol < ALPHABET_SIZE {
        bytes[1 + symbol] = DEFAULT_LENGTHS[symbol];
        symbol += 1;
    }
    // Override count stays 0
    bytes
}

/// Code lengths replacing the defaults for one context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextLengths {
    /// Context the lengths apply to.
    pub context: u16,
    /// Code length per bucket symbol.
    pub lengths: [u8; ALPHABET_SIZE],
}

/// Parsed model descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelDescriptor {
    /// Lengths for every context without an override.
    pub default_lengths: [u8; ALPHABET_SIZE],
    /// Per-context replacements, applied in order.
    pub overrides: Vec<ContextLengths>,
}

impl ModelDescriptor {
    /// Creates a descriptor with the given defaults and no overrides.
    #[must_use]
    pub const fn new(default_lengths: [u8; ALPHABET_SIZE]) -> Self {
        Self {
            default_lengths,
            overrides: Vec::new(),
        }
    }

    /// Adds an override for `context`.
    #[must_use]
    pub fn with_override(mut self, context: u16, lengths: [u8; ALPHABET_SIZE]) -> Self {
        self.overrides.push(ContextLengths { context, lengths });
        self
    }

    /// Lengths in effect for `context`. A later override of the same
    /// context wins over an earlier one.
    #[must_use]
    pub fn lengths_for(&self, context: usize) -> &[u8; ALPHABET_SIZE] {
        self.overrides
            .iter()
            .rev()
            .find(|o| usize::from(o.context) == context)
            .map_or(&self.default_lengths, |o| &o.lengths)
    }

    /// Parses the byte form.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are truncated, carry trailing data, or
    /// declare an alphabet other than [`ALPHABET_SIZE`].
    pub fn parse(bytes: &[u8]) -> CodecResult<Self> {
        let mut cursor = DescriptorCursor::new(bytes);

        let default_lengths = cursor.read_lengths()?;
        let override_count = cursor.read_u16()?;

        let mut overrides = Vec::with_capacity(usize::from(override_count));
        for _ in 0..override_count {
            let context = cursor.read_u16()?;
            let lengths = cursor.read_lengths()?;
            overrides.push(ContextLengths { context, lengths });
        }

        if cursor.remaining() > 0 {
            return Err(CodecError::TrailingBytes {
                count: cursor.remaining(),
            });
        }

        Ok(Self {
            default_lengths,
            overrides,
        })
    }

    /// Encodes the byte form.
    ///
    /// # Panics
    ///
    /// Panics if there are more than `u16::MAX` overrides.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        assert!(self.overrides.len() <= usize::from(u16::MAX), "too many overrides");
        let count = self.overrides.len() as u16;

        let mut bytes = Vec::with_capacity(3 + ALPHABET_SIZE + self.overrides.len() * (3 + ALPHABET_SIZE));
        bytes.push(ALPHABET_SIZE as u8);
        bytes.extend_from_slice(&self.default_lengths);
        bytes.extend_from_slice(&count.to_le_bytes());
        for o in &self.overrides {
            bytes.extend_from_slice(&o.context.to_le_bytes());
            bytes.push(ALPHABET_SIZE as u8);
            bytes.extend_from_slice(&o.lengths);
        }
        bytes
    }
}

impl Default for ModelDescriptor {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTHS)
    }
}

/// Bounds-checked little-endian reader over descriptor bytes.
struct DescriptorCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> DescriptorCursor<'a> {
    const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    const fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.position)
    }

    fn take(&mut self, count: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < count {
            return Err(CodecError::Truncated {
                needed: count,
                available: self.remaining(),
            });
        }
        let slice = &self.bytes[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    fn read_u16(&mut self) -> CodecResult<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Reads an alphabet size byte followed by one length per symbol.
    fn read_lengths(&mut self) -> CodecResult<[u8; ALPHABET_SIZE]> {
        let alphabet = usize::from(self.take(1)?[0]);
        if alphabet != ALPHABET_SIZE {
            return Err(CodecError::AlphabetSizeMismatch {
                expected: ALPHABET_SIZE,
                found: alphabet,
            });
        }
        let mut lengths = [0u8; ALPHABET_SIZE];
        lengths.copy_from_slice(self.take(ALPHABET_SIZE)?);
        Ok(lengths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor_parses() {
        let descriptor = ModelDescriptor::parse(&DEFAULT_DESCRIPTOR).unwrap();
        assert_eq!(descriptor, ModelDescriptor::default());
        assert_eq!(descriptor.to_bytes(), DEFAULT_DESCRIPTOR.to_vec());
    }

    #[test]
    fn test_default_descriptor_layout() {
        assert_eq!(DEFAULT_DESCRIPTOR[0], 16);
        assert_eq!(&DEFAULT_DESCRIPTOR[1..17], &DEFAULT_LENGTHS);
        assert_eq!(&DEFAULT_DESCRIPTOR[17..], &[0, 0]);
    }

    #[test]
    fn test_override_bytes() {
        let lengths = [4u8; ALPHABET_SIZE];
        let descriptor = ModelDescriptor::default().with_override(0x0203, lengths);
        let bytes = descriptor.to_bytes();

        assert_eq!(bytes.len(), 19 + 19);
        assert_eq!(&bytes[17..19], &[1, 0]);
        assert_eq!(&bytes[19..22], &[0x03, 0x02, 16]);
        assert_eq!(ModelDescriptor::parse(&bytes).unwrap(), descriptor);
    }

    #[test]
    fn test_last_override_wins() {
        let descriptor = ModelDescriptor::default()
            .with_override(1, [4; ALPHABET_SIZE])
            .with_override(1, [5; ALPHABET_SIZE]);
        assert_eq!(descriptor.lengths_for(1), &[5; ALPHABET_SIZE]);
        assert_eq!(descriptor.lengths_for(0), &DEFAULT_LENGTHS);
    }

    #[test]
    fn test_alphabet_mismatch() {
        let mut bytes = DEFAULT_DESCRIPTOR.to_vec();
        bytes[0] = 8;
        assert_eq!(
            ModelDescriptor::parse(&bytes),
            Err(CodecError::AlphabetSizeMismatch { expected: 16, found: 8 })
        );
    }

    #[test]
    fn test_truncated() {
        let err = ModelDescriptor::parse(&DEFAULT_DESCRIPTOR[..10]).unwrap_err();
        assert_eq!(err, CodecError::Truncated { needed: 16, available: 9 });

        let mut bytes = DEFAULT_DESCRIPTOR.to_vec();
        bytes[17] = 1;
        assert!(matches!(ModelDescriptor::parse(&bytes), Err(CodecError::Truncated { .. })));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = DEFAULT_DESCRIPTOR.to_vec();
        bytes.push(0);
        assert_eq!(ModelDescriptor::parse(&bytes), Err(CodecError::TrailingBytes { count: 1 }));
    }
}
