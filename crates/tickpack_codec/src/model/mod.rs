//! # Compression Model
//!
//! Per-context Huffman tables over the 16 bucket symbols.
//!
//! ## Layout
//!
//! ```text
//! encode_table: [context][symbol]           = (reversed code << 8) | length
//! decode_table: [context][next 6 bits]      = (symbol << 8)        | length
//! ```
//!
//! A model is built once, never mutated afterwards, and shared read-only by
//! every stream that references it (`&Model` or `Arc<Model>`).

mod config;
mod descriptor;
mod statistics;

pub use config::{ModelConfig, OverrideConfig};
pub use descriptor::{ContextLengths, ModelDescriptor, ALPHABET_SIZE, DEFAULT_DESCRIPTOR, DEFAULT_LENGTHS};
pub use statistics::{StatisticsRecorder, SymbolStatistics};

use crate::bucket::BUCKET_SIZES;
use crate::error::{CodecError, CodecResult};
use crate::huffman::{build_decode_table, canonical_codes, kraft_sum, pack_entry, unpack_entry, KRAFT_ONE};

/// Longest Huffman code a model may contain.
pub const MAX_CODE_LENGTH: u8 = 6;

/// Decode table slots per context.
pub const DECODE_TABLE_SIZE: usize = 1 << MAX_CODE_LENGTH;

/// Contexts in [`Model::default`].
pub const DEFAULT_CONTEXTS: usize = 1;

/// Immutable per-context encode and decode tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Model {
    /// Number of contexts.
    contexts: usize,
    /// `contexts * ALPHABET_SIZE` packed encode entries.
    encode_table: Vec<u16>,
    /// `contexts * DECODE_TABLE_SIZE` packed decode entries.
    decode_table: Vec<u16>,
}

impl Model {
    /// Builds a model with `contexts` contexts from a parsed descriptor.
    ///
    /// # Errors
    ///
    /// Fails if `contexts` is zero, an override names a context outside the
    /// model, or any context's lengths do not form a usable prefix code.
    pub fn new(descriptor: &ModelDescriptor, contexts: usize) -> CodecResult<Self> {
        if contexts == 0 {
            return Err(CodecError::NoContexts);
        }
        if let Some(bad) = descriptor
            .overrides
            .iter()
            .find(|o| usize::from(o.context) >= contexts)
        {
            return Err(CodecError::ContextOutOfRange {
                context: usize::from(bad.context),
                contexts,
            });
        }
        for context in 0..contexts {
            validate_lengths(context, descriptor.lengths_for(context))?;
        }

        let model = Self::build(descriptor, contexts);
        tracing::debug!(
            contexts,
            overrides = descriptor.overrides.len(),
            "compression model built"
        );
        Ok(model)
    }

    /// Parses a byte descriptor and builds a model from it.
    ///
    /// # Errors
    ///
    /// Fails on a malformed descriptor or invalid code lengths.
    pub fn from_descriptor(bytes: &[u8], contexts: usize) -> CodecResult<Self> {
        let descriptor = ModelDescriptor::parse(bytes)?;
        Self::new(&descriptor, contexts)
    }

    /// Default code lengths in every one of `contexts` contexts.
    ///
    /// # Errors
    ///
    /// Fails only if `contexts` is zero.
    pub fn with_contexts(contexts: usize) -> CodecResult<Self> {
        if contexts == 0 {
            return Err(CodecError::NoContexts);
        }
        Ok(Self::build(&ModelDescriptor::default(), contexts))
    }

    /// Fills the tables. Lengths must already be validated.
    fn build(descriptor: &ModelDescriptor, contexts: usize) -> Self {
        let mut encode_table = vec![0u16; contexts * ALPHABET_SIZE];
        let mut decode_table = vec![0u16; contexts * DECODE_TABLE_SIZE];

        for context in 0..contexts {
            let lengths = descriptor.lengths_for(context);
            let codes = canonical_codes(lengths);

            let encode = &mut encode_table[context * ALPHABET_SIZE..(context + 1) * ALPHABET_SIZE];
            for (entry, (&code, &length)) in encode.iter_mut().zip(codes.iter().zip(lengths)) {
                *entry = pack_entry(code as u8, length);
            }

            let decode = &mut decode_table[context * DECODE_TABLE_SIZE..(context + 1) * DECODE_TABLE_SIZE];
            build_decode_table(lengths, &codes, MAX_CODE_LENGTH, decode);
        }

        Self {
            contexts,
            encode_table,
            decode_table,
        }
    }

    /// Number of contexts.
    #[inline]
    #[must_use]
    pub const fn contexts(&self) -> usize {
        self.contexts
    }

    /// Bit-reversed code and code length of `symbol` in `context`.
    ///
    /// # Panics
    ///
    /// Panics if `context` is not a context of this model or `symbol` is
    /// not a bucket symbol.
    #[inline]
    #[must_use]
    pub fn encode_entry(&self, context: usize, symbol: usize) -> (u16, u8) {
        assert!(context < self.contexts, "context {context} out of range ({})", self.contexts);
        assert!(symbol < ALPHABET_SIZE, "symbol {symbol} out of range ({ALPHABET_SIZE})");
        let (code, length) = unpack_entry(self.encode_table[context * ALPHABET_SIZE + symbol]);
        (u16::from(code), length)
    }

    /// Symbol and code length for the next `MAX_CODE_LENGTH` stream bits.
    ///
    /// Only the low `MAX_CODE_LENGTH` bits of `peek` are used. A length of 0
    /// means the bits match no code.
    ///
    /// # Panics
    ///
    /// Panics if `context` is not a context of this model.
    #[inline]
    #[must_use]
    pub fn decode_entry(&self, context: usize, peek: u64) -> (u8, u8) {
        assert!(context < self.contexts, "context {context} out of range ({})", self.contexts);
        let slot = (peek as usize) & (DECODE_TABLE_SIZE - 1);
        unpack_entry(self.decode_table[context * DECODE_TABLE_SIZE + slot])
    }

    /// Code length of `symbol` in `context` (0 if it cannot be encoded).
    #[inline]
    #[must_use]
    pub fn code_length(&self, context: usize, symbol: usize) -> u8 {
        self.encode_entry(context, symbol).1
    }

    /// Bits a packed uint of `value` costs in `context`.
    #[must_use]
    pub fn expected_bits(&self, context: usize, value: u32) -> u32 {
        let bucket = crate::bucket::classify_bucket(value);
        u32::from(self.code_length(context, bucket)) + u32::from(BUCKET_SIZES[bucket])
    }
}

impl Default for Model {
    /// Built-in lengths, [`DEFAULT_CONTEXTS`] contexts.
    fn default() -> Self {
        Self::build(&ModelDescriptor::default(), DEFAULT_CONTEXTS)
    }
}

/// Checks that `lengths` form a prefix code the decode tables can resolve.
fn validate_lengths(context: usize, lengths: &[u8; ALPHABET_SIZE]) -> CodecResult<()> {
    if let Some((symbol, &length)) = lengths
        .iter()
        .enumerate()
        .find(|&(_, &len)| len > MAX_CODE_LENGTH)
    {
        return Err(CodecError::CodeLengthTooLong {
            context,
            symbol,
            length,
            max: MAX_CODE_LENGTH,
        });
    }
    if lengths.iter().all(|&len| len == 0) {
        return Err(CodecError::EmptyCode { context });
    }
    if kraft_sum(lengths) > KRAFT_ONE {
        return Err(CodecError::OversubscribedCode { context });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_is_valid() {
        let model = Model::default();
        assert_eq!(model.contexts(), DEFAULT_CONTEXTS);
        assert_eq!(model, Model::new(&ModelDescriptor::default(), DEFAULT_CONTEXTS).unwrap());
        assert_eq!(model, Model::from_descriptor(&DEFAULT_DESCRIPTOR, DEFAULT_CONTEXTS).unwrap());
    }

    #[test]
    fn test_encode_decode_agree() {
        let model = Model::default();
        for symbol in 0..ALPHABET_SIZE {
            let (code, length) = model.encode_entry(0, symbol);
            assert_eq!(length, DEFAULT_LENGTHS[symbol]);
            // Any junk above the code must decode the same
            for high in 0..(1u64 << (MAX_CODE_LENGTH - length)) {
                let peek = u64::from(code) | (high << length);
                assert_eq!(model.decode_entry(0, peek), (symbol as u8, length));
            }
        }
    }

    #[test]
    fn test_override_applies_to_one_context() {
        let lengths = [4u8; ALPHABET_SIZE];
        let descriptor = ModelDescriptor::default().with_override(2, lengths);
        let model = Model::new(&descriptor, 3).unwrap();

        assert_eq!(model.code_length(0, 0), 2);
        assert_eq!(model.code_length(1, 0), 2);
        assert_eq!(model.code_length(2, 0), 4);
        assert_eq!(model.code_length(2, 15), 4);
    }

    #[test]
    fn test_single_symbol_context() {
        let mut lengths = [0u8; ALPHABET_SIZE];
        lengths[3] = 1;
        let model = Model::new(&ModelDescriptor::new(lengths), 1).unwrap();
        assert_eq!(model.encode_entry(0, 3), (0, 1));
        assert_eq!(model.decode_entry(0, 0b10), (3, 1));
        assert_eq!(model.decode_entry(0, 0b01).1, 0);
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(Model::with_contexts(0), Err(CodecError::NoContexts));

        let descriptor = ModelDescriptor::default().with_override(4, DEFAULT_LENGTHS);
        assert_eq!(
            Model::new(&descriptor, 4),
            Err(CodecError::ContextOutOfRange { context: 4, contexts: 4 })
        );

        let mut long = DEFAULT_LENGTHS;
        long[15] = 7;
        assert!(matches!(
            Model::new(&ModelDescriptor::new(long), 1),
            Err(CodecError::CodeLengthTooLong { symbol: 15, length: 7, .. })
        ));

        assert_eq!(
            Model::new(&ModelDescriptor::new([1; ALPHABET_SIZE]), 1),
            Err(CodecError::OversubscribedCode { context: 0 })
        );
        assert_eq!(
            Model::new(&ModelDescriptor::new([0; ALPHABET_SIZE]), 1),
            Err(CodecError::EmptyCode { context: 0 })
        );
    }

    #[test]
    fn test_expected_bits() {
        let model = Model::default();
        // 0 is bucket 0: 2-bit code, no extra bits
        assert_eq!(model.expected_bits(0, 0), 2);
        // 100 is bucket 7: 5-bit code + 8 extra bits
        assert_eq!(model.expected_bits(0, 100), 13);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_unknown_context_panics() {
        let _ = Model::default().encode_entry(1, 0);
    }

    #[test]
    #[should_panic(expected = "symbol 16 out of range")]
    fn test_unknown_symbol_panics() {
        let model = Model::with_contexts(2).unwrap();
        let _ = model.encode_entry(0, ALPHABET_SIZE);
    }
}
