//! # Symbol Statistics
//!
//! Captures how often each bucket symbol is written per context, so a model
//! can be retrained on real traffic.
//!
//! ```rust,ignore
//! let mut recorder = StatisticsRecorder::new(&model);
//! replication.serialize_tick(&mut recorder);     // same calls as a real packet
//! let tuned = Model::from_statistics(recorder.statistics())?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::descriptor::{ModelDescriptor, ALPHABET_SIZE, DEFAULT_LENGTHS};
use super::{Model, MAX_CODE_LENGTH};
use crate::bucket::classify_bucket;
use crate::error::{CodecError, CodecResult};
use crate::huffman::build_code_lengths;
use crate::stream::{fits, StreamWriter, MAX_RAW_BITS};

/// Per-context bucket symbol histograms.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolStatistics {
    /// `counts[context][symbol]`.
    counts: Vec<[u64; ALPHABET_SIZE]>,
}

impl SymbolStatistics {
    /// Creates empty histograms for `contexts` contexts.
    #[must_use]
    pub fn new(contexts: usize) -> Self {
        Self {
            counts: vec![[0; ALPHABET_SIZE]; contexts],
        }
    }

    /// Number of contexts tracked.
    #[must_use]
    pub fn contexts(&self) -> usize {
        self.counts.len()
    }

    /// Counts one occurrence of `symbol` in `context`.
    ///
    /// # Panics
    ///
    /// Panics if `context` is not tracked or `symbol >= 16`.
    #[inline]
    pub fn record_symbol(&mut self, context: usize, symbol: usize) {
        assert!(context < self.counts.len(), "context {context} out of range ({})", self.counts.len());
        self.counts[context][symbol] += 1;
    }

    /// Counts the bucket `value` falls into.
    #[inline]
    pub fn record_uint(&mut self, context: usize, value: u32) {
        self.record_symbol(context, classify_bucket(value));
    }

    /// Histogram of `context`.
    #[must_use]
    pub fn frequencies(&self, context: usize) -> &[u64; ALPHABET_SIZE] {
        &self.counts[context]
    }

    /// Samples recorded in `context`.
    #[must_use]
    pub fn total(&self, context: usize) -> u64 {
        self.counts[context].iter().sum()
    }

    /// Adds `other` into `self`, growing to the larger context count.
    pub fn merge(&mut self, other: &Self) {
        if other.counts.len() > self.counts.len() {
            self.counts.resize(other.counts.len(), [0; ALPHABET_SIZE]);
        }
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
    }

    /// Builds a descriptor with one override per context that has samples.
    ///
    /// Every symbol is counted once more than observed, so buckets never
    /// seen during capture stay encodable. Empty contexts keep the default
    /// lengths.
    ///
    /// # Panics
    ///
    /// Panics if `max_code_length` cannot give 16 symbols a code (< 4), or
    /// if there are more than 65536 contexts.
    #[must_use]
    pub fn to_descriptor(&self, max_code_length: u8) -> ModelDescriptor {
        assert!(self.counts.len() <= 1 << 16, "too many contexts");

        let mut descriptor = ModelDescriptor::new(DEFAULT_LENGTHS);
        for (context, counts) in self.counts.iter().enumerate() {
            if counts.iter().all(|&c| c == 0) {
                continue;
            }
            let smoothed: Vec<u64> = counts.iter().map(|&c| c + 1).collect();
            let mut lengths = [0u8; ALPHABET_SIZE];
            lengths.copy_from_slice(&build_code_lengths(&smoothed, max_code_length));
            descriptor = descriptor.with_override(context as u16, lengths);
        }

        tracing::debug!(
            contexts = self.counts.len(),
            overrides = descriptor.overrides.len(),
            "descriptor rebuilt from statistics"
        );
        descriptor
    }

    /// Parses statistics saved with [`to_toml_string`](Self::to_toml_string).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Config`] on malformed TOML.
    pub fn from_toml_str(text: &str) -> CodecResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serializes the histograms as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Config`] if a count exceeds the TOML integer range.
    pub fn to_toml_string(&self) -> CodecResult<String> {
        toml::to_string(self).map_err(|e| CodecError::Config(e.to_string()))
    }

    /// Loads statistics from a TOML file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> CodecResult<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

impl Model {
    /// Builds a model trained on `statistics`, one context per tracked
    /// context.
    ///
    /// # Errors
    ///
    /// Fails if `statistics` tracks no context.
    pub fn from_statistics(statistics: &SymbolStatistics) -> CodecResult<Self> {
        Self::new(&statistics.to_descriptor(MAX_CODE_LENGTH), statistics.contexts())
    }
}

/// Stream writer that records symbols instead of emitting bytes.
///
/// Runs the replication layer's normal serialization to gather training
/// data, and tracks the bits `model` would have spent on it.
pub struct StatisticsRecorder<'a> {
    model: &'a Model,
    statistics: SymbolStatistics,
    bits: usize,
}

impl<'a> StatisticsRecorder<'a> {
    /// Creates a recorder with one histogram per context of `model`.
    #[must_use]
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            statistics: SymbolStatistics::new(model.contexts()),
            bits: 0,
        }
    }

    /// Histograms recorded so far.
    #[must_use]
    pub fn statistics(&self) -> &SymbolStatistics {
        &self.statistics
    }

    /// Consumes the recorder, returning its histograms.
    #[must_use]
    pub fn into_statistics(self) -> SymbolStatistics {
        self.statistics
    }

    fn align(&mut self) {
        self.bits = self.bits.div_ceil(8) * 8;
    }
}

impl StreamWriter for StatisticsRecorder<'_> {
    fn write_raw_bits(&mut self, value: u32, bits: u32) {
        assert!(bits <= MAX_RAW_BITS, "{bits} raw bits");
        debug_assert!(fits(value, bits), "value {value} does not fit in {bits} bits");
        self.bits += bits as usize;
    }

    fn write_raw_bytes(&mut self, bytes: &[u8]) {
        self.align();
        self.bits += bytes.len() * 8;
    }

    fn write_packed_nibble(&mut self, value: u8, context: usize) {
        assert!(value < 16, "nibble {value}");
        let symbol = usize::from(value);
        self.statistics.record_symbol(context, symbol);
        self.bits += usize::from(self.model.code_length(context, symbol));
    }

    fn write_packed_uint(&mut self, value: u32, context: usize) {
        self.statistics.record_uint(context, value);
        self.bits += self.model.expected_bits(context, value) as usize;
    }

    fn bit_position(&self) -> usize {
        self.bits
    }

    fn flush(&mut self) -> usize {
        self.align();
        self.bits / 8
    }
}
