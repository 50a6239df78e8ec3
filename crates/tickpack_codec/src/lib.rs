//! # TICKPACK Codec
//!
//! State compression for per-tick snapshot and delta packets.
//!
//! ## Architecture
//!
//! - **Bucket table**: 16 magnitude classes, each a symbol plus fixed extra bits
//! - **Model**: canonical, length-limited Huffman tables per field context
//! - **Streams**: a compressed and a raw implementation of one read/write protocol
//!
//! The replication layer picks which fields to send and which context each
//! field uses; this crate only turns those calls into bits and back.
//!
//! ## Performance Guarantees
//!
//! - No allocation on the stream path (buffers belong to the caller)
//! - O(1) symbol decode through a flat 64-entry table per context
//! - Models are immutable and shared by any number of streams
//!
//! ## Example
//!
//! ```rust
//! use tickpack_codec::{HuffmanReader, HuffmanWriter, Model, StreamReader, StreamWriter};
//!
//! let model = Model::default();
//! let mut packet = [0u8; 64];
//!
//! let mut writer = HuffmanWriter::new(&model, &mut packet);
//! writer.write_packed_uint(100, 0);
//! writer.write_packed_int_delta(95, 100, 0);
//! let len = writer.flush();
//!
//! let mut reader = HuffmanReader::new(&model, &packet[..len]);
//! assert_eq!(reader.read_packed_uint(0), 100);
//! assert_eq!(reader.read_packed_int_delta(100, 0), 95);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]

pub mod bucket;
pub mod error;
pub mod huffman;
pub mod model;
pub mod stream;

// Re-exports for convenience
pub use bucket::{classify_bucket, BUCKET_COUNT, BUCKET_OFFSETS, BUCKET_SIZES};
pub use error::{CodecError, CodecResult};
pub use huffman::build_code_lengths;
pub use model::{
    Model, ModelConfig, ModelDescriptor, StatisticsRecorder, SymbolStatistics, ALPHABET_SIZE,
    DEFAULT_CONTEXTS, DEFAULT_DESCRIPTOR, MAX_CODE_LENGTH,
};
pub use stream::{HuffmanReader, HuffmanWriter, RawReader, RawWriter, StreamReader, StreamWriter};

/// Largest packet a stream is expected to fill (bytes, below a 1500-byte MTU).
pub const MAX_PACKET_SIZE: usize = 1200;
