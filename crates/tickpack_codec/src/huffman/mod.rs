//! # Huffman Construction
//!
//! Builders used when a [`Model`](crate::Model) is created. None of this runs
//! on the per-packet path.
//!
//! ```text
//! frequencies ──► lengths ──► canonical ──► decode_table
//!                 (package     (reversed     (2^max slots
//!                  merge)       codes)        per context)
//! ```

pub mod arena;
pub mod canonical;
pub mod decode_table;
pub mod lengths;

pub use arena::{Node, NodeArena, NodeId};
pub use canonical::{canonical_codes, reverse_bits};
pub use decode_table::{build_decode_table, pack_entry, unpack_entry};
pub use lengths::{build_code_lengths, kraft_sum, KRAFT_ONE, MAX_ALPHABET, MAX_SUPPORTED_LENGTH};
