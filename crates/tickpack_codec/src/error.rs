//! # Codec Error Types
//!
//! Errors raised while building a compression model.
//!
//! Stream operations never return errors: a writer and reader that disagree
//! on the schema is a programmer error and panics at the call site.

use thiserror::Error;

/// Errors that can occur while constructing a [`Model`](crate::Model).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The descriptor ended before a complete field could be read.
    #[error("descriptor truncated: needed {needed} bytes, {available} available")]
    Truncated {
        /// Bytes required to finish the current field.
        needed: usize,
        /// Bytes left in the descriptor.
        available: usize,
    },

    /// A descriptor declared an alphabet other than the bucket alphabet.
    #[error("alphabet size mismatch: expected {expected}, found {found}")]
    AlphabetSizeMismatch {
        /// The alphabet size this codec is built for.
        expected: usize,
        /// The alphabet size found in the descriptor.
        found: usize,
    },

    /// A symbol's code is longer than the decode tables can resolve.
    #[error("context {context}: symbol {symbol} has length {length}, max is {max}")]
    CodeLengthTooLong {
        /// Context holding the offending code.
        context: usize,
        /// Offending symbol.
        symbol: usize,
        /// Declared length.
        length: u8,
        /// Longest supported length.
        max: u8,
    },

    /// The code lengths of a context violate the Kraft inequality.
    #[error("context {context}: code lengths are oversubscribed")]
    OversubscribedCode {
        /// Context holding the invalid code.
        context: usize,
    },

    /// Every symbol of a context has length zero.
    #[error("context {context}: no symbol has a code")]
    EmptyCode {
        /// Context holding the empty code.
        context: usize,
    },

    /// An override addressed a context the model does not have.
    #[error("context {context} out of range for a model with {contexts} contexts")]
    ContextOutOfRange {
        /// Requested context id.
        context: usize,
        /// Number of contexts in the model.
        contexts: usize,
    },

    /// A model must have at least one context.
    #[error("a model needs at least one context")]
    NoContexts,

    /// Bytes left over after the last override.
    #[error("{count} trailing bytes after descriptor")]
    TrailingBytes {
        /// Number of unparsed bytes.
        count: usize,
    },

    /// Invalid TOML configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A model or statistics file could not be read or written.
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<toml::de::Error> for CodecError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for model construction.
pub type CodecResult<T> = Result<T, CodecError>;
