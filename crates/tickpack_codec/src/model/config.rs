//! # Model Configuration
//!
//! Text form of a model, loaded once at startup:
//!
//! ```toml
//! contexts = 4
//! default_lengths = [2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 6, 6, 6]
//!
//! [[override]]
//! context = 2
//! lengths = [1, 2, 5, 5, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6]
//!
//! [[override]]
//! context = 3
//! frequencies = [900, 50, 20, 10, 5, 5, 3, 2, 1, 1, 1, 1, 1, 1, 1, 1]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::descriptor::{ModelDescriptor, ALPHABET_SIZE, DEFAULT_LENGTHS};
use super::{Model, MAX_CODE_LENGTH};
use crate::error::{CodecError, CodecResult};
use crate::huffman::build_code_lengths;

/// Model settings as written in a TOML file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of contexts (at least 1).
    pub contexts: usize,
    /// Lengths shared by contexts without an override. Built-in lengths if
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_lengths: Option<Vec<u8>>,
    /// Per-context replacements.
    #[serde(default, rename = "override", skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<OverrideConfig>,
}

/// One `[[override]]` table. Exactly one of `lengths` and `frequencies`
/// must be set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideConfig {
    /// Context to override.
    pub context: u16,
    /// Explicit code lengths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lengths: Option<Vec<u8>>,
    /// Symbol frequencies to build lengths from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequencies: Option<Vec<u64>>,
}

impl ModelConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Config`] on malformed TOML.
    pub fn from_toml_str(text: &str) -> CodecResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a TOML file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> CodecResult<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Resolves lengths and frequencies into a descriptor.
    ///
    /// # Errors
    ///
    /// Fails if a list does not hold 16 entries, an override sets both or
    /// neither of `lengths` and `frequencies`, or frequencies are all zero.
    pub fn to_descriptor(&self) -> CodecResult<ModelDescriptor> {
        let default_lengths = match &self.default_lengths {
            Some(lengths) => to_array(lengths, "default_lengths")?,
            None => DEFAULT_LENGTHS,
        };

        let mut descriptor = ModelDescriptor::new(default_lengths);
        for o in &self.overrides {
            let lengths = match (&o.lengths, &o.frequencies) {
                (Some(lengths), None) => to_array(lengths, "lengths")?,
                (None, Some(frequencies)) => {
                    let frequencies: [u64; ALPHABET_SIZE] = to_array(frequencies, "frequencies")?;
                    if frequencies.iter().all(|&f| f == 0) {
                        return Err(CodecError::Config(format!(
                            "override for context {}: all frequencies are zero",
                            o.context
                        )));
                    }
                    to_array(&build_code_lengths(&frequencies, MAX_CODE_LENGTH), "lengths")?
                }
                _ => {
                    return Err(CodecError::Config(format!(
                        "override for context {}: set exactly one of `lengths` and `frequencies`",
                        o.context
                    )))
                }
            };
            descriptor = descriptor.with_override(o.context, lengths);
        }
        Ok(descriptor)
    }
}

impl Model {
    /// Builds a model from a parsed configuration.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or invalid code lengths.
    pub fn from_config(config: &ModelConfig) -> CodecResult<Self> {
        Self::new(&config.to_descriptor()?, config.contexts)
    }
}

fn to_array<T: Copy + Default>(values: &[T], field: &str) -> CodecResult<[T; ALPHABET_SIZE]> {
    if values.len() != ALPHABET_SIZE {
        return Err(CodecError::Config(format!(
            "`{field}` needs {ALPHABET_SIZE} entries, found {}",
            values.len()
        )));
    }
    let mut array = [T::default(); ALPHABET_SIZE];
    array.copy_from_slice(values);
    Ok(array)
}
