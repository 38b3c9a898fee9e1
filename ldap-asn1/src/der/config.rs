//! Parser configuration

use serde::{Deserialize, Serialize};

/// Default maximum nesting depth of a parse
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Handling of the BER indefinite length form (`0x80`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndefiniteLength {
    /// Fail the parse with `IndefiniteLength`
    #[default]
    Reject,
    /// Read the value as zero bytes long
    ///
    /// The contents are then visited as following siblings, and an
    /// end-of-contents marker (`00 00`) fails as universal tag 0.
    TreatAsEmpty,
}

/// Configuration for [`DerParser`](super::DerParser)
///
/// # Default Settings
/// - Max depth: 64
/// - Indefinite length: rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum number of nested tags on the path cursor
    pub max_depth: usize,
    /// Handling of indefinite length encodings
    pub indefinite_length: IndefiniteLength,
}

impl ParserConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum nesting depth
    ///
    /// # Returns
    /// Self for method chaining
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set indefinite length handling
    ///
    /// # Returns
    /// Self for method chaining
    pub fn indefinite_length(mut self, policy: IndefiniteLength) -> Self {
        self.indefinite_length = policy;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            indefinite_length: IndefiniteLength::Reject,
        }
    }
}
