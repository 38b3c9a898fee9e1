use crate::der::TagClass;
use thiserror::Error;

/// Main error type for DER parsing and encoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerError {
    #[error("Unsupported tag class: {0}")]
    UnsupportedTagClass(TagClass),

    #[error("Unknown universal tag number: {0}")]
    UnknownUniversalTag(u32),

    #[error("High tag number form (tag number > 30) is not supported")]
    HighTagNumber,

    #[error("Invalid path syntax at segment '{0}'")]
    InvalidPathSyntax(String),

    #[error("Negative child index in segment '{0}'")]
    NegativeIndex(String),

    #[error("Cannot pop a node from an empty path")]
    EmptyPath,

    #[error("Invalid tag name: {0}")]
    InvalidTagName(String),

    #[error("Indefinite length encoding not supported")]
    IndefiniteLength,

    #[error("Length encoding too large: {0} bytes")]
    LengthOverflow(usize),

    #[error("Buffer exhausted: need {needed} bytes, have {available}")]
    OutOfBounds { needed: usize, available: usize },

    #[error("Maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type alias for DER operations
pub type DerResult<T> = Result<T, DerError>;
