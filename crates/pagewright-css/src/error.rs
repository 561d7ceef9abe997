//! Failure kinds for stylesheet tokenization and filtering.

use thiserror::Error;

/// Errors raised while tokenizing or filtering stylesheet text.
#[derive(Debug, Error)]
pub enum StyleError {
    /// A `{` whose matching `}` never arrives.
    #[error("unterminated block opened at offset {offset} (depth {depth} at end of input)")]
    UnterminatedBlock {
        /// Offset of the opening brace.
        offset: usize,
        /// Brace depth still open at end of input.
        depth: usize,
    },

    /// A `/*` with no closing `*/`.
    #[error("unterminated comment opened at offset {offset}")]
    UnterminatedComment {
        /// Offset of the `/*`.
        offset: usize,
    },

    /// Concatenated chunk text differs from the input. Always a tokenizer bug.
    #[error("tokenization is not lossless: {input_len} input bytes, {output_len} chunk bytes")]
    RoundTripMismatch {
        /// Input length in bytes.
        input_len: usize,
        /// Length of the concatenated chunks.
        output_len: usize,
    },

    /// The boundary that ends the section region is missing from the document.
    #[error("section boundary {boundary:?} not found")]
    BoundaryNotFound {
        /// The boundary text searched for.
        boundary: String,
    },

    /// An identifier or section-marker pattern failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl StyleError {
    /// Returns `true` when the error only means a boundary was absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::BoundaryNotFound { .. })
    }
}
