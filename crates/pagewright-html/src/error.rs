//! Failure kinds for markup editing.

use thiserror::Error;

/// Errors raised while locating or editing elements in markup text.
///
/// Structural variants (`UnbalancedStructure`, `InvalidOffset`, `InvalidSpan`)
/// are never recoverable for the current operation. Not-found variants
/// (`MarkerNotFound`, `EnclosingTagNotFound`) are surfaced to batch passes, which
/// consult their `MissingPolicy`.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// No close token brought the nesting depth back to zero before the end of
    /// the document.
    #[error("unbalanced structure: no matching close token after offset {start} (depth {depth} at end of document)")]
    UnbalancedStructure {
        /// Offset the scan started from.
        start: usize,
        /// Nesting depth still open when the document ended.
        depth: usize,
    },

    /// The marker text does not occur in the document.
    #[error("marker not found: {marker:?}")]
    MarkerNotFound {
        /// The marker that was searched for.
        marker: String,
    },

    /// The marker occurs, but no opening token precedes it.
    #[error("no enclosing opening tag before marker {marker:?} at offset {offset}")]
    EnclosingTagNotFound {
        /// The marker that was found.
        marker: String,
        /// Byte offset of the marker.
        offset: usize,
    },

    /// An offset lies past the end of the document or inside a UTF-8 sequence.
    #[error("offset {offset} is not a valid position in a document of {len} bytes")]
    InvalidOffset {
        /// The rejected offset.
        offset: usize,
        /// Document length in bytes.
        len: usize,
    },

    /// A span is inverted, out of bounds, or splits a UTF-8 sequence.
    #[error("span {start}..{end} is not valid for a document of {len} bytes")]
    InvalidSpan {
        /// Span start.
        start: usize,
        /// Span end.
        end: usize,
        /// Document length in bytes.
        len: usize,
    },

    /// A tag pattern matches the empty string, which would never advance a scan.
    #[error("tag pattern {pattern:?} matches the empty string")]
    EmptyPattern {
        /// Source of the rejected pattern.
        pattern: String,
    },

    /// A tag pattern failed to compile.
    #[error("invalid tag pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl MarkupError {
    /// Returns `true` for not-found conditions that a caller may choose to skip.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MarkerNotFound { .. } | Self::EnclosingTagNotFound { .. }
        )
    }
}
