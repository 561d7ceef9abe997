//! Failure kinds for identifier renaming.

use thiserror::Error;

/// Errors raised while building an identifier map or renaming.
#[derive(Debug, Error)]
pub enum RenameError {
    /// Two renames would produce the same text, or a rename target is itself
    /// renamed by another pair.
    #[error("identifier collision on {identifier:?}: {first:?} and {second:?} both claim it")]
    IdentifierCollision {
        /// The contested identifier.
        identifier: String,
        /// The first form that claims it.
        first: String,
        /// The second form that claims it.
        second: String,
    },

    /// An empty old or new identifier.
    #[error("empty identifier in pair {old:?} -> {new:?}")]
    EmptyIdentifier {
        /// Old side of the pair.
        old: String,
        /// New side of the pair.
        new: String,
    },

    /// The same old identifier appears twice in a map.
    #[error("identifier {old:?} is mapped more than once")]
    DuplicateIdentifier {
        /// The repeated identifier.
        old: String,
    },

    /// A derived prefix argument not of the form `BASE=DERIVED`.
    #[error("invalid derived prefix {input:?}: expected BASE=DERIVED with a non-empty DERIVED")]
    InvalidDerivedPrefix {
        /// The rejected argument.
        input: String,
    },

    /// The combined replacement pattern failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A mapping artifact could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
