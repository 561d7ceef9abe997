use std::collections::BTreeSet;

use serde::Serialize;
use strum_macros::Display;

/// The kind of a top-level stylesheet construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ChunkKind {
    /// `/* ... */`, delimiters included.
    Comment,
    /// `:root { ... }` custom-property block.
    Root,
    /// `@name ... { ... }` with any nested rules, or `@name ...;`.
    AtRule,
    /// `selector { ... }`.
    Rule,
    /// Trailing text that is not a complete construct (usually whitespace).
    Other,
}

/// One top-level construct of a stylesheet.
///
/// Whitespace preceding a construct belongs to it, so concatenating every chunk's
/// `text` in order reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleChunk {
    /// What the chunk is.
    pub kind: ChunkKind,
    /// The chunk's exact source text.
    pub text: String,
    /// Identifiers the chunk refers to.
    ///
    /// Empty until a filter annotates the chunk; a lexical best effort, never
    /// authoritative.
    pub referenced_ids: BTreeSet<String>,
}

impl StyleChunk {
    /// Create an unannotated chunk.
    #[must_use]
    pub fn new(kind: ChunkKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            referenced_ids: BTreeSet::new(),
        }
    }

    /// Returns `true` for chunks that end in a brace-delimited body.
    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(self.kind, ChunkKind::Root | ChunkKind::AtRule | ChunkKind::Rule)
            && self.text.trim_end().ends_with('}')
    }

    /// Split a block chunk into its prelude (through `{`), body, and closing `}`.
    ///
    /// Returns `None` for comments, trailing text, and statement at-rules such as
    /// `@import url(x);`.
    #[must_use]
    pub fn block_parts(&self) -> Option<(&str, &str, &str)> {
        if !self.is_block() {
            return None;
        }
        let open = self.text.find('{')?;
        let close = self.text.rfind('}')?;
        (open < close).then(|| {
            (
                &self.text[..=open],
                &self.text[open + 1..close],
                &self.text[close..],
            )
        })
    }
}

/// Concatenate chunk texts in order.
#[must_use]
pub fn render(chunks: &[StyleChunk]) -> String {
    chunks.iter().map(|c| c.text.as_str()).collect()
}
