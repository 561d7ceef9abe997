//! Block-level stylesheet handling.
//!
//! # Scope
//!
//! This crate implements:
//! - **Style block tokenizer** - split stylesheet text into comments, `:root`
//!   blocks, at-rules, and rules without losing a byte
//! - **Dead rule filter** - drop rules whose referenced identifiers have all been
//!   removed from the document
//! - **Style sections** - prune marker-delimited stylesheet sections embedded in a
//!   page
//! - **Cleanup** - drop empty rule bodies and `@font-face` blocks for unused
//!   families or scripts
//!
//! Declarations are never parsed. Identifier extraction is lexical: see
//! [`IdExtractor`].

/// Empty rules, font pruning, and embedded `<style>` rewriting.
pub mod cleanup;
/// Error type for stylesheet operations.
pub mod error;
/// Dead-rule filtering and identifier extraction.
pub mod filter;
/// Marker-delimited stylesheet sections.
pub mod sections;
/// Lossless block-level tokenizer.
pub mod tokenizer;

pub use cleanup::{
    FontFaceOutcome, FontPolicy, drop_empty_rules, prune_font_faces, rewrite_style_elements,
};
pub use error::StyleError;
pub use filter::{ComponentIdExtractor, FilterOutcome, IdExtractor, filter_dead};
pub use sections::{
    DEFAULT_SECTION_BOUNDARY, DEFAULT_SECTION_MARKER, PruneReport, prune_style_sections,
};
pub use tokenizer::{ChunkKind, StyleChunk, StyleTokenizer, render, tokenize};
