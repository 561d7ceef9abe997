//! Lossless block-level stylesheet tokenizer.
//!
//! The tokenizer only finds construct boundaries; it never interprets
//! declarations. Concatenating the chunks it returns yields the input.

mod chunk;
mod scanner;

pub use chunk::{ChunkKind, StyleChunk, render};
pub use scanner::{StyleTokenizer, tokenize};
