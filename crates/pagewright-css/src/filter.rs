//! Dead-rule filtering.
//!
//! A rule is dead when every identifier it references has been removed from the
//! document. Rules that reference no tracked identifier are never touched, and
//! rules that mention at least one live identifier are kept whole.

use std::collections::BTreeSet;

use regex::Regex;
use serde::Serialize;

use crate::error::StyleError;
use crate::tokenizer::{ChunkKind, StyleChunk, render, tokenize};

/// Extracts the tracked identifiers a piece of stylesheet text refers to.
pub trait IdExtractor {
    /// Identifiers referenced by `text`.
    fn extract(&self, text: &str) -> BTreeSet<String>;
}

impl<F> IdExtractor for F
where
    F: Fn(&str) -> BTreeSet<String>,
{
    fn extract(&self, text: &str) -> BTreeSet<String> {
        self(text)
    }
}

/// Finds identifiers of the form `<prefix>-<id>`, where `prefix` comes from a
/// fixed list of component prefixes.
///
/// The extracted identifier is the part after the prefix.
#[derive(Debug, Clone)]
pub struct ComponentIdExtractor {
    pattern: Regex,
}

impl ComponentIdExtractor {
    /// Component prefixes emitted by the page builder the tool targets.
    pub const PAGE_BUILDER_PREFIXES: &'static [&'static str] = &[
        "section",
        "row",
        "col",
        "heading",
        "sub-heading",
        "custom-code",
        "video",
        "paragraph",
        "image",
        "button",
        "c-button",
        "form",
        "bg-section",
        "cheading",
        "csub-heading",
        "cvideo",
        "cparagraph",
        "cimage",
        "cbutton",
    ];

    /// Minimum identifier length used with [`Self::page_builder`].
    pub const PAGE_BUILDER_MIN_LEN: usize = 6;

    /// Build an extractor for `prefixes`, requiring at least `min_len`
    /// identifier characters after the `-`.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::InvalidPattern`] if the combined pattern does not
    /// compile.
    pub fn new<S: AsRef<str>>(prefixes: &[S], min_len: usize) -> Result<Self, StyleError> {
        let mut ordered: Vec<&str> = prefixes.iter().map(AsRef::as_ref).collect();
        // Longest first so `sub-heading` wins over `heading` at the same offset.
        ordered.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        ordered.dedup();

        let alternatives = ordered
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            "(?:{alternatives})-([A-Za-z0-9_-]{{{},}})",
            min_len.max(1)
        ))?;
        Ok(Self { pattern })
    }

    /// The extractor for page-builder output.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn page_builder() -> Result<Self, StyleError> {
        Self::new(Self::PAGE_BUILDER_PREFIXES, Self::PAGE_BUILDER_MIN_LEN)
    }
}

impl IdExtractor for ComponentIdExtractor {
    fn extract(&self, text: &str) -> BTreeSet<String> {
        self.pattern
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Result of [`filter_dead`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterOutcome {
    /// Surviving chunks, in input order, annotated with `referenced_ids`.
    pub kept: Vec<StyleChunk>,
    /// Bytes removed, including those removed inside at-rule bodies.
    pub removed_bytes: usize,
    /// Number of rules removed.
    pub removed_chunks: usize,
}

impl FilterOutcome {
    /// Concatenated text of the surviving chunks.
    #[must_use]
    pub fn render(&self) -> String {
        render(&self.kept)
    }
}

/// Drop every rule whose referenced identifiers are all in `dead`.
///
/// Comments, `:root` blocks, and trailing text are always kept. A rule that
/// references no identifier is kept. Inside a surviving at-rule the nested rules
/// are filtered one level deep and the at-rule is rebuilt around the survivors.
///
/// # Errors
///
/// Returns a [`StyleError`] if an at-rule body cannot be re-tokenized.
pub fn filter_dead<E>(
    chunks: Vec<StyleChunk>,
    dead: &BTreeSet<String>,
    extractor: &E,
) -> Result<FilterOutcome, StyleError>
where
    E: IdExtractor + ?Sized,
{
    filter_level(chunks, dead, extractor, true)
}

fn filter_level<E>(
    chunks: Vec<StyleChunk>,
    dead: &BTreeSet<String>,
    extractor: &E,
    descend: bool,
) -> Result<FilterOutcome, StyleError>
where
    E: IdExtractor + ?Sized,
{
    let mut outcome = FilterOutcome::default();

    for mut chunk in chunks {
        if matches!(
            chunk.kind,
            ChunkKind::Comment | ChunkKind::Root | ChunkKind::Other
        ) {
            outcome.kept.push(chunk);
            continue;
        }

        let mut ids = extractor.extract(&chunk.text);
        if !ids.is_empty() && ids.is_subset(dead) {
            outcome.removed_bytes += chunk.text.len();
            outcome.removed_chunks += 1;
            continue;
        }

        if descend && chunk.kind == ChunkKind::AtRule && !ids.is_empty() {
            let mut rebuilt = None;
            if let Some((head, body, tail)) = chunk.block_parts() {
                let inner = filter_level(tokenize(body)?, dead, extractor, false)?;
                if inner.removed_chunks > 0 {
                    outcome.removed_bytes += inner.removed_bytes;
                    outcome.removed_chunks += inner.removed_chunks;
                    rebuilt = Some(format!("{head}{}{tail}", inner.render()));
                }
            }
            if let Some(text) = rebuilt {
                chunk.text = text;
                ids = extractor.extract(&chunk.text);
            }
        }

        chunk.referenced_ids = ids;
        outcome.kept.push(chunk);
    }

    Ok(outcome)
}
