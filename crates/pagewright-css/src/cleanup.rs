//! Stylesheet cleanup after export: empty rule bodies, unused `@font-face`
//! blocks, and `<style>` elements embedded in a page.

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::error::StyleError;
use crate::filter::FilterOutcome;
use crate::tokenizer::{ChunkKind, StyleChunk, render, tokenize};

/// Drop every rule whose body holds nothing but whitespace.
///
/// At-rule bodies are cleaned one level deep, and an at-rule block left with an
/// empty body is dropped as well. `:root` blocks, comments, and statement
/// at-rules are kept.
///
/// # Errors
///
/// Returns a [`StyleError`] if an at-rule body cannot be re-tokenized.
pub fn drop_empty_rules(chunks: Vec<StyleChunk>) -> Result<FilterOutcome, StyleError> {
    drop_empty_level(chunks, true)
}

fn drop_empty_level(chunks: Vec<StyleChunk>, descend: bool) -> Result<FilterOutcome, StyleError> {
    let mut outcome = FilterOutcome::default();

    for mut chunk in chunks {
        if !matches!(chunk.kind, ChunkKind::Rule | ChunkKind::AtRule) {
            outcome.kept.push(chunk);
            continue;
        }
        let Some((head, body, tail)) = chunk.block_parts() else {
            outcome.kept.push(chunk);
            continue;
        };

        if body.trim().is_empty() {
            outcome.removed_bytes += chunk.text.len();
            outcome.removed_chunks += 1;
            continue;
        }

        if descend && chunk.kind == ChunkKind::AtRule && body.contains('{') {
            let inner = drop_empty_level(tokenize(body)?, false)?;
            if inner.removed_chunks > 0 {
                let inner_text = inner.render();
                outcome.removed_chunks += inner.removed_chunks;
                if inner_text.trim().is_empty() {
                    outcome.removed_bytes += chunk.text.len();
                    outcome.removed_chunks += 1;
                    continue;
                }
                outcome.removed_bytes += inner.removed_bytes;
                chunk.text = format!("{head}{inner_text}{tail}");
            }
        }
        outcome.kept.push(chunk);
    }

    Ok(outcome)
}

/// Which `@font-face` blocks survive [`prune_font_faces`].
#[derive(Debug, Clone, Default)]
pub struct FontPolicy {
    /// Families to keep. `None` keeps every family.
    pub families: Option<BTreeSet<String>>,
    /// Unicode ranges to keep. `None` keeps every range.
    ///
    /// A block is kept when one of its declared ranges contains one of these
    /// entries, or starts inside `U+0000-00FF`.
    pub unicode_ranges: Option<Vec<String>>,
}

impl FontPolicy {
    /// Latin script blocks plus the punctuation and symbol ranges an English
    /// page needs.
    pub const LATIN_UNICODE_RANGES: &'static [&'static str] = &[
        "U+0000-00FF",
        "U+0100-024F",
        "U+0250-02AF",
        "U+1E00-1EFF",
        "U+2000-206F",
        "U+2070-209F",
        "U+20A0-20CF",
        "U+2100-214F",
        "U+2200-22FF",
        "U+25A0-25FF",
        "U+FB00-FB4F",
        "U+FEFF",
        "U+FFFD",
    ];

    /// Keep only `families`.
    #[must_use]
    pub fn keep_families<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.families = Some(families.into_iter().map(Into::into).collect());
        self
    }

    /// Keep only blocks covering [`Self::LATIN_UNICODE_RANGES`].
    #[must_use]
    pub fn latin_only(mut self) -> Self {
        self.unicode_ranges = Some(
            Self::LATIN_UNICODE_RANGES
                .iter()
                .map(ToString::to_string)
                .collect(),
        );
        self
    }

    /// Returns `true` if the policy removes nothing.
    #[must_use]
    pub const fn is_permissive(&self) -> bool {
        self.families.is_none() && self.unicode_ranges.is_none()
    }

    fn keeps_family(&self, family: &str) -> bool {
        self.families.as_ref().is_none_or(|keep| keep.contains(family))
    }

    fn keeps_ranges(&self, declared: &str) -> bool {
        let Some(keep) = &self.unicode_ranges else {
            return true;
        };
        declared
            .split(',')
            .map(|r| r.trim().to_ascii_uppercase())
            .any(|r| r.starts_with("U+00") || keep.iter().any(|k| r.contains(k.as_str())))
    }
}

/// Result of [`prune_font_faces`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct FontFaceOutcome {
    /// Surviving chunks, in input order.
    pub kept: Vec<StyleChunk>,
    /// `@font-face` blocks kept.
    pub kept_blocks: usize,
    /// Families whose blocks were all dropped.
    pub removed_families: BTreeSet<String>,
    /// Blocks dropped because their family is not kept.
    pub family_blocks: usize,
    /// Blocks of kept families dropped for their unicode range.
    pub range_blocks: usize,
    /// Bytes removed, labelling comments included.
    pub removed_bytes: usize,
}

impl FontFaceOutcome {
    /// Concatenated text of the surviving chunks.
    #[must_use]
    pub fn render(&self) -> String {
        render(&self.kept)
    }
}

impl fmt::Display for FontFaceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kept {} @font-face block(s), dropped {} for unused families and {} for unicode range",
            self.kept_blocks, self.family_blocks, self.range_blocks
        )
    }
}

fn is_font_face(chunk: &StyleChunk) -> bool {
    chunk.kind == ChunkKind::AtRule
        && chunk
            .text
            .trim_start()
            .get(..10)
            .is_some_and(|name| name.eq_ignore_ascii_case("@font-face"))
}

/// Drop top-level `@font-face` blocks that `policy` does not keep.
///
/// A block without a `font-family` is kept; one without a `unicode-range` is
/// judged by family only. A single-line comment directly in front of a dropped
/// block (the subset label font services emit) goes with it.
///
/// # Errors
///
/// Returns [`StyleError::InvalidPattern`] if a declaration pattern fails to
/// compile.
pub fn prune_font_faces(
    chunks: Vec<StyleChunk>,
    policy: &FontPolicy,
) -> Result<FontFaceOutcome, StyleError> {
    let family_decl = Regex::new(r#"(?i)font-family\s*:\s*(?:'([^']*)'|"([^"]*)"|([^;}]*))"#)?;
    let range_decl = Regex::new(r"(?i)unicode-range\s*:\s*([^;}]*)")?;

    let mut outcome = FontFaceOutcome::default();
    let mut kept_families = BTreeSet::new();

    for chunk in chunks {
        if !is_font_face(&chunk) {
            outcome.kept.push(chunk);
            continue;
        }
        let family = family_decl
            .captures(&chunk.text)
            .and_then(|c| c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3)))
            .map(|m| m.as_str().trim().to_string());
        let Some(family) = family else {
            outcome.kept_blocks += 1;
            outcome.kept.push(chunk);
            continue;
        };

        let keeps_family = policy.keeps_family(&family);
        let keeps_range = range_decl
            .captures(&chunk.text)
            .is_none_or(|c| policy.keeps_ranges(&c[1]));
        if keeps_family && keeps_range {
            outcome.kept_blocks += 1;
            let _ = kept_families.insert(family);
            outcome.kept.push(chunk);
            continue;
        }
        if keeps_family {
            outcome.range_blocks += 1;
        } else {
            outcome.family_blocks += 1;
            let _ = outcome.removed_families.insert(family);
        }

        outcome.removed_bytes += chunk.text.len();
        let label = outcome
            .kept
            .last()
            .filter(|prev| prev.kind == ChunkKind::Comment && !prev.text.trim().contains('\n'))
            .map(|prev| prev.text.len());
        if let Some(len) = label {
            outcome.removed_bytes += len;
            let _ = outcome.kept.pop();
        }
    }

    outcome
        .removed_families
        .retain(|family| !kept_families.contains(family));
    Ok(outcome)
}

/// Apply `edit` to the contents of every `<style>` element in `document`.
///
/// Returns the rewritten document and the number of elements visited. An
/// unclosed `<style>` is left alone.
///
/// # Errors
///
/// Returns the first error `edit` raises, or [`StyleError::InvalidPattern`].
pub fn rewrite_style_elements<F>(document: &str, mut edit: F) -> Result<(String, usize), StyleError>
where
    F: FnMut(&str) -> Result<String, StyleError>,
{
    let element = Regex::new(r"(?is)<style\b[^>]*>(.*?)</style\s*>")?;
    let mut out = String::with_capacity(document.len());
    let mut cursor = 0;
    let mut visited = 0;

    for caps in element.captures_iter(document) {
        let Some(body) = caps.get(1) else {
            continue;
        };
        out.push_str(&document[cursor..body.start()]);
        out.push_str(&edit(body.as_str())?);
        cursor = body.end();
        visited += 1;
    }
    out.push_str(&document[cursor..]);
    Ok((out, visited))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_face_detection_ignores_case_and_leading_space() {
        let chunks = tokenize("\n@FONT-FACE{font-family:x}@media print{}").unwrap();
        assert!(is_font_face(&chunks[0]));
        assert!(!is_font_face(&chunks[1]));
    }

    #[test]
    fn test_ranges_keep_basic_latin_prefix() {
        let policy = FontPolicy::default().latin_only();
        assert!(policy.keeps_ranges("U+0020-007F"));
        assert!(policy.keeps_ranges("U+0460-052F, U+1E00-1EFF"));
        assert!(!policy.keeps_ranges("U+0370-03FF"));
        assert!(FontPolicy::default().keeps_ranges("U+0370-03FF"));
    }
}
