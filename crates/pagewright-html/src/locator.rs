//! Depth-tracking location of matching close tags.
//!
//! Markup is treated as flat text. Only tokens of one element kind are counted;
//! every other tag, comment, or text run is skipped, so nested elements of a
//! *different* kind never perturb the depth.

use regex::{Match, Regex};

use crate::error::MarkupError;

/// An open/close token pair for one element kind.
#[derive(Debug, Clone)]
pub struct TagPattern {
    open: Regex,
    close: Regex,
}

impl TagPattern {
    /// Build a pattern pair from regex sources.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::InvalidPattern`] if either source fails to compile and
    /// [`MarkupError::EmptyPattern`] if either matches the empty string.
    pub fn new(open: &str, close: &str) -> Result<Self, MarkupError> {
        Self::from_regexes(Regex::new(open)?, Regex::new(close)?)
    }

    /// Build a pattern pair from compiled regexes.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::EmptyPattern`] if either regex matches the empty string.
    pub fn from_regexes(open: Regex, close: Regex) -> Result<Self, MarkupError> {
        for re in [&open, &close] {
            if re.is_match("") {
                return Err(MarkupError::EmptyPattern {
                    pattern: re.as_str().to_string(),
                });
            }
        }
        Ok(Self { open, close })
    }

    /// The pattern pair for a named element: `<name` followed by whitespace or `>`,
    /// and `</name>`. Matching is ASCII case-insensitive, so `<div` never matches
    /// `<divider`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::InvalidPattern`] only if the escaped name produces a
    /// pattern the regex engine rejects (for instance, one exceeding its size limit).
    pub fn element(name: &str) -> Result<Self, MarkupError> {
        let name = regex::escape(name);
        Self::new(&format!(r"(?i)<{name}[\s>]"), &format!(r"(?i)</{name}\s*>"))
    }

    /// The opening-token regex.
    #[must_use]
    pub const fn open(&self) -> &Regex {
        &self.open
    }

    /// The closing-token regex.
    #[must_use]
    pub const fn close(&self) -> &Regex {
        &self.close
    }

    /// Start offsets of every opening token that begins at or before `offset`,
    /// nearest first.
    #[must_use]
    pub fn opens_before(&self, document: &str, offset: usize) -> Vec<usize> {
        let mut starts: Vec<usize> = self
            .open
            .find_iter(document)
            .take_while(|m| m.start() <= offset)
            .map(|m| m.start())
            .collect();
        starts.reverse();
        starts
    }

    /// Net depth change across `text`: opens minus closes.
    ///
    /// A located element span always has a net depth of zero.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn net_depth(&self, text: &str) -> isize {
        self.open.find_iter(text).count() as isize - self.close.find_iter(text).count() as isize
    }
}

/// The next counted token in a scan.
#[derive(Debug, Clone, Copy)]
enum Token<'h> {
    Open(Match<'h>),
    Close(Match<'h>),
}

/// Find the offset just past the close token that matches the first open token at
/// or after `start`.
///
/// Depth starts at zero, each open token increments it, and each close token
/// decrements it; the scan ends when depth returns to zero after at least one
/// open. Close tokens seen before the first open belong to an element enclosing
/// `start` and are ignored.
///
/// # Errors
///
/// - [`MarkupError::InvalidOffset`] if `start` is past the end or not on a char boundary.
/// - [`MarkupError::UnbalancedStructure`] if the document ends before depth returns to zero.
/// - [`MarkupError::EmptyPattern`] if a pattern produces an empty match mid-scan.
pub fn locate_matching_close(
    document: &str,
    start: usize,
    pattern: &TagPattern,
) -> Result<usize, MarkupError> {
    check_offset(document, start)?;

    let mut depth = 0usize;
    let mut next_open = pattern.open.find_at(document, start);
    let mut next_close = pattern.close.find_at(document, start);

    loop {
        let token = match (next_open, next_close) {
            (None, None) => return Err(MarkupError::UnbalancedStructure { start, depth }),
            (Some(open), Some(close)) if open.start() < close.start() => Token::Open(open),
            (_, Some(close)) => Token::Close(close),
            (Some(open), None) => Token::Open(open),
        };

        let pos = match token {
            Token::Open(open) => {
                reject_empty(open, &pattern.open)?;
                depth += 1;
                open.end()
            }
            Token::Close(close) => {
                reject_empty(close, &pattern.close)?;
                if depth == 1 {
                    return Ok(close.end());
                }
                // Stray close before any open: depth stays at zero.
                depth = depth.saturating_sub(1);
                close.end()
            }
        };

        if next_open.is_some_and(|m| m.start() < pos) {
            next_open = pattern.open.find_at(document, pos);
        }
        if next_close.is_some_and(|m| m.start() < pos) {
            next_close = pattern.close.find_at(document, pos);
        }
    }
}

/// Validate that `offset` is a usable position in `document`.
pub(crate) fn check_offset(document: &str, offset: usize) -> Result<(), MarkupError> {
    if offset > document.len() || !document.is_char_boundary(offset) {
        return Err(MarkupError::InvalidOffset {
            offset,
            len: document.len(),
        });
    }
    Ok(())
}

fn reject_empty(m: Match<'_>, re: &Regex) -> Result<(), MarkupError> {
    if m.is_empty() {
        return Err(MarkupError::EmptyPattern {
            pattern: re.as_str().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn div() -> TagPattern {
        TagPattern::element("div").unwrap()
    }

    #[test]
    fn test_element_pattern_ignores_longer_tag_names() {
        let pattern = div();
        assert!(!pattern.open().is_match("<divider>"));
        assert!(pattern.open().is_match("<DIV class=\"x\">"));
        assert!(pattern.close().is_match("</div >"));
    }

    #[test]
    fn test_rejects_empty_matching_patterns() {
        let err = TagPattern::new("a*", "</a>").unwrap_err();
        assert!(matches!(err, MarkupError::EmptyPattern { .. }));
    }

    #[test]
    fn test_opens_before_nearest_first() {
        let doc = r#"<div><div id="x"></div></div>"#;
        assert_eq!(div().opens_before(doc, doc.find("id=").unwrap()), vec![5, 0]);
        assert!(div().opens_before("text", 2).is_empty());
    }

    #[test]
    fn test_rejects_offset_inside_utf8_sequence() {
        let doc = "é<div></div>";
        let err = locate_matching_close(doc, 1, &div()).unwrap_err();
        assert!(matches!(err, MarkupError::InvalidOffset { offset: 1, .. }));
    }

    #[test]
    fn test_stray_close_before_first_open_is_ignored() {
        let doc = "</div><div>x</div>";
        assert_eq!(locate_matching_close(doc, 0, &div()).unwrap(), doc.len());
    }
}
