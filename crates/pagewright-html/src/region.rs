//! Element regions: locate, extract, remove, and relocate whole elements.
//!
//! Every function here is a pure `&str -> String` transformation. Offsets are byte
//! offsets into the document they were computed against; an offset from one document
//! state is never valid in another.

use serde::Serialize;

use crate::error::MarkupError;
use crate::locator::{TagPattern, check_offset, locate_matching_close};

/// Byte span of one located element, inclusive of its opening and closing tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ElementSpan {
    /// Offset of the first byte of the opening token.
    pub start: usize,
    /// Offset just past the closing token.
    pub end: usize,
}

impl ElementSpan {
    /// Create a span. `start` must not exceed `end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Length in bytes; zero for a reversed span.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for a zero-length or reversed span.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns `true` if the two spans share no byte.
    #[must_use]
    pub const fn is_disjoint(&self, other: &Self) -> bool {
        self.end <= other.start || other.end <= self.start
    }

    /// The span's text within `document`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::InvalidSpan`] if the span does not fit the document.
    pub fn text<'a>(&self, document: &'a str) -> Result<&'a str, MarkupError> {
        self.validate(document)?;
        Ok(&document[self.start..self.end])
    }

    fn validate(&self, document: &str) -> Result<(), MarkupError> {
        let fits = self.start <= self.end
            && self.end <= document.len()
            && document.is_char_boundary(self.start)
            && document.is_char_boundary(self.end);
        if fits {
            Ok(())
        } else {
            Err(MarkupError::InvalidSpan {
                start: self.start,
                end: self.end,
                len: document.len(),
            })
        }
    }
}

/// Whether removing a span also removes one adjacent newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlinePolicy {
    /// Remove exactly the span.
    #[default]
    Keep,
    /// Also remove the newline just before the span, or failing that, the one just
    /// after it, so repeated removals do not accumulate blank lines.
    EatOne,
}

/// Locate the element whose opening tag contains the first occurrence of `marker`.
///
/// # Errors
///
/// - [`MarkupError::MarkerNotFound`] if `marker` is empty or absent.
/// - [`MarkupError::EnclosingTagNotFound`] if no element of `pattern`'s kind encloses it.
/// - [`MarkupError::UnbalancedStructure`] if the enclosing element never closes.
pub fn find_region(
    document: &str,
    marker: &str,
    pattern: &TagPattern,
) -> Result<ElementSpan, MarkupError> {
    find_region_from(document, marker, pattern, 0)
}

/// Like [`find_region`], but the marker search starts at byte offset `from`.
///
/// The enclosing element may still begin before `from`.
///
/// # Errors
///
/// As [`find_region`], plus [`MarkupError::InvalidOffset`] for a bad `from`.
pub fn find_region_from(
    document: &str,
    marker: &str,
    pattern: &TagPattern,
    from: usize,
) -> Result<ElementSpan, MarkupError> {
    check_offset(document, from)?;
    let offset = document[from..]
        .find(marker)
        .filter(|_| !marker.is_empty())
        .map(|i| i + from)
        .ok_or_else(|| MarkupError::MarkerNotFound {
            marker: marker.to_string(),
        })?;

    // The nearest open usually encloses the marker. When it does not (the marker sits
    // after a closed sibling), walk outward to the next enclosing candidate.
    for start in pattern.opens_before(document, offset) {
        let end = locate_matching_close(document, start, pattern)?;
        if end > offset {
            let span = ElementSpan::new(start, end);
            debug_assert_eq!(pattern.net_depth(&document[start..end]), 0);
            return Ok(span);
        }
    }

    Err(MarkupError::EnclosingTagNotFound {
        marker: marker.to_string(),
        offset,
    })
}

/// Return `document` with `span` excised.
///
/// # Errors
///
/// Returns [`MarkupError::InvalidSpan`] if the span does not fit the document.
pub fn remove_region(
    document: &str,
    span: ElementSpan,
    newline: NewlinePolicy,
) -> Result<String, MarkupError> {
    span.validate(document)?;
    let (mut start, mut end) = (span.start, span.end);
    if newline == NewlinePolicy::EatOne {
        if document[..start].ends_with('\n') {
            start -= 1;
        } else if document[end..].starts_with('\n') {
            end += 1;
        }
    }
    Ok(splice(document, start, end, ""))
}

/// Split `document` into the span's text and the document without it.
///
/// # Errors
///
/// Returns [`MarkupError::InvalidSpan`] if the span does not fit the document.
pub fn extract_region(
    document: &str,
    span: ElementSpan,
) -> Result<(String, String), MarkupError> {
    let text = span.text(document)?.to_string();
    let rest = splice(document, span.start, span.end, "");
    Ok((text, rest))
}

/// Move the span's text to `insertion_offset`.
///
/// `insertion_offset` is measured in the document *after* the span has been
/// removed. An offset computed against the original document is off by the span's
/// length whenever it lies past the span.
///
/// # Errors
///
/// - [`MarkupError::InvalidSpan`] if the span does not fit the document.
/// - [`MarkupError::InvalidOffset`] if the offset does not fit the post-removal document.
pub fn relocate_region(
    document: &str,
    span: ElementSpan,
    insertion_offset: usize,
) -> Result<String, MarkupError> {
    let (text, rest) = extract_region(document, span)?;
    insert_at(&rest, insertion_offset, &text)
}

/// Move the span's text to just before the first occurrence of `anchor`, searched
/// for in the post-removal document.
///
/// # Errors
///
/// - [`MarkupError::InvalidSpan`] if the span does not fit the document.
/// - [`MarkupError::MarkerNotFound`] if the anchor is absent once the span is removed.
pub fn relocate_before_marker(
    document: &str,
    span: ElementSpan,
    anchor: &str,
) -> Result<String, MarkupError> {
    let (text, rest) = extract_region(document, span)?;
    insert_before_marker(&rest, anchor, &text)
}

/// Insert `text` immediately before the first occurrence of `marker`.
///
/// # Errors
///
/// Returns [`MarkupError::MarkerNotFound`] if the marker is empty or absent.
pub fn insert_before_marker(
    document: &str,
    marker: &str,
    text: &str,
) -> Result<String, MarkupError> {
    let offset = document
        .find(marker)
        .filter(|_| !marker.is_empty())
        .ok_or_else(|| MarkupError::MarkerNotFound {
            marker: marker.to_string(),
        })?;
    insert_at(document, offset, text)
}

/// Insert `text` at byte `offset`.
///
/// # Errors
///
/// Returns [`MarkupError::InvalidOffset`] if the offset does not fit the document.
pub fn insert_at(document: &str, offset: usize, text: &str) -> Result<String, MarkupError> {
    check_offset(document, offset)?;
    Ok(splice(document, offset, offset, text))
}

/// Replace `document[start..end]` with `replacement`. Bounds are already validated.
pub(crate) fn splice(document: &str, start: usize, end: usize, replacement: &str) -> String {
    let mut out = String::with_capacity(document.len() - (end - start) + replacement.len());
    out.push_str(&document[..start]);
    out.push_str(replacement);
    out.push_str(&document[end..]);
    out
}
