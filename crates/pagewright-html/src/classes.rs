//! Attribute cleanup: class-token stripping and empty attributes.

use std::fmt;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::MarkupError;

/// Remove every occurrence of the whitespace-separated `token` from all
/// `class="..."` (or `class='...'`) attribute values.
///
/// Attributes left with no tokens are dropped together with their leading
/// whitespace. Attributes that never contained the token are left byte-for-byte
/// intact. Returns the rewritten document and the number of tokens removed.
///
/// Text outside class attributes (for instance a `.token` selector in a stylesheet)
/// is never touched.
///
/// # Errors
///
/// Returns [`MarkupError::InvalidPattern`] if the attribute pattern fails to compile.
pub fn strip_class_token(document: &str, token: &str) -> Result<(String, usize), MarkupError> {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Ok((document.to_string(), 0));
    }

    let attr = Regex::new(r#"(\s+)class\s*=\s*(?:"([^"]*)"|'([^']*)')"#)?;
    let mut removed = 0usize;

    let rewritten = attr.replace_all(document, |caps: &Captures<'_>| {
        let whole = &caps[0];
        let (value, quote) = match (caps.get(2), caps.get(3)) {
            (Some(v), _) => (v.as_str(), '"'),
            (None, Some(v)) => (v.as_str(), '\''),
            (None, None) => return whole.to_string(),
        };

        let before = value.split_whitespace().count();
        let kept: Vec<&str> = value.split_whitespace().filter(|t| *t != token).collect();
        if kept.len() == before {
            return whole.to_string();
        }
        removed += before - kept.len();

        if kept.is_empty() {
            String::new()
        } else {
            format!("{}class={quote}{}{quote}", &caps[1], kept.join(" "))
        }
    });

    Ok((rewritten.into_owned(), removed))
}

/// Attributes the page builder leaves behind with empty values.
pub const PAGE_BUILDER_EMPTY_ATTRIBUTES: &[&str] = &["class", "style", "data-animation-class"];

/// Result of [`strip_empty_attributes`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttributeReport {
    /// Attribute name and number of empty occurrences removed, in request order.
    pub removed: Vec<(String, usize)>,
}

impl AttributeReport {
    /// Attributes removed across all names.
    #[must_use]
    pub fn total(&self) -> usize {
        self.removed.iter().map(|(_, n)| n).sum()
    }
}

impl fmt::Display for AttributeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "removed {} empty attribute(s)", self.total())?;
        let named: Vec<String> = self
            .removed
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(name, n)| format!("{name}: {n}"))
            .collect();
        if !named.is_empty() {
            write!(f, " ({})", named.join(", "))?;
        }
        Ok(())
    }
}

/// Remove `name=""` (or `name=''`) for each of `names`, with its leading
/// whitespace.
///
/// Only whitespace-preceded names match, so `class` never strips
/// `data-class=""`. Attributes with a value are left alone.
///
/// # Errors
///
/// Returns [`MarkupError::InvalidPattern`] if an attribute pattern fails to compile.
pub fn strip_empty_attributes<S: AsRef<str>>(
    document: &str,
    names: &[S],
) -> Result<(String, AttributeReport), MarkupError> {
    let mut current = document.to_string();
    let mut report = AttributeReport::default();

    for name in names.iter().map(AsRef::as_ref) {
        if name.is_empty() {
            continue;
        }
        let attr = Regex::new(&format!(
            r#"\s+{}\s*=\s*(?:""|'')"#,
            regex::escape(name)
        ))?;
        let count = attr.find_iter(&current).count();
        if count > 0 {
            current = attr.replace_all(&current, "").into_owned();
        }
        report.removed.push((name.to_string(), count));
    }

    Ok((current, report))
}
