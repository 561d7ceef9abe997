//! Replace every repeated block with one canonical copy.

use core::fmt;

use pagewright_common::SizeDelta;
use serde::Serialize;

use crate::error::MarkupError;
use crate::locator::TagPattern;
use crate::region::{find_region_from, splice};

/// Outcome of [`replace_elements`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DedupReport {
    /// The marker that identified each block.
    pub marker: String,
    /// Blocks rewritten to the canonical text.
    pub replaced: usize,
    /// Blocks that already equalled the canonical text.
    pub unchanged: usize,
    /// Document size before and after the pass.
    pub size: SizeDelta,
}

impl DedupReport {
    /// Total blocks found, rewritten or not.
    #[must_use]
    pub const fn found(&self) -> usize {
        self.replaced + self.unchanged
    }
}

impl fmt::Display for DedupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} block(s) matching {:?}: {} replaced, {} already canonical; {}",
            self.found(),
            self.marker,
            self.replaced,
            self.unchanged,
            self.size
        )
    }
}

/// Replace every element whose opening tag contains `marker` with `replacement`.
///
/// Each block's extent comes from the depth locator, so blocks with arbitrarily
/// nested content of the same kind are replaced whole. Scanning resumes after each
/// inserted replacement, so a replacement that itself contains the marker is never
/// revisited.
///
/// Zero matches is not an error: the report says so and the caller decides.
///
/// # Errors
///
/// Structural errors from locating a block propagate; no partial output is returned.
pub fn replace_elements(
    document: &str,
    marker: &str,
    pattern: &TagPattern,
    replacement: &str,
) -> Result<(String, DedupReport), MarkupError> {
    let mut current = document.to_string();
    let mut from = 0;
    let mut replaced = 0;
    let mut unchanged = 0;

    loop {
        let span = match find_region_from(&current, marker, pattern, from) {
            Ok(span) => span,
            Err(MarkupError::MarkerNotFound { .. }) => break,
            Err(err) => return Err(err),
        };

        if &current[span.start..span.end] == replacement {
            unchanged += 1;
            from = span.end;
        } else {
            current = splice(&current, span.start, span.end, replacement);
            replaced += 1;
            from = span.start + replacement.len();
        }
    }

    let size = SizeDelta::between(document, &current);
    Ok((
        current,
        DedupReport {
            marker: marker.to_string(),
            replaced,
            unchanged,
            size,
        },
    ))
}
