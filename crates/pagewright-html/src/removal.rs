//! Batch removal of elements identified by markers.

use core::fmt;

use pagewright_common::delta::group_thousands;
use pagewright_common::{MissingPolicy, SizeDelta};
use serde::Serialize;

use crate::error::MarkupError;
use crate::locator::TagPattern;
use crate::region::{NewlinePolicy, find_region, remove_region};

/// One element removed by [`remove_elements`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedElement {
    /// The marker that identified the element.
    pub marker: String,
    /// Bytes removed, including any eaten newline.
    pub bytes: usize,
}

/// Outcome of a batch removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalReport {
    /// Elements removed, in marker order.
    pub removed: Vec<RemovedElement>,
    /// Markers that were skipped because they, or their enclosing tag, were absent.
    pub missing: Vec<String>,
    /// Document size before and after the pass.
    pub size: SizeDelta,
}

impl fmt::Display for RemovalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes: usize = self.removed.iter().map(|r| r.bytes).sum();
        write!(
            f,
            "removed {} element(s) ({} bytes), {} missing; {}",
            self.removed.len(),
            group_thousands(bytes),
            self.missing.len(),
            self.size
        )
    }
}

/// Remove the element enclosing each marker, in order.
///
/// Each marker is located against the document as left by the previous removal, so
/// offsets never cross between document states.
///
/// # Errors
///
/// - Structural errors ([`MarkupError::UnbalancedStructure`] and friends) always propagate.
/// - Not-found errors propagate only under [`MissingPolicy::Abort`]; under
///   [`MissingPolicy::Skip`] the marker is listed in [`RemovalReport::missing`].
pub fn remove_elements<S: AsRef<str>>(
    document: &str,
    markers: &[S],
    pattern: &TagPattern,
    policy: MissingPolicy,
) -> Result<(String, RemovalReport), MarkupError> {
    let mut current = document.to_string();
    let mut removed = Vec::new();
    let mut missing = Vec::new();

    for marker in markers {
        let marker = marker.as_ref();
        let span = match find_region(&current, marker, pattern) {
            Ok(span) => span,
            Err(err) if err.is_not_found() && !policy.is_abort() => {
                missing.push(marker.to_string());
                continue;
            }
            Err(err) => return Err(err),
        };
        let next = remove_region(&current, span, NewlinePolicy::EatOne)?;
        removed.push(RemovedElement {
            marker: marker.to_string(),
            bytes: current.len() - next.len(),
        });
        current = next;
    }

    let size = SizeDelta::between(document, &current);
    Ok((
        current,
        RemovalReport {
            removed,
            missing,
            size,
        },
    ))
}
