//! Rename reports and the mapping artifact written next to a renamed page.

use core::fmt;

use pagewright_common::SizeDelta;
use serde::Serialize;

use crate::error::RenameError;
use crate::map::IdentifierMap;

/// Replacement count for one map pair, derived forms included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamedIdentifier {
    /// Old identifier.
    pub old: String,
    /// New identifier.
    pub new: String,
    /// Occurrences replaced.
    pub count: usize,
}

/// Outcome of [`crate::rename`].
#[derive(Debug, Clone, Serialize)]
pub struct RenameReport {
    /// Every pair of the map, in map order, with its count.
    pub renamed: Vec<RenamedIdentifier>,
    /// Old identifiers with zero occurrences.
    pub missing: Vec<String>,
    /// New identifiers that already occurred in the input document.
    pub already_present: Vec<String>,
    /// Document size before and after.
    pub size: SizeDelta,
}

impl RenameReport {
    /// Total replacements across all pairs.
    #[must_use]
    pub fn total(&self) -> usize {
        self.renamed.iter().map(|r| r.count).sum()
    }

    /// Number of pairs with at least one occurrence.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.renamed.len() - self.missing.len()
    }
}

impl fmt::Display for RenameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "renamed {} identifier(s) with {} replacement(s), {} missing; {}",
            self.applied(),
            self.total(),
            self.missing.len(),
            self.size
        )
    }
}

/// The applied map and its totals, kept beside the output for later reference.
#[derive(Debug, Clone, Serialize)]
pub struct MappingArtifact {
    /// The map that was applied, in order.
    pub map: IdentifierMap,
    /// Total replacements made.
    pub total_replacements: usize,
    /// Old identifiers that were not found.
    pub missing: Vec<String>,
}

impl MappingArtifact {
    /// Capture a finished rename.
    #[must_use]
    pub fn new(map: &IdentifierMap, report: &RenameReport) -> Self {
        Self {
            map: map.clone(),
            total_replacements: report.total(),
            missing: report.missing.clone(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RenameError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, RenameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
