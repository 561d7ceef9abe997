//! Marker-delimited style sections.
//!
//! Page builders emit one stylesheet section per component tree, each opened by
//! a comment marker. A section runs from its marker to the next marker, or to
//! the boundary that ends the region (typically `</style></head>`).

use std::collections::BTreeSet;
use std::fmt;

use pagewright_common::SizeDelta;
use pagewright_common::delta::group_thousands;
use regex::Regex;
use serde::Serialize;

use crate::error::StyleError;
use crate::filter::{IdExtractor, filter_dead};
use crate::tokenizer::tokenize;

/// Section marker used by the page builder's exported stylesheets.
pub const DEFAULT_SECTION_MARKER: &str = r"/\* ---- (?:top|Section) styles ----- \*/";

/// Text that ends the section region in an exported page.
pub const DEFAULT_SECTION_BOUNDARY: &str = "</style></head>";

/// Summary of a [`prune_style_sections`] pass.
#[derive(Debug, Clone, Serialize)]
pub struct PruneReport {
    /// Sections found between markers.
    pub sections_scanned: usize,
    /// Sections removed whole because they referenced only dead identifiers.
    pub sections_removed: usize,
    /// Bytes taken by whole-section removal.
    pub section_bytes: usize,
    /// Sections that kept live rules but lost some dead ones.
    pub sections_filtered: usize,
    /// Bytes taken by rule-level filtering.
    pub rule_bytes: usize,
    /// Document size before and after.
    pub size: SizeDelta,
}

impl PruneReport {
    /// Total bytes removed from the document.
    #[must_use]
    pub const fn removed_bytes(&self) -> usize {
        self.section_bytes + self.rule_bytes
    }
}

impl fmt::Display for PruneReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} section(s) removed ({} bytes), {} filtered ({} bytes); {}",
            self.sections_removed,
            self.sections_scanned,
            group_thousands(self.section_bytes),
            self.sections_filtered,
            group_thousands(self.rule_bytes),
            self.size
        )
    }
}

enum Change {
    Remove,
    Replace(String),
}

/// Remove style sections and rules that only reference identifiers in `dead`.
///
/// Sections are located by `marker` within the part of `document` preceding
/// `boundary` (the whole document when `boundary` is `None`). A section whose
/// identifiers are all dead is removed together with one preceding newline. A
/// section mixing dead and live identifiers is run through [`filter_dead`].
/// Sections with no dead identifier are left byte-identical.
///
/// # Errors
///
/// Returns [`StyleError::BoundaryNotFound`] if `boundary` is absent, or any
/// tokenizer error raised while filtering a mixed section.
pub fn prune_style_sections<E>(
    document: &str,
    marker: &Regex,
    boundary: Option<&str>,
    dead: &BTreeSet<String>,
    extractor: &E,
) -> Result<(String, PruneReport), StyleError>
where
    E: IdExtractor + ?Sized,
{
    let region_end = match boundary {
        Some(boundary) => {
            document
                .find(boundary)
                .ok_or_else(|| StyleError::BoundaryNotFound {
                    boundary: boundary.to_string(),
                })?
        }
        None => document.len(),
    };
    let region = &document[..region_end];

    let starts: Vec<usize> = marker.find_iter(region).map(|m| m.start()).collect();
    let mut report = PruneReport {
        sections_scanned: starts.len(),
        sections_removed: 0,
        section_bytes: 0,
        sections_filtered: 0,
        rule_bytes: 0,
        size: SizeDelta::between(document, document),
    };

    let mut changes = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(region_end);
        let section = &region[start..end];

        let ids = extractor.extract(section);
        if ids.is_disjoint(dead) {
            continue;
        }

        if ids.is_subset(dead) {
            report.sections_removed += 1;
            report.section_bytes += section.len();
            changes.push((start, end, Change::Remove));
            continue;
        }

        let outcome = filter_dead(tokenize(section)?, dead, extractor)?;
        if outcome.removed_bytes > 0 {
            report.sections_filtered += 1;
            report.rule_bytes += outcome.removed_bytes;
            changes.push((start, end, Change::Replace(outcome.render())));
        }
    }

    let mut out = String::with_capacity(document.len());
    let mut cursor = 0;
    for (start, end, change) in changes {
        out.push_str(&document[cursor..start]);
        match change {
            Change::Remove => {
                if out.ends_with('\n') {
                    let _ = out.pop();
                    report.section_bytes += 1;
                }
            }
            Change::Replace(text) => out.push_str(&text),
        }
        cursor = end;
    }
    out.push_str(&document[cursor..]);

    report.size = SizeDelta::between(document, &out);
    Ok((out, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ComponentIdExtractor;

    fn dead(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_removed_section_eats_newline_of_filtered_one() {
        let marker = Regex::new(DEFAULT_SECTION_MARKER).unwrap();
        let ex = ComponentIdExtractor::new(&["section"], 1).unwrap();
        let doc = "/* ---- top styles ----- */.section-a{}.section-b{}\n/* ---- top styles ----- */.section-a{}";
        let (out, report) = prune_style_sections(doc, &marker, None, &dead(&["a"]), &ex).unwrap();
        assert_eq!(out, "/* ---- top styles ----- */.section-b{}");
        assert_eq!(report.removed_bytes(), doc.len() - out.len());
    }

    #[test]
    fn test_missing_boundary() {
        let marker = Regex::new(DEFAULT_SECTION_MARKER).unwrap();
        let ex = ComponentIdExtractor::page_builder().unwrap();
        let err = prune_style_sections("<p></p>", &marker, Some("</style></head>"), &dead(&[]), &ex)
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
