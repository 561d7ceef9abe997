//! Simultaneous, collision-checked identifier renaming.

use std::collections::HashMap;

use pagewright_common::SizeDelta;
use regex::Regex;

use crate::error::RenameError;
use crate::map::{DerivedPrefix, IdentifierMap};
use crate::report::{RenameReport, RenamedIdentifier};

/// One textual form to replace, tied to the map pair it came from.
#[derive(Debug)]
struct Form {
    old: String,
    new: String,
    pair: usize,
}

/// Expand every pair into its base form and derived forms.
fn expand(map: &IdentifierMap, derived: &[DerivedPrefix]) -> Vec<Form> {
    let mut forms = Vec::new();
    for (pair, (old, new)) in map.iter().enumerate() {
        forms.push(Form {
            old: old.to_string(),
            new: new.to_string(),
            pair,
        });
        for rule in derived {
            let fresh = rule
                .apply(old, new)
                .filter(|(old, _)| !forms.iter().any(|f| f.pair == pair && &f.old == old));
            if let Some((old, new)) = fresh {
                forms.push(Form { old, new, pair });
            }
        }
    }
    forms
}

/// Reject forms that would make the output ambiguous.
///
/// No two forms may share an old text, no two may produce the same new text,
/// and no new text may equal another pair's old text. Reserved names may be
/// neither replaced nor produced.
fn check_collisions<'a>(
    forms: &[Form],
    reserved: impl IntoIterator<Item = &'a str>,
) -> Result<(), RenameError> {
    let mut by_old: HashMap<&str, &Form> = HashMap::new();
    let mut by_new: HashMap<&str, &Form> = HashMap::new();

    for form in forms {
        if let Some(prev) = by_old.insert(&form.old, form) {
            return Err(RenameError::IdentifierCollision {
                identifier: form.old.clone(),
                first: prev.old.clone(),
                second: form.old.clone(),
            });
        }
        if let Some(prev) = by_new.insert(&form.new, form) {
            return Err(RenameError::IdentifierCollision {
                identifier: form.new.clone(),
                first: prev.old.clone(),
                second: form.old.clone(),
            });
        }
    }

    for form in forms {
        let aliased = by_old
            .get(form.new.as_str())
            .filter(|other| other.pair != form.pair);
        if let Some(other) = aliased {
            return Err(RenameError::IdentifierCollision {
                identifier: form.new.clone(),
                first: form.old.clone(),
                second: other.old.clone(),
            });
        }
    }

    for name in reserved {
        let claimed = by_new.get(name).or_else(|| by_old.get(name));
        if let Some(form) = claimed {
            return Err(RenameError::IdentifierCollision {
                identifier: name.to_string(),
                first: name.to_string(),
                second: form.old.clone(),
            });
        }
    }

    Ok(())
}

/// Rename every identifier in `map`, with its derived forms, across `document`.
///
/// All forms are replaced in one left-to-right scan that prefers the longest
/// form at each position, so replaced text is never rewritten again and the
/// order of pairs does not matter. Collisions are checked before the document
/// is touched. A pair with no occurrences is reported as missing, not failed.
///
/// # Errors
///
/// Returns [`RenameError::IdentifierCollision`] if the map is ambiguous, or
/// [`RenameError::InvalidPattern`] if the combined pattern is too large to
/// compile.
pub fn rename(
    document: &str,
    map: &IdentifierMap,
    derived: &[DerivedPrefix],
) -> Result<(String, RenameReport), RenameError> {
    let mut forms = expand(map, derived);
    check_collisions(&forms, map.reserved())?;

    let already_present = map
        .iter()
        .filter(|(_, new)| document.contains(new))
        .map(|(_, new)| new.to_string())
        .collect();

    let mut counts = vec![0usize; map.len()];
    let output = if forms.is_empty() {
        document.to_string()
    } else {
        forms.sort_by(|a, b| b.old.len().cmp(&a.old.len()));
        let alternatives = forms
            .iter()
            .map(|f| regex::escape(&f.old))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternatives)?;
        let lookup: HashMap<&str, &Form> = forms.iter().map(|f| (f.old.as_str(), f)).collect();

        pattern
            .replace_all(document, |caps: &regex::Captures<'_>| {
                let matched = &caps[0];
                lookup.get(matched).map_or_else(
                    || matched.to_string(),
                    |form| {
                        counts[form.pair] += 1;
                        form.new.clone()
                    },
                )
            })
            .into_owned()
    };

    let mut report = RenameReport {
        renamed: Vec::with_capacity(map.len()),
        missing: Vec::new(),
        already_present,
        size: SizeDelta::between(document, &output),
    };
    for ((old, new), count) in map.iter().zip(counts) {
        if count == 0 {
            report.missing.push(old.to_string());
        }
        report.renamed.push(RenamedIdentifier {
            old: old.to_string(),
            new: new.to_string(),
            count,
        });
    }

    Ok((output, report))
}
