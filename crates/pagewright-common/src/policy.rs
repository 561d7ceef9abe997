//! What a batch pass does when one of its targets is absent from the document.

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Behaviour for a marker or identifier that cannot be found.
///
/// An absent target is ambiguous: the pass may already have been applied, or the
/// caller may be pointing at the wrong document. The core cannot tell the two apart,
/// so callers choose explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Record the target as missing and continue with the next one.
    #[default]
    Skip,
    /// Stop the pass and return an error; no output document is produced.
    Abort,
}

impl MissingPolicy {
    /// Returns `true` if a missing target should abort the pass.
    #[must_use]
    pub const fn is_abort(self) -> bool {
        matches!(self, Self::Abort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(MissingPolicy::from_str("skip").ok(), Some(MissingPolicy::Skip));
        assert_eq!(MissingPolicy::from_str("ABORT").ok(), Some(MissingPolicy::Abort));
        assert!(MissingPolicy::from_str("ignore").is_err());
    }

    #[test]
    fn displays_lowercase() {
        assert_eq!(MissingPolicy::Abort.to_string(), "abort");
        assert!(!MissingPolicy::default().is_abort());
    }
}
