//! Identifier renaming for exported pages.
//!
//! An [`IdentifierMap`] is applied with [`rename`] across markup and embedded
//! stylesheets at once, together with the [`DerivedPrefix`] forms a naming
//! convention implies. Ambiguous maps are rejected before the document is
//! touched.

/// Error type for renaming.
pub mod error;
/// Identifier maps and derived-prefix rules.
pub mod map;
/// Readable-name helpers.
pub mod naming;
/// The renamer.
pub mod renamer;
/// Reports and mapping artifacts.
pub mod report;

pub use error::RenameError;
pub use map::{DerivedPrefix, IdentifierMap};
pub use naming::{SLUG_MAX_LEN, SLUG_MAX_WORDS, UniqueNames, slugify, strip_tags};
pub use renamer::rename;
pub use report::{MappingArtifact, RenameReport, RenamedIdentifier};
