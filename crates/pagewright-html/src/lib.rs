//! Structural editing of HTML as flat text.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tag depth locator** - find the close token matching an open token by counting
//!   nested tokens of the same element kind
//! - **Element regions** - locate the element around a marker, then extract, remove,
//!   or relocate it
//! - **Batch passes** - remove many marked elements, strip a class token or empty
//!   attributes, replace repeated blocks with a canonical copy
//!
//! # Not a parser
//!
//! No DOM is built. Input is assumed well-formed with respect to the nesting of the
//! element kind being counted; when it is not, operations fail with
//! [`MarkupError::UnbalancedStructure`] instead of guessing.

/// Class-token stripping and empty-attribute cleanup.
pub mod classes;
/// Canonical replacement of repeated blocks.
pub mod dedup;
/// Error type for markup operations.
pub mod error;
/// Depth-tracking matching-close locator.
pub mod locator;
/// Element spans and span-level edits.
pub mod region;
/// Batch removal of marked elements.
pub mod removal;

pub use classes::{
    AttributeReport, PAGE_BUILDER_EMPTY_ATTRIBUTES, strip_class_token, strip_empty_attributes,
};
pub use dedup::{DedupReport, replace_elements};
pub use error::MarkupError;
pub use locator::{TagPattern, locate_matching_close};
pub use region::{
    ElementSpan, NewlinePolicy, extract_region, find_region, find_region_from, insert_at,
    insert_before_marker, relocate_before_marker, relocate_region, remove_region,
};
pub use removal::{RemovalReport, RemovedElement, remove_elements};
