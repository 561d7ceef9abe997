//! Common utilities for pagewright passes.
//!
//! This crate provides shared infrastructure used by all editing components:
//! - **Missing-target policy** - whether an absent marker or identifier skips or aborts
//! - **Size accounting** - before/after byte counts for one pass
//! - **Console** - colored one-line summaries for the CLI

pub mod console;
pub mod delta;
pub mod policy;

pub use delta::SizeDelta;
pub use policy::MissingPolicy;
