//! # Snapshot Testing Support
//!
//! Utilities for checking parser output in tests and printing it from the CLI.
//!
//! ## Modules
//!
//! - **`format`**: renders a `Document` as an indented outline, stable enough for
//!   `insta` inline snapshots (digests and ids are left out unless asked for)
//! - **`invariants`**: runtime checks for tree correctness (sibling ids unique,
//!   typed children, position metadata consistent with ancestors, tables padded)

pub mod format;
pub mod invariants;

pub use format::{FormatOptions, format_tree, format_tree_with};
pub use invariants::check as invariants;
