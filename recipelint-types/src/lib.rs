//! Shared types for the recipelint workspace.
//!
//! # Design constraints
//! - No I/O here; every crate in the workspace depends on this one.
//! - Recipe/append classification and append matching live here so the
//!   group builder and the stash always agree on which append belongs to
//!   which recipe.

pub mod file_kind;
pub mod finding;

pub use file_kind::{AppendPattern, FileKind};
pub use finding::{Finding, Severity, SortKey, Violation};

/// Recognized file extensions.
pub mod ext {
    pub const RECIPE: &str = "bb";
    pub const APPEND: &str = "bbappend";
}
