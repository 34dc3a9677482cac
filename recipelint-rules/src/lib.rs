//! Rules: what recipelint checks and how it fixes it.
//!
//! This crate owns the [`Rule`] contract, the built-in catalog and the
//! loading/filtering of the active [`RuleSet`]. It does not own grouping or
//! writing files back; that's `recipelint-core`.

mod catalog;
mod constants;
mod rules;

pub use catalog::{load_rule_file, RuleFile, RuleLoadError, RuleSet};
pub use constants::{load_constants, Constants};
pub use rules::{builtin_rules, Rule};
