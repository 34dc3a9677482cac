//! Embeddable core library for recipelint.
//!
//! Provides a clap-free entry point that clusters loose recipe paths into
//! families, lints each family against a [`RuleSet`](recipelint_rules::RuleSet)
//! and rewrites fixed files.
//!
//! # Port traits
//!
//! Side effects go through the traits in [`ports`]:
//! - [`FixPort`](ports::FixPort): back up and rewrite files
//! - [`RunEvents`](ports::RunEvents): progress and recoverable-error notifications
//!
//! The [`adapters`] module provides the default filesystem-backed implementations.
//!
//! # Entry points
//!
//! - [`group_files`](grouping::group_files): input paths to recipe families
//! - [`run_lint`](pipeline::run_lint): lint (and fix) every family
//! - [`Report::write_to`](report::Report::write_to): flush findings to the sink

pub mod adapters;
pub mod error;
pub mod grouping;
pub mod pipeline;
pub mod ports;
pub mod report;
pub mod settings;
pub mod transaction;

pub use error::{RunError, FATAL_EXIT_CODE, MAX_FINDINGS_EXIT_CODE};
pub use grouping::{group_files, Group};
pub use pipeline::{run_lint, RunOutcome};
pub use report::{FindingFormatter, Report};
pub use settings::{OutputSink, RunSettings};
pub use transaction::{apply_fixes, FixFailure, FixStage, FixSummary};
