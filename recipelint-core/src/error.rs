//! Fatal error kinds of a lint run.
//!
//! Recoverable problems (an unreadable input, a single failed rewrite) are
//! reported through [`RunEvents`](crate::ports::RunEvents) and the run
//! outcome; only what is listed here ends a run without the finding-count
//! exit convention.

use crate::transaction::FixFailure;
use thiserror::Error;

/// Exit code reserved for fatal errors. Never produced by a finding count.
pub const FATAL_EXIT_CODE: u8 = 255;

/// Finding counts saturate here so they never collide with [`FATAL_EXIT_CODE`].
pub const MAX_FINDINGS_EXIT_CODE: u8 = 254;

#[derive(Debug, Error)]
pub enum RunError {
    /// Findings could not be written to the configured sink.
    #[error("write findings to {sink}: {message}")]
    Report { sink: String, message: String },

    /// At least one fixed file could not be backed up or rewritten.
    #[error("{} file(s) could not be rewritten: {}", .failures.len(), summarize(.failures))]
    FixTransaction { failures: Vec<FixFailure> },
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        FATAL_EXIT_CODE
    }
}

fn summarize(failures: &[FixFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::FixStage;

    #[test]
    fn fix_transaction_lists_every_failure() {
        let err = RunError::FixTransaction {
            failures: vec![
                FixFailure {
                    path: "a.bb".into(),
                    stage: FixStage::Backup,
                    message: "denied".to_string(),
                },
                FixFailure {
                    path: "b.inc".into(),
                    stage: FixStage::Write,
                    message: "full".to_string(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 file(s)"));
        assert!(msg.contains("backup a.bb: denied"));
        assert!(msg.contains("write b.inc: full"));
        assert_eq!(err.exit_code(), FATAL_EXIT_CODE);
    }

    #[test]
    fn report_error_names_the_sink() {
        let err = RunError::Report {
            sink: "<stderr>".to_string(),
            message: "broken pipe".to_string(),
        };
        assert_eq!(err.to_string(), "write findings to <stderr>: broken pipe");
    }
}
