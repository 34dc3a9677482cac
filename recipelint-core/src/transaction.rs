//! Back up and rewrite every file touched by rule fixes.

use crate::ports::{FixPort, RunEvents};
use crate::settings::RunSettings;
use camino::{Utf8Path, Utf8PathBuf};
use recipelint_stash::SharedModel;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixStage {
    Backup,
    Write,
}

impl fmt::Display for FixStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FixStage::Backup => "backup",
            FixStage::Write => "write",
        })
    }
}

/// One file the transaction could not finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixFailure {
    pub path: Utf8PathBuf,
    pub stage: FixStage,
    pub message: String,
}

impl fmt::Display for FixFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.stage, self.path, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixSummary {
    /// Files rewritten, in order.
    pub rewritten: Vec<Utf8PathBuf>,
    pub failures: Vec<FixFailure>,
}

pub fn backup_path(path: &Utf8Path, suffix: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{path}{suffix}"))
}

/// Every fixed file followed by its linked files, each path once, first-seen order.
fn rewrite_set(model: &dyn SharedModel, fixed: &BTreeSet<Utf8PathBuf>) -> Vec<Utf8PathBuf> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for file in fixed {
        for path in std::iter::once(file.clone()).chain(model.links_for_file(file)) {
            if seen.insert(path.clone()) {
                out.push(path);
            }
        }
    }
    out
}

/// Rewrite each fixed file, and every file linked to it, from the model.
///
/// A file is only written after its backup (if enabled) succeeded, so a
/// failure never leaves a file rewritten without its backup. Failures are
/// collected and do not stop the remaining files.
pub fn apply_fixes(
    model: &dyn SharedModel,
    fixed: &BTreeSet<Utf8PathBuf>,
    settings: &RunSettings,
    port: &dyn FixPort,
    events: &mut dyn RunEvents,
) -> FixSummary {
    let mut summary = FixSummary::default();

    for path in rewrite_set(model, fixed) {
        let rendered: String = model
            .items_for(&path, true)
            .into_iter()
            .map(|i| i.text())
            .collect();

        if settings.backup_enabled {
            let backup = backup_path(&path, &settings.backup_suffix);
            if let Err(e) = port.backup(&path, &backup) {
                error!(path = %path, error = %format!("{e:#}"), "backup failed; file left untouched");
                summary.failures.push(FixFailure {
                    path,
                    stage: FixStage::Backup,
                    message: format!("{e:#}"),
                });
                continue;
            }
        }

        if let Err(e) = port.write(&path, &rendered) {
            error!(path = %path, error = %format!("{e:#}"), "rewrite failed");
            summary.failures.push(FixFailure {
                path,
                stage: FixStage::Write,
                message: format!("{e:#}"),
            });
            continue;
        }

        info!(path = %path, "applied automatic fixes");
        events.fixes_applied(&path);
        summary.rewritten.push(path);
    }

    summary
}
