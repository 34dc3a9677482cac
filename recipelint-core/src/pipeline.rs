//! Group, lint and fix pipeline, extracted from the CLI.
//!
//! The entry point is I/O-agnostic apart from what the model reads: backups
//! and rewrites go through [`FixPort`], progress through [`RunEvents`].

use crate::error::RunError;
use crate::grouping::group_files;
use crate::ports::{FixPort, RunEvents};
use crate::report::{FindingFormatter, Report};
use crate::settings::RunSettings;
use crate::transaction::{apply_fixes, FixFailure};
use camino::{Utf8Path, Utf8PathBuf};
use recipelint_rules::RuleSet;
use recipelint_stash::SharedModel;
use recipelint_types::FileKind;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Outcome of `run_lint`.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub report: Report,
    /// Every file a rule fix reported as mutated, across all groups.
    pub fixed_files: BTreeSet<Utf8PathBuf>,
    /// Files rewritten by fix transactions, in order. A file fixed by two
    /// groups appears twice.
    pub rewritten: Vec<Utf8PathBuf>,
    pub fix_failures: Vec<FixFailure>,
    pub groups: usize,
}

impl RunOutcome {
    /// Fails when any fix transaction left a file behind.
    pub fn fix_result(&self) -> Result<(), RunError> {
        if self.fix_failures.is_empty() {
            Ok(())
        } else {
            Err(RunError::FixTransaction {
                failures: self.fix_failures.clone(),
            })
        }
    }
}

/// Recipes followed by lone appends, each once.
fn targets(model: &dyn SharedModel) -> Vec<Utf8PathBuf> {
    let mut out: Vec<Utf8PathBuf> = Vec::new();
    for path in model.recipes().into_iter().chain(model.lone_appends()) {
        if !out.contains(&path) {
            out.push(path);
        }
    }
    out
}

fn applies(on_append: bool, only_append: bool, target: &Utf8Path) -> bool {
    let is_append = FileKind::classify(target).is_append();
    if is_append && !on_append {
        return false;
    }
    if only_append && !is_append {
        return false;
    }
    true
}

/// Lint every recipe family found in `files`.
///
/// Each group gets a fresh model from `new_model`. With `settings.fix`, a
/// rule's fix runs before its check on the same target, and every mutated
/// file (plus the files linked to it) is rewritten once the group is done.
pub fn run_lint<M, F>(
    files: &[Utf8PathBuf],
    rules: &RuleSet,
    settings: &RunSettings,
    mut new_model: F,
    port: &dyn FixPort,
    events: &mut dyn RunEvents,
) -> RunOutcome
where
    M: SharedModel,
    F: FnMut() -> M,
{
    let formatter = FindingFormatter::new(settings);
    let mut outcome = RunOutcome::default();

    for group in group_files(files) {
        debug!(key = %group.key, files = group.files.len(), "processing group");
        outcome.groups += 1;

        let mut model = new_model();
        for path in &group.files {
            if let Err(e) = model.add_file(path) {
                warn!(error = %e, "skipping unreadable file");
                events.file_unreadable(&e);
            }
        }
        model.finalize();

        let targets = targets(&model);
        let mut fixed = BTreeSet::new();

        for (index, target) in targets.iter().enumerate() {
            for rule in rules.iter() {
                if !applies(rule.on_append(), rule.only_append(), target) {
                    continue;
                }
                if settings.fix {
                    fixed.extend(rule.fix(target, &mut model));
                }
                outcome.report.extend(
                    rules
                        .check(rule, target, &model)
                        .iter()
                        .filter_map(|v| formatter.format(v)),
                );
            }
            events.files_checked(index + 1, targets.len());
        }

        if !fixed.is_empty() {
            let summary = apply_fixes(&model, &fixed, settings, port, events);
            outcome.rewritten.extend(summary.rewritten);
            outcome.fix_failures.extend(summary.failures);
            outcome.fixed_files.extend(fixed);
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_gating() {
        let recipe = Utf8Path::new("a_1.bb");
        let append = Utf8Path::new("a_1.bbappend");

        assert!(applies(true, false, recipe));
        assert!(applies(true, false, append));
        assert!(applies(false, false, recipe));
        assert!(!applies(false, false, append));
        assert!(!applies(true, true, recipe));
        assert!(applies(true, true, append));
    }
}
