use crate::constants::Constants;
use crate::rules::{builtin_rules, Rule};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use recipelint_stash::SharedModel;
use recipelint_types::{Severity, Violation};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

/// Contents of a rule file: rule id -> severity.
pub type RuleFile = BTreeMap<String, Severity>;

#[derive(Debug, Error, Clone)]
pub enum RuleLoadError {
    #[error("can't read {path}: {message}")]
    Read { path: Utf8PathBuf, message: String },

    #[error("'{path}' is not a valid file: {message}")]
    Parse { path: Utf8PathBuf, message: String },
}

/// Load a JSON rule file (`{"<rule id>": "error|warning|info", ...}`).
pub fn load_rule_file(path: &Utf8Path) -> Result<RuleFile, RuleLoadError> {
    let contents = fs::read_to_string(path).map_err(|e| RuleLoadError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&contents).map_err(|e| RuleLoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// The active, ordered rule list plus per-id severity overrides and suppressions.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
    severities: RuleFile,
    suppressed: BTreeSet<String>,
}

impl RuleSet {
    /// Built-in rules, narrowed to the rule file (if any), minus suppressed rules.
    ///
    /// A rule is dropped when its primary id is suppressed. Suppressing one of
    /// its secondary ids only silences violations reported under that id.
    pub fn load(constants: &Constants, rule_file: Option<&RuleFile>, suppress: &[String]) -> Self {
        Self::from_rules(builtin_rules(constants), rule_file, suppress)
    }

    pub fn from_rules(
        rules: Vec<Box<dyn Rule>>,
        rule_file: Option<&RuleFile>,
        suppress: &[String],
    ) -> Self {
        let suppressed: BTreeSet<String> = suppress.iter().cloned().collect();

        let rules = rules
            .into_iter()
            .filter(|r| {
                let ids = r.ids();
                let listed = rule_file.is_none_or(|rf| ids.iter().any(|id| rf.contains_key(id)));
                let primary_suppressed = ids.first().is_some_and(|id| suppressed.contains(id));
                if !listed || primary_suppressed {
                    debug!(rule = ?ids.first(), listed, primary_suppressed, "rule not loaded");
                }
                listed && !primary_suppressed
            })
            .collect();

        Self {
            rules,
            severities: rule_file.cloned().unwrap_or_default(),
            suppressed,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every id of every loaded rule, sorted.
    pub fn loaded_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.rules.iter().flat_map(|r| r.ids()).collect();
        ids.sort();
        ids
    }

    /// Run `rule.check`, applying severity overrides and id suppressions.
    pub fn check(&self, rule: &dyn Rule, file: &Utf8Path, model: &dyn SharedModel) -> Vec<Violation> {
        let primary = rule.ids().into_iter().next().unwrap_or_default();
        rule.check(file, model)
            .into_iter()
            .filter(|v| !self.suppressed.contains(&v.rule_id))
            .map(|mut v| {
                if let Some(&sev) = self
                    .severities
                    .get(&v.rule_id)
                    .or_else(|| self.severities.get(&primary))
                {
                    v.severity = sev;
                }
                v
            })
            .collect()
    }
}
