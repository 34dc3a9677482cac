use crate::constants::Constants;
use camino::{Utf8Path, Utf8PathBuf};
use recipelint_stash::SharedModel;
use recipelint_types::{Severity, Violation};
use std::collections::BTreeSet;

mod mandatory_vars;
mod no_tabs;
mod protected_append_vars;
mod trailing_whitespace;

pub trait Rule {
    /// Ids this rule reports under; never empty. The first one is the primary id.
    fn ids(&self) -> Vec<String>;

    fn severity(&self) -> Severity;

    /// Whether the rule runs on `.bbappend` targets at all.
    fn on_append(&self) -> bool {
        true
    }

    /// Whether the rule runs on `.bbappend` targets only.
    fn only_append(&self) -> bool {
        false
    }

    fn check(&self, file: &Utf8Path, model: &dyn SharedModel) -> Vec<Violation>;

    /// Mutate the model in place; returns the files whose content changed.
    fn fix(&self, _file: &Utf8Path, _model: &mut dyn SharedModel) -> BTreeSet<Utf8PathBuf> {
        BTreeSet::new()
    }
}

pub fn builtin_rules(constants: &Constants) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(trailing_whitespace::TrailingWhitespace),
        Box::new(no_tabs::NoTabs),
        Box::new(mandatory_vars::MandatoryVars::new(
            constants.mandatory_vars.clone(),
        )),
        Box::new(protected_append_vars::ProtectedAppendVars::new(
            constants.protected_append_vars.clone(),
        )),
    ]
}

fn violation(
    rule_id: &str,
    severity: Severity,
    path: &Utf8Path,
    line: usize,
    message: impl Into<String>,
) -> Violation {
    Violation {
        rule_id: rule_id.to_string(),
        severity,
        path: path.to_path_buf(),
        line,
        message: message.into(),
    }
}

/// Apply `f` to every physical line of `text`, keeping line terminators.
fn map_physical_lines(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    for physical in text.split_inclusive('\n') {
        let body = physical.trim_end_matches(['\n', '\r']);
        out.push_str(&f(body));
        out.push_str(&physical[body.len()..]);
    }
    out
}
