use super::{map_physical_lines, violation, Rule};
use camino::{Utf8Path, Utf8PathBuf};
use recipelint_stash::SharedModel;
use recipelint_types::{Severity, Violation};
use std::collections::BTreeSet;

const TAB_WIDTH: usize = 4;

pub struct NoTabs;

impl NoTabs {
    const ID: &'static str = "oelint.tabs.notabs";
}

fn indent(line: &str) -> &str {
    &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
}

fn expand_indent(line: &str) -> String {
    let lead = indent(line);
    let mut out = lead.replace('\t', &" ".repeat(TAB_WIDTH));
    out.push_str(&line[lead.len()..]);
    out
}

impl Rule for NoTabs {
    fn ids(&self) -> Vec<String> {
        vec![Self::ID.to_string()]
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, file: &Utf8Path, model: &dyn SharedModel) -> Vec<Violation> {
        let mut out = Vec::new();
        for item in model.items_for(file, false) {
            for (line, text) in item.physical_lines() {
                if indent(text).contains('\t') {
                    out.push(violation(
                        Self::ID,
                        self.severity(),
                        item.origin(),
                        line,
                        "Don't use tabs use spaces",
                    ));
                }
            }
        }
        out
    }

    fn fix(&self, file: &Utf8Path, model: &mut dyn SharedModel) -> BTreeSet<Utf8PathBuf> {
        let mut changed = false;
        for item in model.items_for_mut(file, false) {
            let fixed = map_physical_lines(item.text(), expand_indent);
            if fixed != item.text() {
                item.set_text(fixed);
                changed = true;
            }
        }
        if changed {
            BTreeSet::from([file.to_path_buf()])
        } else {
            BTreeSet::new()
        }
    }
}
