use super::{map_physical_lines, violation, Rule};
use camino::{Utf8Path, Utf8PathBuf};
use recipelint_stash::SharedModel;
use recipelint_types::{Severity, Violation};
use std::collections::BTreeSet;

const BLANKS: [char; 2] = [' ', '\t'];

pub struct TrailingWhitespace;

impl TrailingWhitespace {
    const ID: &'static str = "oelint.spaces.lineend";
}

impl Rule for TrailingWhitespace {
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
                if text.ends_with(BLANKS) {
                    out.push(violation(
                        Self::ID,
                        self.severity(),
                        item.origin(),
                        line,
                        "Line shall not end with a space",
                    ));
                }
            }
        }
        out
    }

    fn fix(&self, file: &Utf8Path, model: &mut dyn SharedModel) -> BTreeSet<Utf8PathBuf> {
        let mut changed = false;
        for item in model.items_for_mut(file, false) {
            let fixed = map_physical_lines(item.text(), |l| l.trim_end_matches(BLANKS).to_string());
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
