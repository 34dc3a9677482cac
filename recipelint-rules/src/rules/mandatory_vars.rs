use super::{violation, Rule};
use camino::Utf8Path;
use recipelint_stash::SharedModel;
use recipelint_types::{Severity, Violation};
use std::collections::BTreeSet;

/// Recipes (including their includes and appends) must set every listed variable.
pub struct MandatoryVars {
    vars: Vec<String>,
}

impl MandatoryVars {
    const ID: &'static str = "oelint.var.mandatoryvar";

    pub fn new(vars: Vec<String>) -> Self {
        Self { vars }
    }

    fn id_for(var: &str) -> String {
        format!("{}.{}", Self::ID, var)
    }
}

impl Rule for MandatoryVars {
    fn ids(&self) -> Vec<String> {
        std::iter::once(Self::ID.to_string())
            .chain(self.vars.iter().map(|v| Self::id_for(v)))
            .collect()
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn on_append(&self) -> bool {
        false
    }

    fn check(&self, file: &Utf8Path, model: &dyn SharedModel) -> Vec<Violation> {
        let set: BTreeSet<&str> = model
            .items_for(file, false)
            .into_iter()
            .filter_map(|i| i.variable_base_name())
            .collect();

        self.vars
            .iter()
            .filter(|v| !set.contains(v.as_str()))
            .map(|v| {
                violation(
                    &Self::id_for(v),
                    self.severity(),
                    file,
                    1,
                    format!("Variable '{v}' should be set"),
                )
            })
            .collect()
    }
}
