use super::{violation, Rule};
use camino::Utf8Path;
use recipelint_stash::SharedModel;
use recipelint_types::{Severity, Violation};

/// Appends must not override variables owned by the recipe.
pub struct ProtectedAppendVars {
    vars: Vec<String>,
}

impl ProtectedAppendVars {
    const ID: &'static str = "oelint.append.protvars";

    pub fn new(vars: Vec<String>) -> Self {
        Self { vars }
    }

    fn is_protected(&self, name: &str, base: &str) -> bool {
        self.vars.iter().any(|v| v == name || v == base)
    }
}

impl Rule for ProtectedAppendVars {
    fn ids(&self) -> Vec<String> {
        vec![Self::ID.to_string()]
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn only_append(&self) -> bool {
        true
    }

    fn check(&self, file: &Utf8Path, model: &dyn SharedModel) -> Vec<Violation> {
        model
            .items_for(file, true)
            .into_iter()
            .filter_map(|item| {
                let name = item.variable_name()?;
                let base = item.variable_base_name()?;
                self.is_protected(name, base).then(|| {
                    violation(
                        Self::ID,
                        self.severity(),
                        item.origin(),
                        item.line(),
                        format!("Variable '{name}' shouldn't be set as part of a bbappend"),
                    )
                })
            })
            .collect()
    }
}
