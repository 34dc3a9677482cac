use crate::catalog::RuleLoadError;
use camino::Utf8Path;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// Tunable lists consumed by the built-in rules.
///
/// A constant file only replaces the lists it names; the rest keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Constants {
    pub mandatory_vars: Vec<String>,
    pub protected_append_vars: Vec<String>,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            mandatory_vars: ["SUMMARY", "DESCRIPTION", "HOMEPAGE", "LICENSE", "SRC_URI"]
                .map(String::from)
                .to_vec(),
            protected_append_vars: [
                "LICENSE",
                "LIC_FILES_CHKSUM",
                "PV",
                "SRCREV",
                "SRC_URI[md5sum]",
                "SRC_URI[sha256sum]",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Load a JSON constant file.
pub fn load_constants(path: &Utf8Path) -> Result<Constants, RuleLoadError> {
    let contents = fs::read_to_string(path).map_err(|e| RuleLoadError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let constants: Constants =
        serde_json::from_str(&contents).map_err(|e| RuleLoadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    debug!(path = %path, ?constants, "loaded constant file");
    Ok(constants)
}
