use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw output of a rule check, before formatting and severity filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The id (one of the rule's ids) this violation is reported under.
    pub rule_id: String,
    pub severity: Severity,
    pub path: Utf8PathBuf,
    /// 1-based line in `path`.
    pub line: usize,
    pub message: String,
}

/// Ordering key of a finding: file, then line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub path: String,
    pub line: usize,
}

/// One reported violation: a sort key and the display line written to the sink.
///
/// Equality is full equality; the derived order is sort key first, display
/// line second, which makes ties deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Finding {
    pub sort_key: SortKey,
    pub line: String,
}

impl Finding {
    pub fn new(path: impl Into<String>, line_no: usize, line: impl Into<String>) -> Self {
        Self {
            sort_key: SortKey {
                path: path.into(),
                line: line_no,
            },
            line: line.into(),
        }
    }
}
