//! Clap-free settings for the lint pipeline.

use camino::Utf8PathBuf;
use std::fmt;

/// Where findings are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputSink {
    #[default]
    Stderr,
    /// Created (or truncated) and closed after writing.
    File(Utf8PathBuf),
}

impl fmt::Display for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputSink::Stderr => f.write_str("<stderr>"),
            OutputSink::File(path) => write!(f, "{path}"),
        }
    }
}

/// Settings for one lint run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Run rule fixes and rewrite the affected files.
    pub fix: bool,

    // Backups
    pub backup_enabled: bool,
    pub backup_suffix: String,

    // Findings
    pub color: bool,
    pub nowarn: bool,
    pub noinfo: bool,
    pub output: OutputSink,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            fix: false,
            backup_enabled: true,
            backup_suffix: ".bak".to_string(),
            color: false,
            nowarn: false,
            noinfo: false,
            output: OutputSink::default(),
        }
    }
}
