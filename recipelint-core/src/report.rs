//! Finding formatting, deduplication and output.

use crate::error::{RunError, MAX_FINDINGS_EXIT_CODE};
use crate::settings::{OutputSink, RunSettings};
use fs_err as fs;
use recipelint_types::{Finding, Severity, Violation};
use std::collections::BTreeSet;
use std::io::Write;

const RESET: &str = "\x1b[0m";

/// Turns rule violations into findings, honoring color and severity filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindingFormatter {
    pub color: bool,
    pub nowarn: bool,
    pub noinfo: bool,
}

impl FindingFormatter {
    pub fn new(settings: &RunSettings) -> Self {
        Self {
            color: settings.color,
            nowarn: settings.nowarn,
            noinfo: settings.noinfo,
        }
    }

    fn color_start(&self, severity: Severity) -> &'static str {
        if !self.color {
            return "";
        }
        match severity {
            Severity::Error => "\x1b[31m",
            Severity::Warning => "\x1b[33m",
            Severity::Info => "\x1b[36m",
        }
    }

    fn color_end(&self) -> &'static str {
        if self.color { RESET } else { "" }
    }

    /// `None` when the severity is filtered out.
    pub fn format(&self, v: &Violation) -> Option<Finding> {
        match v.severity {
            Severity::Warning if self.nowarn => return None,
            Severity::Info if self.noinfo => return None,
            _ => {}
        }
        let line = format!(
            "{}{}:{}:{}:{}:{}{}",
            self.color_start(v.severity),
            v.path,
            v.line,
            v.severity,
            v.rule_id,
            v.message,
            self.color_end()
        );
        Some(Finding::new(v.path.as_str(), v.line, line))
    }
}

/// Unique findings of a run, ordered by sort key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    findings: BTreeSet<Finding>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when an equal finding was already present.
    pub fn insert(&mut self, finding: Finding) -> bool {
        self.findings.insert(finding)
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter()
    }

    /// Display lines joined by newlines, with a trailing newline.
    pub fn render(&self) -> String {
        let mut out = self
            .findings
            .iter()
            .map(|f| f.line.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        out.push('\n');
        out
    }

    pub fn write_to(&self, sink: &OutputSink) -> Result<(), RunError> {
        let rendered = self.render();
        let result = match sink {
            OutputSink::Stderr => std::io::stderr().lock().write_all(rendered.as_bytes()),
            OutputSink::File(path) => fs::write(path, &rendered),
        };
        result.map_err(|e| RunError::Report {
            sink: sink.to_string(),
            message: e.to_string(),
        })
    }

    /// Process exit code: the number of unique findings, saturating.
    pub fn exit_code(&self) -> u8 {
        u8::try_from(self.len())
            .unwrap_or(u8::MAX)
            .min(MAX_FINDINGS_EXIT_CODE)
    }
}

impl Extend<Finding> for Report {
    fn extend<T: IntoIterator<Item = Finding>>(&mut self, iter: T) {
        self.findings.extend(iter);
    }
}
