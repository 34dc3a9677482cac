use crate::ext;
use camino::Utf8Path;
use glob::Pattern;

/// Extension category of an input path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Base definition file (`.bb`).
    Recipe,
    /// Overlay patching a recipe (`.bbappend`).
    Append,
    /// Anything else; ignored by grouping.
    Other,
}

impl FileKind {
    pub fn classify(path: &Utf8Path) -> Self {
        match path.extension() {
            Some(e) if e == ext::RECIPE => FileKind::Recipe,
            Some(e) if e == ext::APPEND => FileKind::Append,
            _ => FileKind::Other,
        }
    }

    pub fn is_append(self) -> bool {
        self == FileKind::Append
    }
}

/// Wildcard pattern derived from an append file name.
///
/// `%` in the append stem matches any run of characters, everything else is
/// literal. The pattern is tested against the *stem* of a candidate file, so
/// `foo_%.bbappend` matches `foo_1.2.bb` and `foo_1.2.bbappend` matches
/// `foo_1.2.bb` only.
#[derive(Debug, Clone)]
pub struct AppendPattern {
    pattern: Pattern,
}

impl AppendPattern {
    /// Build the pattern for `append`. Returns `None` for paths without a stem.
    pub fn for_append(append: &Utf8Path) -> Option<Self> {
        let stem = append.file_stem()?;
        let pattern = Pattern::new(&Pattern::escape(stem).replace('%', "*")).ok()?;
        Some(Self { pattern })
    }

    pub fn matches(&self, candidate: &Utf8Path) -> bool {
        candidate
            .file_stem()
            .is_some_and(|stem| self.pattern.matches(stem))
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}
