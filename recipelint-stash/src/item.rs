use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::sync::LazyLock;

static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:include|require)\s+(?P<path>\S+)\s*$").expect("include regex")
});

static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^\s*(?:export\s+)?(?P<name>[A-Za-z0-9_\-\.\$\{\}/:\[\]~@]+?)\s*(?P<op>\?\?=|\?=|:=|\+=|=\+|\.=|=\.|=)\s*(?P<value>.*?)\s*$",
    )
    .expect("variable regex")
});

/// Classification of a logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Blank,
    Comment,
    Include {
        path: String,
    },
    Variable {
        name: String,
        op: String,
        value: String,
    },
    Other,
}

impl ItemKind {
    fn parse(logical: &str) -> Self {
        let trimmed = logical.trim();
        if trimmed.is_empty() {
            return ItemKind::Blank;
        }
        if trimmed.starts_with('#') {
            return ItemKind::Comment;
        }
        if let Some(caps) = INCLUDE_RE.captures(logical) {
            return ItemKind::Include {
                path: caps["path"].to_string(),
            };
        }
        if let Some(caps) = VARIABLE_RE.captures(logical) {
            return ItemKind::Variable {
                name: caps["name"].to_string(),
                op: caps["op"].to_string(),
                value: caps["value"].to_string(),
            };
        }
        ItemKind::Other
    }
}

/// One logical line of a file: physical lines joined by trailing `\`.
///
/// `text` is the literal source, line terminators included, so the items of
/// a file concatenated in order reproduce it exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    origin: Utf8PathBuf,
    line: usize,
    text: String,
    kind: ItemKind,
}

impl Item {
    pub fn new(origin: &Utf8Path, line: usize, text: String) -> Self {
        let kind = ItemKind::parse(&logical(&text));
        Self {
            origin: origin.to_path_buf(),
            line,
            text,
            kind,
        }
    }

    pub fn origin(&self) -> &Utf8Path {
        &self.origin
    }

    /// 1-based number of the first physical line.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Replace the literal text; the kind is re-derived from the new text.
    pub fn set_text(&mut self, text: String) {
        self.kind = ItemKind::parse(&logical(&text));
        self.text = text;
    }

    /// Text with continuations folded into one line.
    pub fn logical(&self) -> String {
        logical(&self.text)
    }

    /// Physical lines with their 1-based line numbers, terminators stripped.
    pub fn physical_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        let start = self.line;
        self.text
            .split_inclusive('\n')
            .enumerate()
            .map(move |(i, l)| (start + i, strip_terminator(l)))
    }

    /// Variable name without override or flag suffixes (`FOO:append` -> `FOO`).
    pub fn variable_base_name(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Variable { name, .. } => name.split([':', '[']).next(),
            _ => None,
        }
    }

    pub fn variable_name(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Variable { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Split file content into items.
pub fn split_items(origin: &Utf8Path, content: &str) -> Vec<Item> {
    let mut items = Vec::new();
    let mut buf = String::new();
    let mut start = 1;

    for (idx, physical) in content.split_inclusive('\n').enumerate() {
        if buf.is_empty() {
            start = idx + 1;
        }
        buf.push_str(physical);
        if !strip_terminator(physical).ends_with('\\') {
            items.push(Item::new(origin, start, std::mem::take(&mut buf)));
        }
    }
    if !buf.is_empty() {
        items.push(Item::new(origin, start, buf));
    }
    items
}

fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn logical(text: &str) -> String {
    let mut out = String::new();
    for physical in text.split_inclusive('\n') {
        let line = strip_terminator(physical);
        out.push_str(line.strip_suffix('\\').unwrap_or(line));
    }
    out
}
