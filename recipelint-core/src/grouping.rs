//! Cluster loose input paths into recipe families.
//!
//! When several recipes are linted at once, include files shared between them
//! would otherwise be attributed to the wrong recipe in a single model. Every
//! family gets its own group, and therefore its own model.

use camino::{Utf8Path, Utf8PathBuf};
use recipelint_types::{AppendPattern, FileKind};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Files believed to belong to one recipe family, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: String,
    pub files: Vec<Utf8PathBuf>,
}

/// Family key of a file: its stem without the last `_` segment, `%` removed.
///
/// `foo_1.0.bb` -> `foo`, `foo-bar_git.bb` -> `foo-bar`, `foo_%.bbappend` ->
/// `foo`. A stem without `_` gives the empty key.
pub fn group_key(path: &Utf8Path) -> String {
    let stem = path.file_stem().unwrap_or_default();
    let mut segments: Vec<&str> = stem.split('_').collect();
    segments.pop();
    segments.join("_").replace('%', "")
}

struct Slot {
    key: String,
    /// Input indices; a set so duplicates collapse, ordered so output follows input.
    members: BTreeSet<usize>,
}

#[derive(Default)]
struct Builder {
    slots: Vec<Slot>,
    by_key: HashMap<String, usize>,
}

impl Builder {
    fn insert(&mut self, key: String, index: usize) {
        let slot = match self.by_key.get(&key) {
            Some(&s) => s,
            None => {
                self.by_key.insert(key.clone(), self.slots.len());
                self.slots.push(Slot {
                    key,
                    members: BTreeSet::new(),
                });
                self.slots.len() - 1
            }
        };
        self.slots[slot].members.insert(index);
    }
}

/// Group `files` into recipe families.
///
/// Recipes are grouped by [`group_key`]. Each append joins the first existing
/// group holding a file its wildcard name matches; unmatched appends are
/// grouped by their own key. Other files are dropped. Groups come out in
/// creation order and each group's files in input order.
pub fn group_files(files: &[Utf8PathBuf]) -> Vec<Group> {
    let mut seen: HashSet<&Utf8Path> = HashSet::new();
    let mut recipes = Vec::new();
    let mut appends = Vec::new();

    for (index, path) in files.iter().enumerate() {
        if !seen.insert(path.as_path()) {
            continue;
        }
        match FileKind::classify(path) {
            FileKind::Recipe => recipes.push(index),
            FileKind::Append => appends.push(index),
            FileKind::Other => debug!(path = %path, "not a recipe or append; skipped"),
        }
    }

    let mut builder = Builder::default();

    for index in recipes {
        builder.insert(group_key(&files[index]), index);
    }

    for index in appends {
        let path = &files[index];
        let target = AppendPattern::for_append(path).and_then(|pattern| {
            builder.slots.iter().position(|slot| {
                slot.members
                    .iter()
                    .any(|&m| pattern.matches(&files[m]))
            })
        });
        match target {
            Some(slot) => {
                debug!(path = %path, group = %builder.slots[slot].key, "append matched");
                builder.slots[slot].members.insert(index);
            }
            None => {
                debug!(path = %path, "append without recipe in batch");
                builder.insert(group_key(path), index);
            }
        }
    }

    builder
        .slots
        .into_iter()
        .map(|slot| Group {
            key: slot.key,
            files: slot.members.iter().map(|&i| files[i].clone()).collect(),
        })
        .collect()
}
