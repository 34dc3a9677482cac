use crate::error::StashError;
use crate::item::{split_items, Item, ItemKind};
use crate::SharedModel;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use recipelint_types::{AppendPattern, FileKind};
use std::collections::{BTreeSet, HashMap, VecDeque};
use tracing::debug;

#[derive(Debug)]
struct StashFile {
    path: Utf8PathBuf,
    kind: FileKind,
    items: Vec<Item>,
}

/// Line-oriented [`SharedModel`].
///
/// Files are keyed by the path they were added (or resolved) under.
///
/// Include edges point from the including file to the included one. A
/// recipe or append links to everything it pulls in (nested includes too) and
/// to its matched appends or recipes with their includes. An include file
/// links only to the files that include it directly, so two recipes sharing
/// an include never see each other.
#[derive(Debug, Default)]
pub struct Stash {
    files: Vec<StashFile>,
    index: HashMap<Utf8PathBuf, usize>,
    includes: HashMap<usize, BTreeSet<usize>>,
    matches: HashMap<usize, BTreeSet<usize>>,
    lone_appends: Vec<usize>,
}

impl Stash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths of every ingested file, includes included, in ingestion order.
    pub fn files(&self) -> impl Iterator<Item = &Utf8Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    fn ingest(&mut self, path: &Utf8Path) -> Result<usize, StashError> {
        if let Some(&idx) = self.index.get(path) {
            return Ok(idx);
        }

        let contents = fs::read_to_string(path).map_err(|e| StashError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let idx = self.files.len();
        let items = split_items(path, &contents);
        let includes: Vec<String> = items
            .iter()
            .filter_map(|i| match i.kind() {
                ItemKind::Include { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect();

        self.files.push(StashFile {
            path: path.to_path_buf(),
            kind: FileKind::classify(path),
            items,
        });
        self.index.insert(path.to_path_buf(), idx);
        debug!(path = %path, "ingested");

        for include in includes {
            let Some(target) = resolve_include(path, &include) else {
                debug!(from = %path, include = %include, "include not resolved");
                continue;
            };
            match self.ingest(&target) {
                Ok(inc_idx) if inc_idx != idx => {
                    self.includes.entry(idx).or_default().insert(inc_idx);
                }
                Ok(_) => {}
                Err(e) => debug!(from = %path, error = %e, "include not readable"),
            }
        }

        Ok(idx)
    }

    fn link_match(&mut self, recipe: usize, append: usize) {
        self.matches.entry(recipe).or_default().insert(append);
        self.matches.entry(append).or_default().insert(recipe);
    }

    /// `start` plus every file reachable over include edges.
    fn pulled_in(&self, start: usize) -> BTreeSet<usize> {
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(cur) = queue.pop_front() {
            for &next in self.includes.get(&cur).into_iter().flatten() {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Indices linked to `start`, excluding `start`, ascending.
    fn linked(&self, start: usize) -> BTreeSet<usize> {
        let mut linked: BTreeSet<usize> = match self.files[start].kind {
            FileKind::Other => self
                .includes
                .iter()
                .filter(|(_, targets)| targets.contains(&start))
                .map(|(&from, _)| from)
                .collect(),
            FileKind::Recipe | FileKind::Append => {
                let mut linked = self.pulled_in(start);
                for &other in self.matches.get(&start).into_iter().flatten() {
                    linked.extend(self.pulled_in(other));
                }
                linked
            }
        };
        linked.remove(&start);
        linked
    }

    fn selection(&self, path: &Utf8Path, nolink: bool) -> BTreeSet<usize> {
        let Some(&idx) = self.index.get(path) else {
            return BTreeSet::new();
        };
        let mut sel = if nolink {
            BTreeSet::new()
        } else {
            self.linked(idx)
        };
        sel.insert(idx);
        sel
    }
}

fn resolve_include(from: &Utf8Path, include: &str) -> Option<Utf8PathBuf> {
    if include.contains("${") {
        return None;
    }
    let include = Utf8Path::new(include);
    let mut candidates = Vec::new();
    if include.is_relative()
        && let Some(dir) = from.parent()
    {
        candidates.push(dir.join(include));
    }
    candidates.push(include.to_path_buf());
    candidates.into_iter().find(|c| c.is_file())
}

impl SharedModel for Stash {
    fn add_file(&mut self, path: &Utf8Path) -> Result<(), StashError> {
        self.ingest(path).map(|_| ())
    }

    fn finalize(&mut self) {
        self.lone_appends.clear();
        self.matches.clear();

        let recipes: Vec<usize> = (0..self.files.len())
            .filter(|&i| self.files[i].kind == FileKind::Recipe)
            .collect();
        let appends: Vec<usize> = (0..self.files.len())
            .filter(|&i| self.files[i].kind == FileKind::Append)
            .collect();

        for append in appends {
            let matched: Vec<usize> = match AppendPattern::for_append(&self.files[append].path) {
                Some(pattern) => recipes
                    .iter()
                    .copied()
                    .filter(|&r| pattern.matches(&self.files[r].path))
                    .collect(),
                None => Vec::new(),
            };
            if matched.is_empty() {
                debug!(path = %self.files[append].path, "lone append");
                self.lone_appends.push(append);
            }
            for recipe in matched {
                self.link_match(recipe, append);
            }
        }
    }

    fn recipes(&self) -> Vec<Utf8PathBuf> {
        self.files
            .iter()
            .filter(|f| f.kind == FileKind::Recipe)
            .map(|f| f.path.clone())
            .collect()
    }

    fn lone_appends(&self) -> Vec<Utf8PathBuf> {
        self.lone_appends
            .iter()
            .map(|&i| self.files[i].path.clone())
            .collect()
    }

    fn links_for_file(&self, path: &Utf8Path) -> Vec<Utf8PathBuf> {
        let Some(&idx) = self.index.get(path) else {
            return Vec::new();
        };
        self.linked(idx)
            .into_iter()
            .map(|i| self.files[i].path.clone())
            .collect()
    }

    fn items_for(&self, path: &Utf8Path, nolink: bool) -> Vec<&Item> {
        self.selection(path, nolink)
            .into_iter()
            .flat_map(|i| self.files[i].items.iter())
            .collect()
    }

    fn items_for_mut(&mut self, path: &Utf8Path, nolink: bool) -> Vec<&mut Item> {
        let sel = self.selection(path, nolink);
        self.files
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| sel.contains(i))
            .flat_map(|(_, f)| f.items.iter_mut())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn root(td: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(td.path().to_path_buf()).expect("utf8")
    }

    #[test]
    fn include_cycle_is_ingested_once() {
        let td = TempDir::new().unwrap();
        let root = root(&td);
        fs::write(root.join("a_1.0.bb"), "require a.inc\n").unwrap();
        fs::write(root.join("a.inc"), "require b.inc\n").unwrap();
        fs::write(root.join("b.inc"), "include a.inc\n").unwrap();

        let mut stash = Stash::new();
        stash.add_file(&root.join("a_1.0.bb")).unwrap();
        stash.finalize();

        assert_eq!(stash.files().count(), 3);
        assert_eq!(
            stash.links_for_file(&root.join("a_1.0.bb")),
            vec![root.join("a.inc"), root.join("b.inc")]
        );
        assert_eq!(
            stash.links_for_file(&root.join("b.inc")),
            vec![root.join("a.inc")]
        );
    }

    #[test]
    fn shared_include_does_not_link_its_includers() {
        let td = TempDir::new().unwrap();
        let root = root(&td);
        fs::write(root.join("a_1.0.bb"), "require a.inc\n").unwrap();
        fs::write(root.join("a_2.0.bb"), "require a.inc\nLICENSE = \"MIT\"\n").unwrap();
        fs::write(root.join("a.inc"), "SUMMARY = \"a\"\n").unwrap();

        let mut stash = Stash::new();
        stash.add_file(&root.join("a_1.0.bb")).unwrap();
        stash.add_file(&root.join("a_2.0.bb")).unwrap();
        stash.finalize();

        assert_eq!(
            stash.links_for_file(&root.join("a_1.0.bb")),
            vec![root.join("a.inc")]
        );
        assert_eq!(
            stash.links_for_file(&root.join("a.inc")),
            vec![root.join("a_1.0.bb"), root.join("a_2.0.bb")]
        );
        let names: Vec<Option<&str>> = stash
            .items_for(&root.join("a_1.0.bb"), false)
            .into_iter()
            .map(|i| i.variable_name())
            .collect();
        assert_eq!(names, vec![None, Some("SUMMARY")]);
    }

    #[test]
    fn variable_includes_are_ignored() {
        let td = TempDir::new().unwrap();
        let root = root(&td);
        fs::write(root.join("a_1.0.bb"), "require ${BPN}.inc\n").unwrap();
        fs::write(root.join("${BPN}.inc"), "A = \"1\"\n").unwrap();

        let mut stash = Stash::new();
        stash.add_file(&root.join("a_1.0.bb")).unwrap();
        assert_eq!(stash.files().count(), 1);
    }

    #[test]
    fn unknown_path_has_no_items_or_links() {
        let stash = Stash::new();
        assert!(stash.items_for(Utf8Path::new("nope.bb"), false).is_empty());
        assert!(stash.links_for_file(Utf8Path::new("nope.bb")).is_empty());
    }
}
