//! In-memory model of one recipe family.
//!
//! A [`SharedModel`] ingests the files of a group, links appends to the
//! recipes they patch and includes to the files that pull them in, and hands
//! rules the items of a file (optionally together with every linked file).
//! [`Stash`] is the line-oriented implementation used by the binary.

mod error;
mod item;
mod stash;

pub use error::StashError;
pub use item::{split_items, Item, ItemKind};
pub use stash::Stash;

use camino::{Utf8Path, Utf8PathBuf};

/// Queryable model shared by every rule run against one group.
pub trait SharedModel {
    /// Ingest `path`. Fails with [`StashError::Unreadable`] when the file
    /// cannot be opened or read; the model is left unchanged in that case.
    fn add_file(&mut self, path: &Utf8Path) -> Result<(), StashError>;

    /// Resolve append/recipe relationships. Call once after the last `add_file`.
    fn finalize(&mut self);

    /// Recipe files known to the model, in ingestion order.
    fn recipes(&self) -> Vec<Utf8PathBuf>;

    /// Append files that matched no recipe, in ingestion order.
    fn lone_appends(&self) -> Vec<Utf8PathBuf>;

    /// Every other file transitively linked to `path`, in ingestion order.
    fn links_for_file(&self, path: &Utf8Path) -> Vec<Utf8PathBuf>;

    /// Items of `path`, plus those of its linked files unless `nolink`.
    fn items_for(&self, path: &Utf8Path, nolink: bool) -> Vec<&Item>;

    /// Mutable variant of [`SharedModel::items_for`] for fix operations.
    fn items_for_mut(&mut self, path: &Utf8Path, nolink: bool) -> Vec<&mut Item>;
}
