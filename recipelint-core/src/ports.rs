//! Port traits abstracting side effects away from the pipeline.

use camino::Utf8Path;
use recipelint_stash::StashError;

/// File operations of the fix transaction.
pub trait FixPort {
    /// Move `path` to `backup`, replacing any previous backup.
    fn backup(&self, path: &Utf8Path, backup: &Utf8Path) -> anyhow::Result<()>;
    fn write(&self, path: &Utf8Path, contents: &str) -> anyhow::Result<()>;
}

/// Observer for progress and recoverable per-file problems.
///
/// Purely informational: nothing here influences control flow.
pub trait RunEvents {
    fn file_unreadable(&mut self, _err: &StashError) {}
    fn files_checked(&mut self, _done: usize, _total: usize) {}
    fn fixes_applied(&mut self, _path: &Utf8Path) {}
}
