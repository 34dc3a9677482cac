//! Default port implementations.

use crate::ports::{FixPort, RunEvents};
use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;

/// Filesystem-backed fix operations.
#[derive(Debug, Clone, Default)]
pub struct FsFixPort;

impl FixPort for FsFixPort {
    fn backup(&self, path: &Utf8Path, backup: &Utf8Path) -> anyhow::Result<()> {
        fs::rename(path, backup).with_context(|| format!("back up {} to {}", path, backup))
    }

    fn write(&self, path: &Utf8Path, contents: &str) -> anyhow::Result<()> {
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }
}

/// Events sink that ignores everything.
#[derive(Debug, Clone, Default)]
pub struct NoEvents;

impl RunEvents for NoEvents {}
