use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum StashError {
    /// The file could not be opened or decoded.
    #[error("{path}: {message}")]
    Unreadable { path: Utf8PathBuf, message: String },
}
