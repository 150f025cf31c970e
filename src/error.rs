//! Error types at the crate's process boundary, mapped to exit codes in `main`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to load {path}: image is empty, no origin word")]
    Empty { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no image files given")]
    Usage,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to acquire terminal/line-editor resources: {0}")]
    Resource(#[source] io::Error),
}
