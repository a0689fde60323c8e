use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{analysis, dock, io};

/// Errors that abort an evaluation or generation run.
///
/// Docking failures of individual candidates never surface here; they are
/// recorded on the affected row instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A structure file could not be read or written.
    #[error(transparent)]
    Structure(#[from] io::Error),

    /// A geometric or selection step failed for the named input.
    #[error("'{}': {source}", .path.display())]
    Analysis {
        path: PathBuf,
        #[source]
        source: analysis::Error,
    },

    #[error(transparent)]
    Dock(#[from] dock::Error),

    /// A filesystem operation on the run directory failed.
    #[error("'{}': {source}", .path.display())]
    Fs {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to serialize manifest: {0}")]
    ManifestSerialize(#[from] toml::ser::Error),

    #[error("failed to write summary: {0}")]
    Summary(#[from] csv::Error),

    #[error("no batches found under '{}'", .0.display())]
    NoBatches(PathBuf),

    #[error("candidate file is missing: '{}'", .0.display())]
    MissingCandidate(PathBuf),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}

impl Error {
    pub(crate) fn analysis(path: &Path, source: analysis::Error) -> Self {
        Self::Analysis {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn fs(path: &Path, source: std::io::Error) -> Self {
        Self::Fs {
            path: path.to_path_buf(),
            source,
        }
    }
}
