use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{analysis, eval, io};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Structure(#[from] io::Error),

    #[error("'{}': {source}", .path.display())]
    Analysis {
        path: PathBuf,
        #[source]
        source: analysis::Error,
    },

    #[error("'{}': {source}", .path.display())]
    Fs {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pocket features: {0}")]
    Features(#[from] serde_json::Error),

    /// The ligand must be an SDF/MOL file to be stored as `orig.sdf`.
    #[error("ligand '{}' is not an SDF file", .0.display())]
    UnsupportedLigand(PathBuf),

    /// The generator process failed.
    #[error("generator failed: {0}")]
    Generator(String),

    /// The generator finished but wrote no candidates.
    #[error("generator wrote no candidates to '{}'", .0.display())]
    NoCandidates(PathBuf),

    #[error(transparent)]
    Run(#[from] eval::Error),
}

impl Error {
    pub(crate) fn fs(path: &Path, source: std::io::Error) -> Self {
        Self::Fs {
            path: path.to_path_buf(),
            source,
        }
    }
}
