use super::Format;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("cannot infer structure format from '{}'", .0.display())]
    UnknownFormat(PathBuf),

    #[error("the '{0}' format is not supported for this read operation")]
    UnsupportedReadFormat(Format),

    #[error("'{}': {source}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    /// Attaches the offending file path to an error.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            already @ Error::InFile { .. } => already,
            other => Error::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping any path context.
    pub fn root(&self) -> &Error {
        match self {
            Error::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}
