use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::prepare::MoleculeRole;

/// Why a docking run did not produce poses.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FailureReason {
    /// The external program could not be started.
    #[error("failed to launch '{program}': {detail}")]
    Spawn { program: String, detail: String },

    /// The external program exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: String,
        stderr: String,
    },

    /// The external program was killed after exceeding its time budget.
    #[error("'{program}' did not finish within {}s", .limit.as_secs())]
    Timeout { program: String, limit: Duration },

    /// The engine output could not be interpreted.
    #[error("unparsable engine output: {0}")]
    Unparsable(String),

    /// The engine finished but reported no poses.
    #[error("engine returned no poses")]
    NoPoses,

    /// Converting an input structure to the engine format failed.
    #[error("{role} preparation failed: {source}")]
    Preparation {
        role: MoleculeRole,
        #[source]
        source: Box<FailureReason>,
    },

    /// Scratch or pose files could not be created or read.
    #[error("i/o error: {0}")]
    Io(String),
}

impl FailureReason {
    pub(crate) fn io(err: impl std::fmt::Display) -> Self {
        Self::Io(err.to_string())
    }

    pub(crate) fn preparation(role: MoleculeRole, source: FailureReason) -> Self {
        Self::Preparation {
            role,
            source: Box::new(source),
        }
    }
}

/// Errors raised by the docking adapter.
#[derive(Debug, Error)]
pub enum Error {
    /// Docking a receptor/ligand pair failed. This is the only error a
    /// docking call produces; callers isolate it per candidate.
    #[error("docking failed for receptor '{}' and ligand '{}': {reason}", .receptor.display(), .ligand.display())]
    Failed {
        receptor: PathBuf,
        ligand: PathBuf,
        #[source]
        reason: FailureReason,
    },

    /// The docking configuration is unusable.
    #[error("invalid docking configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn failed(receptor: &Path, ligand: &Path, reason: FailureReason) -> Self {
        Self::Failed {
            receptor: receptor.to_path_buf(),
            ligand: ligand.to_path_buf(),
            reason,
        }
    }

    /// The underlying failure reason, if this is a docking failure.
    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            Self::Failed { reason, .. } => Some(reason),
            Self::InvalidConfig(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_names_both_files() {
        let err = Error::failed(
            Path::new("batch_0/1_whole.pdb"),
            Path::new("batch_0/1.sdf"),
            FailureReason::NoPoses,
        );
        let msg = err.to_string();
        assert!(msg.contains("batch_0/1_whole.pdb"));
        assert!(msg.contains("batch_0/1.sdf"));
        assert_eq!(err.reason(), Some(&FailureReason::NoPoses));
    }

    #[test]
    fn timeout_message_reports_seconds() {
        let reason = FailureReason::Timeout {
            program: "vina".into(),
            limit: Duration::from_secs(600),
        };
        assert_eq!(reason.to_string(), "'vina' did not finish within 600s");
    }

    #[test]
    fn preparation_wraps_inner_reason() {
        let reason = FailureReason::preparation(
            MoleculeRole::Receptor,
            FailureReason::Spawn {
                program: "obabel".into(),
                detail: "not found".into(),
            },
        );
        let msg = reason.to_string();
        assert!(msg.starts_with("receptor preparation failed"));
        assert!(msg.contains("obabel"));
    }
}
