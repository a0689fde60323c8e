//! Conversion of receptor and ligand files into the docking input format.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::FailureReason;
use super::process;

/// Which side of the complex a file holds. Receptors are written rigid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoleculeRole {
    Receptor,
    Ligand,
}

impl fmt::Display for MoleculeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoleculeRole::Receptor => write!(f, "receptor"),
            MoleculeRole::Ligand => write!(f, "ligand"),
        }
    }
}

/// Produces a charge-annotated PDBQT file from a PDB or SDF input.
pub trait Preparer: Send + Sync {
    fn prepare(&self, input: &Path, role: MoleculeRole, output: &Path)
    -> Result<(), FailureReason>;
}

/// Open Babel command-line converter.
///
/// Runs `obabel <in> -opdbqt -O <out> -h [-xc -xr] --partialcharge gasteiger`;
/// hydrogens are added and Gasteiger charges assigned. Receptors are
/// written as rigid molecules without torsion trees.
#[derive(Debug, Clone)]
pub struct OpenBabelPreparer {
    executable: PathBuf,
    timeout: Duration,
}

impl OpenBabelPreparer {
    pub fn new(executable: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            timeout,
        }
    }

    fn command(&self, input: &Path, role: MoleculeRole, output: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(input).arg("-opdbqt").arg("-O").arg(output).arg("-h");
        if role == MoleculeRole::Receptor {
            cmd.args(["-xc", "-xr"]);
        }
        cmd.args(["--partialcharge", "gasteiger"]);
        cmd
    }
}

impl Default for OpenBabelPreparer {
    fn default() -> Self {
        Self::new("obabel", Duration::from_secs(600))
    }
}

impl Preparer for OpenBabelPreparer {
    fn prepare(
        &self,
        input: &Path,
        role: MoleculeRole,
        output: &Path,
    ) -> Result<(), FailureReason> {
        let wrap = |reason| FailureReason::preparation(role, reason);

        process::run(&mut self.command(input, role, output), self.timeout).map_err(wrap)?;

        // obabel exits 0 even when it converts zero molecules.
        let written = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(wrap(FailureReason::Unparsable(format!(
                "no molecules converted from '{}'",
                input.display()
            ))));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn receptor_command_is_rigid() {
        let prep = OpenBabelPreparer::default();
        let cmd = prep.command(
            Path::new("rec.pdb"),
            MoleculeRole::Receptor,
            Path::new("rec.pdbqt"),
        );
        assert_eq!(cmd.get_program(), "obabel");
        assert_eq!(
            args(&cmd),
            [
                "rec.pdb",
                "-opdbqt",
                "-O",
                "rec.pdbqt",
                "-h",
                "-xc",
                "-xr",
                "--partialcharge",
                "gasteiger"
            ]
        );
    }

    #[test]
    fn ligand_command_keeps_torsions() {
        let prep = OpenBabelPreparer::default();
        let cmd = prep.command(
            Path::new("lig.sdf"),
            MoleculeRole::Ligand,
            Path::new("lig.pdbqt"),
        );
        let a = args(&cmd);
        assert!(!a.iter().any(|x| x == "-xr"));
        assert_eq!(a.last().map(String::as_str), Some("gasteiger"));
    }

    #[test]
    fn missing_executable_is_a_preparation_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let prep = OpenBabelPreparer::new(
            "definitely-not-obabel-xyz",
            Duration::from_secs(1),
        );
        let err = prep
            .prepare(
                Path::new("lig.sdf"),
                MoleculeRole::Ligand,
                &dir.path().join("lig.pdbqt"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            FailureReason::Preparation {
                role: MoleculeRole::Ligand,
                ..
            }
        ));
    }
}
