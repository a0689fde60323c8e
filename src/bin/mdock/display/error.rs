use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

/// First error of type `T` anywhere in the chain.
fn find<T: std::error::Error + 'static>(err: &Error) -> Option<&T> {
    err.chain().find_map(|cause| cause.downcast_ref::<T>())
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_structure_hints(err);
        collector.collect_analysis_hints(err);
        collector.collect_docking_hints(err);
        collector.collect_generation_hints(err);
        collector.collect_run_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_structure_hints(&mut self, err: &Error) {
        use mutant_dock::io::{Error as IoError, Format};

        let Some(io_err) = find::<IoError>(err) else {
            return;
        };

        self.mark_typed();

        match io_err.root() {
            IoError::Io { source } => self.collect_std_io_hints(source),

            IoError::Parse { format, line, .. } => {
                self.add(format!(
                    "Parser stopped near line {} of the {} input",
                    line, format
                ));
                self.add("Inspect the file around that line for malformed records");
                match format {
                    Format::Pdb => {
                        self.add("PDB: ATOM/HETATM coordinates must sit in columns 31-54");
                    }
                    Format::Sdf => {
                        self.add("SDF: only V2000 connection tables are read");
                        self.add("SDF: check the counts line against the atom block");
                    }
                    Format::Pdbqt => {}
                }
            }

            IoError::UnknownFormat(path) => {
                self.add(format!(
                    "Could not tell the format of '{}' from its extension",
                    path.display()
                ));
                self.add("Receptors must end in .pdb, ligands in .sdf or .mol");
            }

            IoError::UnsupportedReadFormat(format) => {
                self.add(format!("'{}' files cannot be read as input", format));
                self.add("Convert the structure to PDB (receptor) or SDF (ligand)");
            }

            IoError::InFile { .. } => {}
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
                self.add("File contains invalid or truncated data");
            }

            ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_analysis_hints(&mut self, err: &Error) {
        use mutant_dock::analysis::Error as AnalysisError;

        let Some(analysis_err) = find::<AnalysisError>(err) else {
            return;
        };

        self.mark_typed();

        match analysis_err {
            AnalysisError::EmptyLigand => {
                self.add("The ligand file contains no atoms");
                self.add("Check that the SDF holds a connection table, not only a name");
            }

            AnalysisError::DegenerateWindow { .. } => {
                self.add("The docking box collapsed on at least one axis");
                self.add("Increase --padding or check the ligand coordinates");
            }

            AnalysisError::InvalidRadius(_) => {
                self.add("Radii must be non-negative and --outer at least --inner");
            }

            AnalysisError::SelectionInvariant(_) => {
                self.add("Pocket selection produced an inconsistent result");
                self.add("This indicates a bug; please report it with the input files");
            }

            AnalysisError::InvalidTemperature(_) => {
                self.add("Set a positive temperature in Kelvin (default 298)");
            }
        }
    }

    fn collect_docking_hints(&mut self, err: &Error) {
        use mutant_dock::dock::{Error as DockError, FailureReason};

        let Some(dock_err) = find::<DockError>(err) else {
            return;
        };

        self.mark_typed();

        let mut reason = match dock_err {
            DockError::InvalidConfig(msg) => {
                if msg.contains("all-poses") {
                    self.add("Evaluation averages over every pose");
                    self.add("Remove mode = \"best-only\" from the [docking] section");
                } else {
                    self.add("Exhaustiveness, pose count and timeout must all be at least 1");
                }
                return;
            }
            DockError::Failed { reason, .. } => reason,
        };
        while let FailureReason::Preparation { role, source } = reason {
            self.add(format!("Open Babel could not convert the {role} to PDBQT"));
            reason = source.as_ref();
        }

        match reason {
            FailureReason::Spawn { program, .. } => {
                self.add(format!("'{}' could not be started", program));
                self.add("Install it or point --vina / --obabel at the executable");
            }

            FailureReason::Exit { program, .. } => {
                self.add(format!("'{}' reported an error; see its output above", program));
            }

            FailureReason::Timeout { .. } => {
                self.add("Raise --timeout or lower --exhaustiveness");
            }

            FailureReason::Unparsable(_) | FailureReason::NoPoses => {
                self.add("The docking engine output could not be read");
                self.add("Run again with -v to log the engine command lines");
            }

            FailureReason::Io(_) => {
                self.add("Scratch or pose files could not be written");
                self.add("Check free space in the temp directory and --write-poses");
            }

            FailureReason::Preparation { .. } => {}
        }
    }

    fn collect_generation_hints(&mut self, err: &Error) {
        use mutant_dock::generate::Error as GenerateError;

        let Some(gen_err) = find::<GenerateError>(err) else {
            return;
        };

        match gen_err {
            GenerateError::UnsupportedLigand(_) => {
                self.mark_typed();
                self.add("Batches store the ligand as orig.sdf; pass an .sdf ligand");
            }

            GenerateError::Generator(_) => {
                self.mark_typed();
                self.add("The generator command failed; run it by hand on features.json");
                self.add("Extra generator flags go through --generator-arg");
            }

            GenerateError::NoCandidates(_) => {
                self.mark_typed();
                self.add("The generator must write <i>_whole.pdb and <i>.sdf for i = 0..");
            }

            GenerateError::Features(_) => {
                self.mark_typed();
                self.add("Pocket features could not be serialized");
            }

            _ => {}
        }
    }

    fn collect_run_hints(&mut self, err: &Error) {
        use mutant_dock::eval::Error as EvalError;

        let Some(eval_err) = find::<EvalError>(err) else {
            return;
        };

        match eval_err {
            EvalError::NoBatches(_) => {
                self.mark_typed();
                self.add("Run 'mdock generate' first, or point -o at a run directory");
                self.add("Batches are directories named batch_0, batch_1, ...");
            }

            EvalError::MissingCandidate(_) => {
                self.mark_typed();
                self.add("A candidate listed in manifest.toml is missing on disk");
                self.add("Restore the file or fix the candidate count in the manifest");
            }

            EvalError::Config(_) => {
                self.mark_typed();
                self.add("Run configuration has invalid TOML or unknown values");
                self.add("Sections: [window], [pocket], [docking], [affinity]");
            }

            EvalError::WorkerPool(_) => {
                self.mark_typed();
                self.add("Lower --jobs");
            }

            _ => {}
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}
