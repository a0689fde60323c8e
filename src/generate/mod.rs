//! Boundary to the generative model.
//!
//! The model itself is external. This module builds its input
//! ([`PocketFeatures`]), calls it through the [`PocketGenerator`] trait and
//! lays its output out as numbered batches that the evaluation step
//! consumes. [`CommandGenerator`] drives a model wrapped as an executable.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::analysis::pocket::PocketSelector;
use crate::dock::process;
use crate::eval::{BatchEntry, BatchLayout, BatchManifest};
use crate::io::{self, Format};

mod error;
pub mod features;

pub use error::Error;
pub use features::PocketFeatures;

/// What one generator call produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub candidates: usize,
    /// Free-form output of the model, kept for logging.
    pub diagnostics: String,
}

/// A generative model producing receptor variants.
///
/// Given `batch.len()` feature sets, an implementation writes candidate `i`
/// as `{i}_whole.pdb` and `{i}.sdf` into `out_dir`.
pub trait PocketGenerator: Send + Sync {
    fn generate(&self, batch: &[PocketFeatures], out_dir: &Path)
    -> Result<GenerationReport, Error>;
}

/// A model wrapped as an executable.
///
/// The command is invoked once per batch as
/// `<program> <args...> --features <dir>/features.json --out <dir>
/// --candidates <n> [--seed <seed>]`.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
    seed: Option<u64>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(3600),
            seed: None,
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    fn command(&self, features: &Path, out_dir: &Path, candidates: usize) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--features")
            .arg(features)
            .arg("--out")
            .arg(out_dir)
            .arg("--candidates")
            .arg(candidates.to_string());
        if let Some(seed) = self.seed {
            cmd.arg("--seed").arg(seed.to_string());
        }
        cmd
    }
}

impl PocketGenerator for CommandGenerator {
    fn generate(
        &self,
        batch: &[PocketFeatures],
        out_dir: &Path,
    ) -> Result<GenerationReport, Error> {
        let features_path = out_dir.join(crate::eval::layout::FEATURES_FILE);
        features::write_batch(&features_path, batch)?;

        let output = process::run(
            &mut self.command(&features_path, out_dir, batch.len()),
            self.timeout,
        )
        .map_err(|reason| Error::Generator(reason.to_string()))?;

        let diagnostics = String::from_utf8_lossy(&output.stdout).into_owned();
        for line in diagnostics.lines().filter(|l| !l.trim().is_empty()) {
            log::debug!("generator: {line}");
        }
        Ok(GenerationReport {
            candidates: batch.len(),
            diagnostics,
        })
    }
}

/// Pocket extraction plus batched generation into a run directory.
pub struct Pipeline<'a> {
    generator: &'a dyn PocketGenerator,
    selector: PocketSelector,
}

impl<'a> Pipeline<'a> {
    pub fn new(generator: &'a dyn PocketGenerator, selector: PocketSelector) -> Self {
        Self {
            generator,
            selector,
        }
    }

    /// Reads both inputs and extracts the pocket features.
    pub fn featurize(&self, receptor: &Path, ligand: &Path) -> Result<PocketFeatures, Error> {
        let structure = io::read_receptor(receptor)?;
        let geometry = io::read_ligand(ligand)?;
        let pocket = self
            .selector
            .select(&structure, &geometry.positions)
            .map_err(|source| Error::Analysis {
                path: ligand.to_path_buf(),
                source,
            })?;
        log::info!(
            "pocket of {} residues ({} editable): {}",
            pocket.residue_count(),
            pocket.editable_count(),
            pocket.sequence
        );
        Ok(PocketFeatures::from_pocket(&pocket, &geometry, receptor, ligand))
    }

    /// Materializes `batches` new batches of `candidates` variants each
    /// under `out_dir`, after any batches already recorded there.
    ///
    /// Each batch directory receives copies of the inputs as `orig.pdb` and
    /// `orig.sdf` next to the generated candidates. The manifest is saved
    /// after every batch, so an interrupted run keeps what it finished.
    pub fn generate_batches(
        &self,
        receptor: &Path,
        ligand: &Path,
        out_dir: &Path,
        batches: usize,
        candidates: usize,
    ) -> Result<BatchManifest, Error> {
        if Format::from_path(ligand) != Some(Format::Sdf) {
            return Err(Error::UnsupportedLigand(ligand.to_path_buf()));
        }
        std::fs::create_dir_all(out_dir).map_err(|e| Error::fs(out_dir, e))?;

        let features = self.featurize(receptor, ligand)?;
        let batch = vec![features; candidates];

        let mut manifest = BatchManifest::load_or_discover(out_dir)?;
        manifest.receptor = Some(receptor.to_path_buf());
        manifest.ligand = Some(ligand.to_path_buf());

        for _ in 0..batches {
            let layout = BatchLayout::new(out_dir, manifest.next_index());
            std::fs::create_dir_all(layout.dir()).map_err(|e| Error::fs(layout.dir(), e))?;
            copy(receptor, &layout.source_receptor())?;
            copy(ligand, &layout.source_ligand())?;

            let report = self.generator.generate(&batch, layout.dir())?;
            let found = layout.count_candidates();
            if found == 0 {
                return Err(Error::NoCandidates(layout.dir().to_path_buf()));
            }
            if found < report.candidates {
                log::warn!(
                    "batch {}: expected {} candidates, found {found}",
                    layout.index(),
                    report.candidates
                );
            }
            log::info!("batch {}: {found} candidates", layout.index());

            manifest.record(BatchEntry {
                index: layout.index(),
                candidates: found,
                generated_at: Some(chrono::Local::now().to_rfc3339()),
            });
            manifest.save(out_dir)?;
        }
        Ok(manifest)
    }
}

fn copy(from: &Path, to: &Path) -> Result<(), Error> {
    std::fs::copy(from, to).map_err(|e| Error::fs(from, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::element::Element;
    use crate::model::structure::Structure;
    use std::fs;
    use std::sync::Mutex;

    const SDF: &str = "lig\n  test\n\n  1  0  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0\nM  END\n$$$$\n";

    /// Writes `batch.len()` copies of a fixed receptor and remembers what
    /// it was given.
    #[derive(Default)]
    struct CopyingGenerator {
        calls: Mutex<Vec<(usize, PathBuf)>>,
        produce: Option<usize>,
    }

    impl PocketGenerator for CopyingGenerator {
        fn generate(
            &self,
            batch: &[PocketFeatures],
            out_dir: &Path,
        ) -> Result<GenerationReport, Error> {
            self.calls
                .lock()
                .unwrap()
                .push((batch.len(), out_dir.to_path_buf()));
            let n = self.produce.unwrap_or(batch.len());
            for i in 0..n {
                fs::copy(out_dir.join("orig.pdb"), out_dir.join(format!("{i}_whole.pdb")))
                    .unwrap();
                fs::write(out_dir.join(format!("{i}.sdf")), SDF).unwrap();
            }
            Ok(GenerationReport {
                candidates: batch.len(),
                diagnostics: String::new(),
            })
        }
    }

    fn inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let mut s = Structure::new();
        for (i, name) in ["ALA", "GLY", "SER"].iter().enumerate() {
            let r = s.add_residue(name, 'A', i as i32 + 1);
            s.add_atom(r, "CA", Element::C, [2.0 + 4.0 * i as f64, 0.0, 0.0]);
        }
        let receptor = dir.join("rec.pdb");
        io::write_pdb(&receptor, &s).unwrap();
        let ligand = dir.join("lig.sdf");
        fs::write(&ligand, SDF).unwrap();
        (receptor, ligand)
    }

    #[test]
    fn featurize_selects_pocket() {
        let dir = tempfile::tempdir().unwrap();
        let (receptor, ligand) = inputs(dir.path());
        let generator = CopyingGenerator::default();
        let pipeline = Pipeline::new(&generator, PocketSelector::default());
        let features = pipeline.featurize(&receptor, &ligand).unwrap();
        assert_eq!(features.seq, "AGS");
        assert_eq!(features.full_seq_idx, [0]);
    }

    #[test]
    fn batches_are_laid_out_and_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let (receptor, ligand) = inputs(dir.path());
        let out = dir.path().join("run");
        let generator = CopyingGenerator::default();
        let pipeline = Pipeline::new(&generator, PocketSelector::default());

        let manifest = pipeline
            .generate_batches(&receptor, &ligand, &out, 2, 3)
            .unwrap();
        assert_eq!(manifest.batches.len(), 2);
        assert_eq!(manifest.total_candidates(), 6);
        for b in 0..2 {
            let layout = BatchLayout::new(&out, b);
            assert!(layout.source_receptor().is_file());
            assert!(layout.source_ligand().is_file());
            assert_eq!(layout.count_candidates(), 3);
        }
        assert_eq!(BatchManifest::load(&out).unwrap(), Some(manifest));

        // A second call appends after the recorded batches.
        let manifest = pipeline
            .generate_batches(&receptor, &ligand, &out, 1, 3)
            .unwrap();
        assert_eq!(manifest.next_index(), 3);
        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|(n, _)| *n == 3));
        assert!(calls[2].1.ends_with("batch_2"));
    }

    #[test]
    fn short_batches_record_what_exists() {
        let dir = tempfile::tempdir().unwrap();
        let (receptor, ligand) = inputs(dir.path());
        let out = dir.path().join("run");
        let generator = CopyingGenerator {
            produce: Some(2),
            ..Default::default()
        };
        let manifest = Pipeline::new(&generator, PocketSelector::default())
            .generate_batches(&receptor, &ligand, &out, 1, 4)
            .unwrap();
        assert_eq!(manifest.batches[0].candidates, 2);
    }

    #[test]
    fn empty_output_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (receptor, ligand) = inputs(dir.path());
        let generator = CopyingGenerator {
            produce: Some(0),
            ..Default::default()
        };
        let err = Pipeline::new(&generator, PocketSelector::default())
            .generate_batches(&receptor, &ligand, &dir.path().join("run"), 1, 2)
            .unwrap_err();
        assert!(matches!(err, Error::NoCandidates(_)));
    }

    #[test]
    fn non_sdf_ligand_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (receptor, _) = inputs(dir.path());
        let generator = CopyingGenerator::default();
        let err = Pipeline::new(&generator, PocketSelector::default())
            .generate_batches(&receptor, &receptor, dir.path(), 1, 1)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedLigand(_)));
    }

    #[test]
    fn command_line_layout() {
        let generator = CommandGenerator::new("pocketgen")
            .with_args(["--device", "cpu"])
            .with_seed(Some(2089));
        let cmd = generator.command(Path::new("b/features.json"), Path::new("b"), 8);
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            [
                "--device",
                "cpu",
                "--features",
                "b/features.json",
                "--out",
                "b",
                "--candidates",
                "8",
                "--seed",
                "2089"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn command_generator_runs_program() {
        let dir = tempfile::tempdir().unwrap();
        let generator = CommandGenerator::new("sh").with_args([
            "-c",
            "echo ok; touch \"$4/0_whole.pdb\"",
            "sh",
        ]);
        let report = generator.generate(&[], dir.path()).unwrap();
        assert_eq!(report.diagnostics.trim(), "ok");
        assert!(dir.path().join("features.json").is_file());
        assert!(dir.path().join("0_whole.pdb").is_file());
    }
}
