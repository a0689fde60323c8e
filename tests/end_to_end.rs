use std::fs;
use std::path::{Path, PathBuf};

use mutant_dock::dock::{DockingEngine, DockingJob, FailureReason, MoleculeRole, Preparer};
use mutant_dock::eval::{NoopObserver, summary};
use mutant_dock::generate::{self, GenerationReport};
use mutant_dock::{
    DockingAdapter, DockingConfig, Element, EvalConfig, Orchestrator, Pipeline, PocketFeatures,
    PocketGenerator, PocketSelector, RecordStatus, Structure, io,
};

const SDF: &str = "lig\n  test\n\n  1  0  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0\nM  END\n$$$$\n";

const SOURCE: [&str; 3] = ["ALA", "GLY", "SER"];

fn receptor(names: &[&str]) -> Structure {
    let mut s = Structure::new();
    for (i, name) in names.iter().enumerate() {
        let r = s.add_residue(name, 'A', i as i32 + 1);
        s.add_atom(r, "CA", Element::C, [2.0 + 4.0 * i as f64, 0.0, 0.0]);
    }
    s
}

/// Candidate `i` replaces the first `i` residues with valine. The last
/// candidate of `batch_1` carries a tryptophan, which the engine rejects.
struct VariantGenerator;

impl PocketGenerator for VariantGenerator {
    fn generate(
        &self,
        batch: &[PocketFeatures],
        out_dir: &Path,
    ) -> Result<GenerationReport, generate::Error> {
        let poisoned = out_dir.ends_with("batch_1");
        for i in 0..batch.len() {
            let mut names: Vec<&str> = SOURCE.to_vec();
            for name in names.iter_mut().take(i) {
                *name = "VAL";
            }
            if poisoned && i + 1 == batch.len() {
                names[0] = "TRP";
            }
            io::write_pdb(&out_dir.join(format!("{i}_whole.pdb")), &receptor(&names))?;
            fs::write(out_dir.join(format!("{i}.sdf")), SDF)
                .map_err(|e| generate::Error::Generator(e.to_string()))?;
        }
        Ok(GenerationReport {
            candidates: batch.len(),
            diagnostics: String::new(),
        })
    }
}

struct CopyPreparer;

impl Preparer for CopyPreparer {
    fn prepare(&self, input: &Path, _: MoleculeRole, output: &Path) -> Result<(), FailureReason> {
        fs::copy(input, output).map_err(|e| FailureReason::Io(e.to_string()))?;
        Ok(())
    }
}

struct TryptophanAverseEngine;

impl DockingEngine for TryptophanAverseEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn dock(&self, job: &DockingJob<'_>) -> Result<Vec<f64>, FailureReason> {
        let text =
            fs::read_to_string(job.receptor).map_err(|e| FailureReason::Io(e.to_string()))?;
        if text.contains("TRP") {
            return Err(FailureReason::NoPoses);
        }
        Ok(vec![-9.0, -7.5, -6.0])
    }
}

fn inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let rec = dir.join("receptor.pdb");
    io::write_pdb(&rec, &receptor(&SOURCE)).unwrap();
    let lig = dir.join("ligand.sdf");
    fs::write(&lig, SDF).unwrap();
    (rec, lig)
}

fn orchestrator(config: EvalConfig) -> Orchestrator {
    let adapter = DockingAdapter::new(
        Box::new(TryptophanAverseEngine),
        Box::new(CopyPreparer),
        DockingConfig::default(),
    )
    .unwrap();
    Orchestrator::with_adapter(adapter, config).unwrap()
}

#[test]
fn two_batches_with_one_failure() {
    let dir = tempfile::tempdir().unwrap();
    let (rec, lig) = inputs(dir.path());
    let out = dir.path().join("run");

    let generator = VariantGenerator;
    let pipeline = Pipeline::new(&generator, PocketSelector::default());
    let manifest = pipeline.generate_batches(&rec, &lig, &out, 2, 3).unwrap();
    assert_eq!(manifest.batches.len(), 2);
    assert!(out.join("batch_1").join("orig.pdb").is_file());

    let result = orchestrator(EvalConfig::default())
        .run(&out, &NoopObserver)
        .unwrap();

    assert_eq!(result.records.len(), 8);
    assert_eq!(result.failed(), 1);
    let failed: Vec<_> = result
        .records
        .iter()
        .filter(|r| r.status == RecordStatus::DockingFailed)
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(failed, ["batch_1/2"]);

    let mutations: Vec<_> = result.records.iter().map(|r| r.mutation_count).collect();
    assert_eq!(mutations, [0, 0, 1, 2, 0, 0, 1, 2]);

    let text = fs::read_to_string(&result.path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(summary::HEADER.join("\t").as_str()));
    let rows: Vec<Vec<&str>> = lines.map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows.len(), 8);
    assert_eq!(text.matches(summary::SENTINEL).count(), 2);

    for row in &rows {
        assert_eq!(row.len(), 4);
        if row[0] == "batch_1/2" {
            assert_eq!(&row[1..3], [summary::SENTINEL, summary::SENTINEL]);
            continue;
        }
        let delta_g: f64 = row[1].parse().unwrap();
        let kd: f64 = row[2].parse().unwrap();
        assert!(delta_g.is_finite() && kd.is_finite());
        assert!((delta_g + 7.5).abs() < 1e-9);
    }
}

#[test]
fn evaluation_is_repeatable_on_the_same_run() {
    let dir = tempfile::tempdir().unwrap();
    let (rec, lig) = inputs(dir.path());
    let out = dir.path().join("run");

    let generator = VariantGenerator;
    Pipeline::new(&generator, PocketSelector::default())
        .generate_batches(&rec, &lig, &out, 1, 2)
        .unwrap();

    let config = EvalConfig {
        jobs: 2,
        ..EvalConfig::default()
    };
    let first = orchestrator(config.clone()).run(&out, &NoopObserver).unwrap();
    let second = orchestrator(config).run(&out, &NoopObserver).unwrap();
    assert_eq!(first.records, second.records);
    assert_eq!(first.failed(), 0);
}
