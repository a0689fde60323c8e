use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::config::EvalConfig;
use super::error::Error;
use super::layout::BatchLayout;
use super::manifest::{BatchEntry, BatchManifest};
use super::record::{EvaluationRecord, RecordStatus};
use super::summary;
use crate::analysis::affinity::{AffinityConverter, mean};
use crate::analysis::mutation::count_mutations;
use crate::analysis::window::compute_window;
use crate::dock::{self, DockingAdapter, ScoreMode};
use crate::io;
use crate::model::structure::Structure;

/// Receives progress events from an evaluation run.
///
/// Every method has an empty default. With `jobs > 1`,
/// [`record_finished`](EvalObserver::record_finished) is called from worker
/// threads in completion order.
pub trait EvalObserver: Sync {
    fn run_started(&self, _batches: usize, _rows: usize) {}
    fn batch_started(&self, _batch: usize, _candidates: usize) {}
    fn record_finished(&self, _record: &EvaluationRecord) {}
    fn batch_finished(&self, _batch: usize) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl EvalObserver for NoopObserver {}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalSummary {
    pub records: Vec<EvaluationRecord>,
    pub path: PathBuf,
}

impl EvalSummary {
    pub fn failed(&self) -> usize {
        self.records.iter().filter(|r| r.is_failed()).count()
    }
}

/// Docks every candidate of every batch and writes the summary.
#[derive(Debug)]
pub struct Orchestrator {
    adapter: DockingAdapter,
    converter: AffinityConverter,
    config: EvalConfig,
    pool: Option<rayon::ThreadPool>,
}

impl Orchestrator {
    /// Builds an orchestrator around Vina and Open Babel.
    pub fn new(config: EvalConfig) -> Result<Self, Error> {
        let adapter = DockingAdapter::vina(config.docking.clone())?;
        Self::with_adapter(adapter, config)
    }

    /// Builds an orchestrator around an existing adapter. The adapter's own
    /// docking configuration takes precedence over `config.docking`.
    ///
    /// Rows average over every pose, so an adapter in
    /// [`ScoreMode::BestOnly`] is rejected.
    pub fn with_adapter(adapter: DockingAdapter, config: EvalConfig) -> Result<Self, Error> {
        if adapter.config().mode != ScoreMode::AllPoses {
            return Err(dock::Error::InvalidConfig(
                "evaluation averages over every pose; docking mode must be all-poses".into(),
            )
            .into());
        }
        let converter = AffinityConverter::new(config.affinity)
            .map_err(|e| Error::analysis(Path::new("[affinity]"), e))?;
        let pool = if config.jobs > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.jobs)
                .thread_name(|i| format!("mdock-eval-{i}"))
                .build()
                .map_err(|e| Error::WorkerPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self {
            adapter,
            converter,
            config,
            pool,
        })
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluates every batch under `out_dir` and writes the summary there.
    ///
    /// Batches come from `manifest.toml`, or from scanning `batch_<n>`
    /// directories when there is none. Rows follow batch order; within a
    /// batch the source row comes first, then candidates in index order.
    pub fn run(&self, out_dir: &Path, observer: &dyn EvalObserver) -> Result<EvalSummary, Error> {
        let manifest = BatchManifest::load_or_discover(out_dir)?;
        if manifest.batches.is_empty() {
            return Err(Error::NoBatches(out_dir.to_path_buf()));
        }
        let rows = manifest.batches.len() + manifest.total_candidates();
        log::info!(
            "evaluating {} batches ({} rows) in {}",
            manifest.batches.len(),
            rows,
            out_dir.display()
        );
        observer.run_started(manifest.batches.len(), rows);

        let mut records = Vec::with_capacity(rows);
        for entry in &manifest.batches {
            records.extend(self.evaluate_batch(out_dir, entry, observer)?);
        }

        let path = out_dir.join(&self.config.summary_name);
        summary::write_file(&path, &records, self.config.failure_marker)?;

        let failed = records.iter().filter(|r| r.is_failed()).count();
        if failed > 0 {
            log::warn!("{failed} of {} rows failed to dock", records.len());
        }
        Ok(EvalSummary { records, path })
    }

    /// Evaluates the source pair and every candidate of one batch.
    pub fn evaluate_batch(
        &self,
        out_dir: &Path,
        entry: &BatchEntry,
        observer: &dyn EvalObserver,
    ) -> Result<Vec<EvaluationRecord>, Error> {
        let layout = BatchLayout::new(out_dir, entry.index);
        log::info!(
            "batch {}: source + {} candidates",
            entry.index,
            entry.candidates
        );
        observer.batch_started(entry.index, entry.candidates);

        let source_path = layout.source_receptor();
        let (source, source_record) = self.evaluate_pair(
            layout.source_id(),
            &source_path,
            &layout.source_ligand(),
            None,
        )?;
        observer.record_finished(&source_record);

        let candidate = |i: usize| -> Result<EvaluationRecord, Error> {
            let (_, record) = self.evaluate_pair(
                layout.candidate_id(i),
                &layout.candidate_receptor(i),
                &layout.candidate_ligand(i),
                Some(&source),
            )?;
            observer.record_finished(&record);
            Ok(record)
        };

        let candidates: Vec<EvaluationRecord> = match &self.pool {
            Some(pool) => pool.install(|| {
                (0..entry.candidates)
                    .into_par_iter()
                    .map(candidate)
                    .collect::<Result<Vec<_>, _>>()
            })?,
            None => (0..entry.candidates)
                .map(candidate)
                .collect::<Result<Vec<_>, _>>()?,
        };

        observer.batch_finished(entry.index);

        let mut records = Vec::with_capacity(candidates.len() + 1);
        records.push(source_record);
        records.extend(candidates);
        Ok(records)
    }

    /// Window, docking, affinity and mutation count for one receptor/ligand
    /// pair. Returns the parsed receptor alongside the record.
    ///
    /// A docking failure becomes a single zero-energy pose and a
    /// [`RecordStatus::DockingFailed`] row; every other error is fatal.
    fn evaluate_pair(
        &self,
        id: String,
        receptor_path: &Path,
        ligand_path: &Path,
        original: Option<&Structure>,
    ) -> Result<(Structure, EvaluationRecord), Error> {
        for path in [receptor_path, ligand_path] {
            if !path.is_file() {
                return Err(Error::MissingCandidate(path.to_path_buf()));
            }
        }
        let receptor = io::read_receptor(receptor_path)?;
        let ligand = io::read_ligand(ligand_path)?;
        let window = compute_window(&receptor, &ligand.positions, &self.config.window)
            .map_err(|e| Error::analysis(ligand_path, e))?;

        let (energies, status) = match self.adapter.dock(receptor_path, ligand_path, &window) {
            Ok(outcome) => (outcome.energies().to_vec(), RecordStatus::Docked),
            Err(err @ dock::Error::Failed { .. }) => {
                log::warn!("{id}: {err}; recording a zero-energy placeholder");
                (vec![0.0], RecordStatus::DockingFailed)
            }
            Err(err) => return Err(err.into()),
        };

        let mean_delta_g = mean(energies.iter().copied()).unwrap_or(0.0);
        let mean_kd = self.converter.mean_kd(&energies).unwrap_or(1.0);
        let mutation_count = original.map_or(0, |o| count_mutations(o, &receptor));

        log::debug!(
            "{id}: dG {mean_delta_g:.3} kcal/mol over {} poses, Kd {mean_kd:.3e}, {mutation_count} mutations",
            energies.len()
        );

        let record = EvaluationRecord {
            id,
            mean_delta_g,
            mean_kd,
            mutation_count,
            status,
        };
        Ok((receptor, record))
    }
}
