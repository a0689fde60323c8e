//! Docking of one receptor/ligand pair.
//!
//! [`DockingAdapter`] is the single entry point: it converts both inputs to
//! PDBQT through a [`Preparer`], hands them to a [`DockingEngine`] together
//! with a [`DockingWindow`], and returns the pose energies in the configured
//! [`ScoreMode`]. Every failure along the way is reported as
//! [`Error::Failed`] naming the file pair, so callers can isolate it.
//!
//! The production backends are [`VinaEngine`] and [`OpenBabelPreparer`];
//! both run external executables under a timeout, which for Vina covers
//! the whole score/minimize/search sequence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::window::DockingWindow;

pub mod engine;
mod error;
pub mod prepare;
pub(crate) mod process;
pub mod vina;

pub use engine::{DockingEngine, DockingJob};
pub use error::{Error, FailureReason};
pub use prepare::{MoleculeRole, OpenBabelPreparer, Preparer};
pub use vina::VinaEngine;

/// Whether a docking call reports every pose or only the best one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreMode {
    #[default]
    AllPoses,
    BestOnly,
}

/// Docking parameters, read from the `[docking]` section of a run config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockingConfig {
    pub exhaustiveness: u32,
    pub num_poses: u32,
    pub mode: ScoreMode,
    /// Keep the docked poses instead of discarding them.
    pub write_poses: bool,
    /// Destination for kept poses; defaults to the receptor's directory.
    pub poses_dir: Option<PathBuf>,
    /// Budget in seconds for each Open Babel conversion and for the whole
    /// Vina score/minimize/search sequence.
    pub timeout_secs: u64,
    pub vina: PathBuf,
    pub obabel: PathBuf,
    pub cpu: Option<usize>,
    pub seed: Option<i64>,
}

impl Default for DockingConfig {
    fn default() -> Self {
        Self {
            exhaustiveness: 40,
            num_poses: 20,
            mode: ScoreMode::AllPoses,
            write_poses: false,
            poses_dir: None,
            timeout_secs: 600,
            vina: PathBuf::from("vina"),
            obabel: PathBuf::from("obabel"),
            cpu: None,
            seed: None,
        }
    }
}

impl DockingConfig {
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.exhaustiveness == 0 {
            return Err(Error::InvalidConfig("exhaustiveness must be at least 1".into()));
        }
        if self.num_poses == 0 {
            return Err(Error::InvalidConfig("num_poses must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfig("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

/// Result of a successful docking call, in kcal/mol.
#[derive(Debug, Clone, PartialEq)]
pub enum DockingOutcome {
    /// Every pose energy, ascending.
    Poses(Vec<f64>),
    /// The lowest pose energy.
    Best(f64),
}

impl DockingOutcome {
    pub fn energies(&self) -> &[f64] {
        match self {
            DockingOutcome::Poses(v) => v,
            DockingOutcome::Best(e) => std::slice::from_ref(e),
        }
    }

    pub fn best(&self) -> f64 {
        match self {
            DockingOutcome::Poses(v) => v.first().copied().unwrap_or(f64::NAN),
            DockingOutcome::Best(e) => *e,
        }
    }
}

/// Runs preparation and docking for receptor/ligand pairs.
pub struct DockingAdapter {
    engine: Box<dyn DockingEngine>,
    preparer: Box<dyn Preparer>,
    config: DockingConfig,
}

impl std::fmt::Debug for DockingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockingAdapter")
            .field("engine", &self.engine.name())
            .field("config", &self.config)
            .finish()
    }
}

impl DockingAdapter {
    pub fn new(
        engine: Box<dyn DockingEngine>,
        preparer: Box<dyn Preparer>,
        config: DockingConfig,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            engine,
            preparer,
            config,
        })
    }

    /// Vina with Open Babel preparation, using the executables named in
    /// `config`.
    pub fn vina(config: DockingConfig) -> Result<Self, Error> {
        let engine = VinaEngine::new(&config.vina)
            .with_cpu(config.cpu)
            .with_seed(config.seed);
        let preparer = OpenBabelPreparer::new(&config.obabel, config.timeout());
        Self::new(Box::new(engine), Box::new(preparer), config)
    }

    pub fn config(&self) -> &DockingConfig {
        &self.config
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Docks `ligand` into `receptor` within `window`.
    ///
    /// # Errors
    ///
    /// [`Error::Failed`] for any preparation, engine or output failure.
    pub fn dock(
        &self,
        receptor: &Path,
        ligand: &Path,
        window: &DockingWindow,
    ) -> Result<DockingOutcome, Error> {
        self.run(receptor, ligand, window)
            .map_err(|reason| Error::failed(receptor, ligand, reason))
    }

    fn run(
        &self,
        receptor: &Path,
        ligand: &Path,
        window: &DockingWindow,
    ) -> Result<DockingOutcome, FailureReason> {
        let scratch = tempfile::Builder::new()
            .prefix("mdock-")
            .tempdir()
            .map_err(FailureReason::io)?;

        let receptor_qt = scratch.path().join("receptor.pdbqt");
        let ligand_qt = scratch.path().join("ligand.pdbqt");
        self.preparer
            .prepare(receptor, MoleculeRole::Receptor, &receptor_qt)?;
        self.preparer
            .prepare(ligand, MoleculeRole::Ligand, &ligand_qt)?;

        let out = match self.kept_pose_path(receptor, ligand)? {
            Some(path) => path,
            None => scratch.path().join("docked.pdbqt"),
        };

        let job = DockingJob {
            receptor: &receptor_qt,
            ligand: &ligand_qt,
            window,
            exhaustiveness: self.config.exhaustiveness,
            num_poses: self.config.num_poses,
            out: &out,
            scratch: scratch.path(),
            timeout: self.config.timeout(),
        };
        let mut energies = self.engine.dock(&job)?;
        if energies.is_empty() {
            return Err(FailureReason::NoPoses);
        }
        if energies.iter().any(|e| !e.is_finite()) {
            return Err(FailureReason::Unparsable(
                "engine reported a non-finite energy".into(),
            ));
        }
        energies.sort_by(f64::total_cmp);

        if self.config.write_poses {
            log::info!("poses written to {}", out.display());
        }

        Ok(match self.config.mode {
            ScoreMode::AllPoses => DockingOutcome::Poses(energies),
            ScoreMode::BestOnly => DockingOutcome::Best(energies[0]),
        })
    }

    fn kept_pose_path(
        &self,
        receptor: &Path,
        ligand: &Path,
    ) -> Result<Option<PathBuf>, FailureReason> {
        if !self.config.write_poses {
            return Ok(None);
        }
        let dir = match &self.config.poses_dir {
            Some(dir) => dir.clone(),
            None => receptor
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(&dir).map_err(FailureReason::io)?;
        }
        Ok(Some(dir.join(pose_file_name(
            receptor,
            ligand,
            chrono::Local::now(),
        ))))
    }
}

/// `{receptor}_{ligand}_docked_{timestamp}.pdbqt`, with millisecond
/// resolution on the timestamp.
pub fn pose_file_name<Tz: chrono::TimeZone>(
    receptor: &Path,
    ligand: &Path,
    at: chrono::DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let stem = |p: &Path| {
        p.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input".to_string())
    };
    format!(
        "{}_{}_docked_{}.pdbqt",
        stem(receptor),
        stem(ligand),
        at.format("%Y%m%dT%H%M%S%3f")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Copies inputs verbatim.
    struct CopyPreparer;

    impl Preparer for CopyPreparer {
        fn prepare(
            &self,
            input: &Path,
            _role: MoleculeRole,
            output: &Path,
        ) -> Result<(), FailureReason> {
            std::fs::copy(input, output).map_err(FailureReason::io)?;
            Ok(())
        }
    }

    struct FailingPreparer;

    impl Preparer for FailingPreparer {
        fn prepare(&self, _: &Path, role: MoleculeRole, _: &Path) -> Result<(), FailureReason> {
            Err(FailureReason::preparation(role, FailureReason::NoPoses))
        }
    }

    /// Returns fixed energies; optionally checks the search budget it gets.
    struct FixedEngine {
        energies: Vec<f64>,
        expect_budget: Option<(u32, u32)>,
    }

    impl FixedEngine {
        fn new(energies: Vec<f64>) -> Self {
            Self {
                energies,
                expect_budget: None,
            }
        }
    }

    impl DockingEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        fn dock(&self, job: &DockingJob<'_>) -> Result<Vec<f64>, FailureReason> {
            assert!(job.receptor.exists() && job.ligand.exists());
            if let Some(budget) = self.expect_budget {
                assert_eq!((job.exhaustiveness, job.num_poses), budget);
            }
            std::fs::write(job.out, "REMARK VINA RESULT: -1.0 0 0\n").map_err(FailureReason::io)?;
            Ok(self.energies.clone())
        }
    }

    fn inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let receptor = dir.join("0_whole.pdb");
        let ligand = dir.join("0.sdf");
        std::fs::write(&receptor, "ATOM\n").unwrap();
        std::fs::write(&ligand, "lig\n").unwrap();
        (receptor, ligand)
    }

    fn window() -> DockingWindow {
        DockingWindow {
            center: [0.0; 3],
            size: [20.0; 3],
        }
    }

    #[test]
    fn all_poses_are_sorted_ascending() {
        let dir = tempfile::tempdir().unwrap();
        let (r, l) = inputs(dir.path());
        let adapter = DockingAdapter::new(
            Box::new(FixedEngine::new(vec![-6.0, -8.5, -7.0])),
            Box::new(CopyPreparer),
            DockingConfig::default(),
        )
        .unwrap();
        let outcome = adapter.dock(&r, &l, &window()).unwrap();
        assert_eq!(outcome, DockingOutcome::Poses(vec![-8.5, -7.0, -6.0]));
        assert_eq!(outcome.best(), -8.5);
        assert_eq!(outcome.energies().len(), 3);
    }

    #[test]
    fn best_only_returns_lowest_energy() {
        let dir = tempfile::tempdir().unwrap();
        let (r, l) = inputs(dir.path());
        let config = DockingConfig {
            mode: ScoreMode::BestOnly,
            ..Default::default()
        };
        let adapter = DockingAdapter::new(
            Box::new(FixedEngine::new(vec![-6.0, -8.5])),
            Box::new(CopyPreparer),
            config,
        )
        .unwrap();
        let outcome = adapter.dock(&r, &l, &window()).unwrap();
        assert_eq!(outcome, DockingOutcome::Best(-8.5));
        assert_eq!(outcome.energies(), &[-8.5]);
    }

    #[test]
    fn engine_receives_configured_budget() {
        let dir = tempfile::tempdir().unwrap();
        let (r, l) = inputs(dir.path());
        let engine = FixedEngine {
            energies: vec![-1.0],
            expect_budget: Some((8, 3)),
        };
        let adapter = DockingAdapter::new(
            Box::new(engine),
            Box::new(CopyPreparer),
            DockingConfig {
                exhaustiveness: 8,
                num_poses: 3,
                ..Default::default()
            },
        )
        .unwrap();
        adapter.dock(&r, &l, &window()).unwrap();
        assert_eq!(adapter.config().exhaustiveness, 8);
        assert_eq!(adapter.engine_name(), "fixed");
    }

    #[test]
    fn empty_pose_list_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (r, l) = inputs(dir.path());
        let adapter = DockingAdapter::new(
            Box::new(FixedEngine::new(Vec::new())),
            Box::new(CopyPreparer),
            DockingConfig::default(),
        )
        .unwrap();
        let err = adapter.dock(&r, &l, &window()).unwrap_err();
        assert_eq!(err.reason(), Some(&FailureReason::NoPoses));
    }

    #[test]
    fn preparation_failure_is_a_docking_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (r, l) = inputs(dir.path());
        let adapter = DockingAdapter::new(
            Box::new(FixedEngine::new(vec![-5.0])),
            Box::new(FailingPreparer),
            DockingConfig::default(),
        )
        .unwrap();
        match adapter.dock(&r, &l, &window()).unwrap_err() {
            Error::Failed {
                receptor,
                ligand,
                reason,
            } => {
                assert_eq!(receptor, r);
                assert_eq!(ligand, l);
                assert!(matches!(reason, FailureReason::Preparation { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn kept_poses_land_next_to_receptor() {
        let dir = tempfile::tempdir().unwrap();
        let (r, l) = inputs(dir.path());
        let adapter = DockingAdapter::new(
            Box::new(FixedEngine::new(vec![-5.0])),
            Box::new(CopyPreparer),
            DockingConfig {
                write_poses: true,
                ..Default::default()
            },
        )
        .unwrap();
        adapter.dock(&r, &l, &window()).unwrap();
        let kept: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".pdbqt"))
            .collect();
        assert_eq!(kept.len(), 1);
        assert!(kept[0].starts_with("0_whole_0_docked_"));
    }

    #[test]
    fn pose_file_name_format() {
        let at = chrono::Utc
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .unwrap();
        assert_eq!(
            pose_file_name(Path::new("b/0_whole.pdb"), Path::new("b/0.sdf"), at),
            "0_whole_0_docked_20240309T140507000.pdbqt"
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = DockingAdapter::new(
            Box::new(FixedEngine::new(vec![-5.0])),
            Box::new(CopyPreparer),
            DockingConfig {
                num_poses: 0,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
