use std::path::Path;
use std::time::Duration;

use super::error::FailureReason;
use crate::analysis::window::DockingWindow;

/// One docking run over prepared inputs.
#[derive(Debug, Clone, Copy)]
pub struct DockingJob<'a> {
    /// Prepared receptor (PDBQT).
    pub receptor: &'a Path,
    /// Prepared ligand (PDBQT).
    pub ligand: &'a Path,
    pub window: &'a DockingWindow,
    pub exhaustiveness: u32,
    pub num_poses: u32,
    /// Where the engine writes the docked poses.
    pub out: &'a Path,
    /// Directory for intermediate files; removed by the caller.
    pub scratch: &'a Path,
    /// Wall-clock budget for the whole [`DockingEngine::dock`] call, shared
    /// by every subprocess it runs.
    pub timeout: Duration,
}

/// A docking backend.
///
/// Implementations score the input pose, minimize it locally, then search
/// the window globally, writing poses to [`DockingJob::out`] and returning
/// one energy (kcal/mol) per pose.
pub trait DockingEngine: Send + Sync {
    fn name(&self) -> &str;

    fn dock(&self, job: &DockingJob<'_>) -> Result<Vec<f64>, FailureReason>;
}
