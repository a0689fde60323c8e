use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordStatus {
    Docked,
    /// Docking failed; the energies are a zero-energy placeholder.
    DockingFailed,
}

/// One summary row: the source baseline or a generated candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// `batch_{b}/src` or `batch_{b}/{i}`.
    pub id: String,
    /// Mean pose energy, kcal/mol.
    pub mean_delta_g: f64,
    /// Mean of the per-pose dissociation constants.
    pub mean_kd: f64,
    pub mutation_count: usize,
    pub status: RecordStatus,
}

impl EvaluationRecord {
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.status == RecordStatus::DockingFailed
    }
}
