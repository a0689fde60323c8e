//! Run configuration for batch evaluation.
//!
//! Loaded from TOML; every key is optional. `mdock generate --config`
//! reads only the `[pocket]` section; `mdock evaluate` reads the rest.
//!
//! ```toml
//! jobs = 4
//! failure_marker = "sentinel"   # or "zero"
//! summary_name = "summary.tsv"
//!
//! [window]
//! cutoff = 5.0
//! padding = 10.0
//!
//! [pocket]
//! outer_radius = 10.0
//! inner_radius = 3.5
//!
//! [docking]
//! exhaustiveness = 40
//! num_poses = 20
//! mode = "all-poses"            # evaluation rejects "best-only"
//! timeout_secs = 600
//!
//! [affinity]
//! temperature = 298.0
//! unit = "kcal-per-mol"
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::Error;
use crate::analysis::affinity::AffinityParams;
use crate::analysis::pocket::PocketParams;
use crate::analysis::window::WindowParams;
use crate::dock::DockingConfig;

pub const DEFAULT_SUMMARY_NAME: &str = "summary.tsv";

/// Evaluation uses a wider docking box than the interactive default.
pub const EVALUATION_WINDOW: WindowParams = WindowParams {
    cutoff: 5.0,
    padding: 10.0,
};

/// How rows whose docking failed appear in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMarker {
    /// `NA` in the energy and affinity columns.
    #[default]
    Sentinel,
    /// The zero-energy placeholder values, indistinguishable from a real
    /// result except through the record status.
    Zero,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    #[serde(deserialize_with = "evaluation_window")]
    pub window: WindowParams,
    pub pocket: PocketParams,
    pub docking: DockingConfig,
    pub affinity: AffinityParams,
    /// Candidates docked concurrently within a batch.
    pub jobs: usize,
    pub failure_marker: FailureMarker,
    pub summary_name: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            window: EVALUATION_WINDOW,
            pocket: PocketParams::default(),
            docking: DockingConfig::default(),
            affinity: AffinityParams::default(),
            jobs: 1,
            failure_marker: FailureMarker::Sentinel,
            summary_name: DEFAULT_SUMMARY_NAME.to_string(),
        }
    }
}

impl EvalConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::fs(path, e))?;
        Self::from_toml_str(&text)
    }
}

// A partial `[window]` table falls back to the evaluation defaults, not to
// `WindowParams::default()`.
fn evaluation_window<'de, D>(deserializer: D) -> Result<WindowParams, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Partial {
        cutoff: Option<f64>,
        padding: Option<f64>,
    }

    let partial = Partial::deserialize(deserializer)?;
    Ok(WindowParams {
        cutoff: partial.cutoff.unwrap_or(EVALUATION_WINDOW.cutoff),
        padding: partial.padding.unwrap_or(EVALUATION_WINDOW.padding),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::affinity::EnergyUnit;
    use crate::dock::ScoreMode;

    #[test]
    fn empty_file_gives_defaults() {
        let config = EvalConfig::from_toml_str("").unwrap();
        assert_eq!(config, EvalConfig::default());
        assert_eq!(config.window.padding, 10.0);
        assert_eq!(config.docking.exhaustiveness, 40);
        assert_eq!(config.docking.num_poses, 20);
        assert_eq!(config.affinity.temperature, 298.0);
        assert_eq!(config.jobs, 1);
        assert_eq!(config.failure_marker, FailureMarker::Sentinel);
        assert_eq!(config.summary_name, "summary.tsv");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = EvalConfig::from_toml_str(
            r#"
jobs = 3
failure_marker = "zero"

[window]
cutoff = 6.0

[docking]
mode = "best-only"
write_poses = true
poses_dir = "poses"

[affinity]
unit = "joule-per-mol"
"#,
        )
        .unwrap();
        assert_eq!(config.jobs, 3);
        assert_eq!(config.failure_marker, FailureMarker::Zero);
        assert_eq!(config.window.cutoff, 6.0);
        assert_eq!(config.window.padding, 10.0);
        assert_eq!(config.docking.mode, ScoreMode::BestOnly);
        assert_eq!(config.docking.exhaustiveness, 40);
        assert_eq!(config.docking.poses_dir.as_deref(), Some(Path::new("poses")));
        assert_eq!(config.affinity.unit, EnergyUnit::JoulePerMol);
        assert_eq!(config.affinity.temperature, 298.0);
        assert_eq!(config.pocket, PocketParams::default());
    }

    #[test]
    fn unknown_marker_is_rejected() {
        let err = EvalConfig::from_toml_str("failure_marker = \"nan\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_reports_missing_path() {
        let err = EvalConfig::load(Path::new("/no/such/run.toml")).unwrap_err();
        assert!(err.to_string().contains("/no/such/run.toml"));
    }
}
