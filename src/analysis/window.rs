//! Axis-aligned docking box around the ligand site.

use super::error::Error;
use crate::model::atom::distance_sq;
use crate::model::structure::{Structure, centroid};
use serde::{Deserialize, Serialize};

/// Search region handed to the docking engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DockingWindow {
    pub center: [f64; 3],
    pub size: [f64; 3],
}

impl DockingWindow {
    /// Returns `true` if `point` lies inside the box (boundary inclusive).
    pub fn contains(&self, point: [f64; 3]) -> bool {
        (0..3).all(|k| (point[k] - self.center[k]).abs() <= self.size[k] / 2.0)
    }

    pub fn volume(&self) -> f64 {
        self.size.iter().product()
    }
}

/// Parameters of the site-atom capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    /// Capture distance from the ligand centroid (Å).
    pub cutoff: f64,
    /// Margin added on each side of the site atoms' span (Å).
    pub padding: f64,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            cutoff: 5.0,
            padding: 5.0,
        }
    }
}

/// Computes the docking window for a receptor/ligand pair.
///
/// Receptor atoms within `cutoff` of the ligand centroid are the site atoms;
/// when none qualify the ligand atoms themselves are used. The box center is
/// the per-axis midpoint of the site atoms' extent and its size is that
/// extent plus `2 * padding`.
///
/// # Errors
///
/// * [`Error::EmptyLigand`] when `ligand` has no atoms.
/// * [`Error::DegenerateWindow`] when a size component ends up `<= 0`.
pub fn compute_window(
    receptor: &Structure,
    ligand: &[[f64; 3]],
    params: &WindowParams,
) -> Result<DockingWindow, Error> {
    let center = centroid(ligand).ok_or(Error::EmptyLigand)?;

    let cutoff_sq = params.cutoff * params.cutoff;
    let site: Vec<[f64; 3]> = receptor
        .atoms
        .iter()
        .map(|a| a.position)
        .filter(|p| distance_sq(*p, center) <= cutoff_sq)
        .collect();
    let site = if site.is_empty() { ligand } else { &site[..] };

    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for p in site {
        for k in 0..3 {
            min[k] = min[k].min(p[k]);
            max[k] = max[k].max(p[k]);
        }
    }

    let window = DockingWindow {
        center: [
            (min[0] + max[0]) / 2.0,
            (min[1] + max[1]) / 2.0,
            (min[2] + max[2]) / 2.0,
        ],
        size: [
            (max[0] - min[0]) + 2.0 * params.padding,
            (max[1] - min[1]) + 2.0 * params.padding,
            (max[2] - min[2]) + 2.0 * params.padding,
        ],
    };

    if window.size.iter().any(|s| !(*s > 0.0) || !s.is_finite()) {
        return Err(Error::DegenerateWindow {
            x: window.size[0],
            y: window.size[1],
            z: window.size[2],
        });
    }

    Ok(window)
}
