//! Two-tier, radius-based pocket selection.
//!
//! The outer tier (10 Å by default) defines the pocket handed to the
//! generative model; the inner tier (3.5 Å) marks which pocket residues the
//! model may redesign.

use super::error::Error;
use super::spatial::SpatialGrid;
use crate::io;
use crate::model::residue::Residue;
use crate::model::structure::Structure;
use serde::{Deserialize, Serialize};

/// Residues selected from a structure, with the index of each one.
///
/// `indices` is ascending and unique, and `indices.len() == residues.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidueSelection {
    pub indices: Vec<usize>,
    pub residues: Vec<Residue>,
}

impl ResidueSelection {
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Selection radii in Ångström.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PocketParams {
    pub outer_radius: f64,
    pub inner_radius: f64,
}

impl Default for PocketParams {
    fn default() -> Self {
        Self {
            outer_radius: 10.0,
            inner_radius: 3.5,
        }
    }
}

/// The reduced receptor around a ligand.
#[derive(Debug, Clone, PartialEq)]
pub struct Pocket {
    /// Only the outer-tier residues, in original order. Each residue keeps
    /// its original `seq_index`.
    pub structure: Structure,
    /// Outer-tier residues, indexed by original sequence position.
    pub outer: ResidueSelection,
    /// Inner-tier residues as positions within [`Pocket::structure`].
    pub inner_indices: Vec<usize>,
    /// One flag per pocket residue: `true` where the residue is editable.
    pub editable: Vec<bool>,
    /// One-letter codes of the pocket residues, concatenated.
    pub sequence: String,
}

impl Pocket {
    /// Inner-tier residues mapped back to original sequence positions.
    ///
    /// The result is always a subset of `outer.indices`.
    pub fn inner_original_indices(&self) -> Vec<usize> {
        self.inner_indices
            .iter()
            .map(|&j| self.outer.indices[j])
            .collect()
    }

    #[inline]
    pub fn residue_count(&self) -> usize {
        self.structure.residue_count()
    }

    pub fn editable_count(&self) -> usize {
        self.editable.iter().filter(|e| **e).count()
    }

    /// Renders the pocket sub-structure as a PDB block.
    pub fn to_pdb(&self) -> Result<String, io::Error> {
        io::pdb::writer::to_string(&self.structure)
    }
}

/// Selects pocket residues around a ligand.
#[derive(Debug, Clone, Copy, Default)]
pub struct PocketSelector {
    params: PocketParams,
}

impl PocketSelector {
    pub fn new(params: PocketParams) -> Result<Self, Error> {
        let PocketParams {
            outer_radius,
            inner_radius,
        } = params;
        for (label, r) in [("outer", outer_radius), ("inner", inner_radius)] {
            if !r.is_finite() || r < 0.0 {
                return Err(Error::InvalidRadius(format!(
                    "{label} radius must be a non-negative number, got {r}"
                )));
            }
        }
        if outer_radius < inner_radius {
            return Err(Error::InvalidRadius(format!(
                "outer radius {outer_radius} is smaller than inner radius {inner_radius}"
            )));
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &PocketParams {
        &self.params
    }

    /// Runs the two-tier selection.
    ///
    /// A residue is in contact when any of its atoms lies within the radius
    /// of any ligand atom (inclusive). Residues without atoms never match.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyLigand`] when `ligand` has no atoms.
    /// * [`Error::SelectionInvariant`] if the index sets and mask disagree.
    pub fn select(&self, receptor: &Structure, ligand: &[[f64; 3]]) -> Result<Pocket, Error> {
        if ligand.is_empty() {
            return Err(Error::EmptyLigand);
        }
        let grid = SpatialGrid::new(ligand, self.params.outer_radius);

        let outer_positions: Vec<usize> = (0..receptor.residue_count())
            .filter(|&ri| in_contact(receptor, ri, &grid, self.params.outer_radius))
            .collect();

        let structure = receptor.extract(&outer_positions);
        let mut outer = ResidueSelection {
            indices: structure.residues.iter().map(|r| r.seq_index).collect(),
            residues: structure.residues.clone(),
        };

        let editable: Vec<bool> = (0..structure.residue_count())
            .map(|j| in_contact(&structure, j, &grid, self.params.inner_radius))
            .collect();
        let mut inner_indices: Vec<usize> = editable
            .iter()
            .enumerate()
            .filter_map(|(j, e)| e.then_some(j))
            .collect();

        outer.indices.sort_unstable();
        inner_indices.sort_unstable();

        let sequence = structure.one_letter_sequence();
        let pocket = Pocket {
            structure,
            outer,
            inner_indices,
            editable,
            sequence,
        };
        check_invariants(&pocket)?;

        log::debug!(
            "pocket: {} residues within {:.1} Å, {} editable within {:.1} Å",
            pocket.outer.len(),
            self.params.outer_radius,
            pocket.inner_indices.len(),
            self.params.inner_radius
        );
        Ok(pocket)
    }
}

fn in_contact(structure: &Structure, residue: usize, grid: &SpatialGrid, radius: f64) -> bool {
    structure
        .residue_positions(residue)
        .any(|p| grid.any_within(p, radius))
}

fn check_invariants(pocket: &Pocket) -> Result<(), Error> {
    if pocket.outer.indices.len() != pocket.outer.residues.len() {
        return Err(Error::SelectionInvariant(format!(
            "{} outer indices for {} outer residues",
            pocket.outer.indices.len(),
            pocket.outer.residues.len()
        )));
    }
    if pocket.editable_count() != pocket.inner_indices.len() {
        return Err(Error::SelectionInvariant(format!(
            "editable mask marks {} residues but the inner set has {}",
            pocket.editable_count(),
            pocket.inner_indices.len()
        )));
    }
    if pocket.editable.len() != pocket.outer.indices.len() {
        return Err(Error::SelectionInvariant(format!(
            "editable mask covers {} residues but the pocket has {}",
            pocket.editable.len(),
            pocket.outer.indices.len()
        )));
    }
    Ok(())
}
