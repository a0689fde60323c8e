//! Pocket features handed to the generative model.
//!
//! Field names follow the keys the model expects, so the JSON can be fed
//! to it without renaming.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::Error;
use crate::analysis::pocket::Pocket;
use crate::model::structure::LigandGeometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PocketFeatures {
    pub protein_filename: String,
    pub ligand_filename: String,

    /// Pocket atoms.
    pub protein_pos: Vec<[f64; 3]>,
    pub protein_element: Vec<String>,
    pub protein_atom_name: Vec<String>,
    /// Pocket-local residue index of each atom.
    pub protein_atom_to_residue: Vec<usize>,

    /// Pocket residues.
    pub residue_names: Vec<String>,
    pub seq: String,
    /// Original residue positions of the pocket (outer tier).
    pub r10_idx: Vec<usize>,
    /// Pocket-local positions of the editable residues (inner tier).
    pub full_seq_idx: Vec<usize>,
    pub protein_edit_residue: Vec<bool>,

    pub ligand_pos: Vec<[f64; 3]>,
    pub ligand_element: Vec<String>,
}

impl PocketFeatures {
    pub fn from_pocket(
        pocket: &Pocket,
        ligand: &LigandGeometry,
        protein_filename: &Path,
        ligand_filename: &Path,
    ) -> Self {
        let atoms = &pocket.structure.atoms;
        Self {
            protein_filename: protein_filename.display().to_string(),
            ligand_filename: ligand_filename.display().to_string(),
            protein_pos: atoms.iter().map(|a| a.position).collect(),
            protein_element: atoms
                .iter()
                .map(|a| a.element.symbol().to_string())
                .collect(),
            protein_atom_name: atoms.iter().map(|a| a.name.clone()).collect(),
            protein_atom_to_residue: atoms.iter().map(|a| a.residue).collect(),
            residue_names: pocket
                .structure
                .residues
                .iter()
                .map(|r| r.name.clone())
                .collect(),
            seq: pocket.sequence.clone(),
            r10_idx: pocket.outer.indices.clone(),
            full_seq_idx: pocket.inner_indices.clone(),
            protein_edit_residue: pocket.editable.clone(),
            ligand_pos: ligand.positions.clone(),
            ligand_element: ligand
                .elements
                .iter()
                .map(|e| e.symbol().to_string())
                .collect(),
        }
    }

    pub fn editable_count(&self) -> usize {
        self.protein_edit_residue.iter().filter(|e| **e).count()
    }
}

/// Writes a batch of features as a JSON array.
pub fn write_batch(path: &Path, batch: &[PocketFeatures]) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::fs(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, batch)?;
    writer.flush().map_err(|e| Error::fs(path, e))?;
    Ok(())
}

pub fn read_batch(path: &Path) -> Result<Vec<PocketFeatures>, Error> {
    let file = File::open(path).map_err(|e| Error::fs(path, e))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
