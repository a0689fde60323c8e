//! Reading receptors and ligands, writing pocket sub-structures.
//!
//! Receptors are read from PDB, ligands from SDF/MOL (or PDB, taking every
//! atom as a ligand atom). The path-based helpers attach the offending path
//! to every error so that fatal input errors name the file.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub mod error;
pub mod pdb;
pub mod sdf;

pub use error::Error;

use crate::model::structure::{LigandGeometry, Structure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pdb,
    Sdf,
    Pdbqt,
}

impl Format {
    /// Infers the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdb" | "ent" => Some(Format::Pdb),
            "sdf" | "mol" => Some(Format::Sdf),
            "pdbqt" => Some(Format::Pdbqt),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Pdb => write!(f, "PDB"),
            Format::Sdf => write!(f, "SDF"),
            Format::Pdbqt => write!(f, "PDBQT"),
        }
    }
}

/// Reads a receptor structure from a PDB file.
pub fn read_receptor(path: &Path) -> Result<Structure, Error> {
    let inner = || -> Result<Structure, Error> {
        match Format::from_path(path) {
            Some(Format::Pdb) | None => {
                let file = File::open(path)?;
                pdb::reader::read(BufReader::new(file))
            }
            Some(other) => Err(Error::UnsupportedReadFormat(other)),
        }
    };
    inner().map_err(|e| e.in_file(path))
}

/// Reads ligand coordinates from an SDF/MOL or PDB file.
pub fn read_ligand(path: &Path) -> Result<LigandGeometry, Error> {
    let inner = || -> Result<LigandGeometry, Error> {
        let format = Format::from_path(path).ok_or_else(|| Error::UnknownFormat(path.into()))?;
        let file = File::open(path)?;
        match format {
            Format::Sdf => sdf::reader::read(BufReader::new(file)),
            Format::Pdb => {
                let structure = pdb::reader::read(BufReader::new(file))?;
                Ok(LigandGeometry::new(
                    structure.atoms.iter().map(|a| a.position).collect(),
                    structure.atoms.iter().map(|a| a.element).collect(),
                ))
            }
            Format::Pdbqt => Err(Error::UnsupportedReadFormat(Format::Pdbqt)),
        }
    };
    inner().map_err(|e| e.in_file(path))
}

/// Writes a structure to a PDB file.
pub fn write_pdb(path: &Path, structure: &Structure) -> Result<(), Error> {
    let inner = || -> Result<(), Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        pdb::writer::write(&mut writer, structure)?;
        writer.flush()?;
        Ok(())
    };
    inner().map_err(|e| e.in_file(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn infers_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/rec.PDB")), Some(Format::Pdb));
        assert_eq!(Format::from_path(Path::new("lig.sdf")), Some(Format::Sdf));
        assert_eq!(Format::from_path(Path::new("lig.pdbqt")), Some(Format::Pdbqt));
        assert_eq!(Format::from_path(Path::new("lig.xyz")), None);
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let path = PathBuf::from("/definitely/not/here/rec.pdb");
        let err = read_receptor(&path).expect_err("missing file");
        assert!(err.to_string().contains("/definitely/not/here/rec.pdb"));
        assert!(matches!(err.root(), Error::Io { .. }));
    }

    #[test]
    fn pdb_ligand_and_pocket_file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut s = Structure::new();
        let r = s.add_residue("LIG", 'L', 1);
        s.add_atom(r, "C1", crate::model::element::Element::C, [1.0, 2.0, 3.0]);
        let path = dir.path().join("lig.pdb");
        write_pdb(&path, &s).expect("write");
        let lig = read_ligand(&path).expect("read ligand");
        assert_eq!(lig.atom_count(), 1);
        assert_eq!(lig.positions[0], [1.0, 2.0, 3.0]);
    }
}
