use super::atom::Atom;
use super::element::Element;
use super::residue::Residue;

/// A parsed receptor: atoms in file order grouped into residues.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    pub atoms: Vec<Atom>,
    pub residues: Vec<Residue>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Appends an empty residue and returns its index.
    ///
    /// The residue's `seq_index` is its position in this structure.
    pub fn add_residue(&mut self, name: &str, chain_id: char, residue_number: i32) -> usize {
        let idx = self.residues.len();
        self.residues
            .push(Residue::new(name, chain_id, residue_number, None, idx));
        idx
    }

    /// Appends an atom to an existing residue and returns the atom index.
    pub fn add_atom(
        &mut self,
        residue: usize,
        name: &str,
        element: Element,
        position: [f64; 3],
    ) -> usize {
        let idx = self.atoms.len();
        let chain_id = self.residues[residue].chain_id;
        self.atoms
            .push(Atom::new(name, element, position, residue, chain_id));
        self.residues[residue].atoms.push(idx);
        idx
    }

    pub fn positions(&self) -> Vec<[f64; 3]> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    pub fn residue_positions(&self, residue: usize) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.residues[residue]
            .atoms
            .iter()
            .map(move |&i| self.atoms[i].position)
    }

    /// Residue names in file order.
    pub fn sequence(&self) -> Vec<&str> {
        self.residues.iter().map(|r| r.name.as_str()).collect()
    }

    /// Names of amino-acid residues only, in file order.
    pub fn amino_acid_sequence(&self) -> Vec<&str> {
        self.residues
            .iter()
            .filter(|r| r.is_amino_acid())
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn one_letter_sequence(&self) -> String {
        self.residues.iter().map(|r| r.one_letter()).collect()
    }

    /// Builds a new structure holding only the given residues, in the given
    /// order. Residues keep their original `seq_index`; atom indices are
    /// renumbered.
    pub fn extract(&self, residue_indices: &[usize]) -> Structure {
        let mut sub = Structure::new();
        for &ri in residue_indices {
            let src = &self.residues[ri];
            let local = sub.residues.len();
            let mut residue = Residue {
                atoms: Vec::with_capacity(src.atoms.len()),
                ..src.clone()
            };
            for &ai in &src.atoms {
                let mut atom = self.atoms[ai].clone();
                atom.residue = local;
                residue.atoms.push(sub.atoms.len());
                sub.atoms.push(atom);
            }
            sub.residues.push(residue);
        }
        sub
    }
}

/// Ligand coordinates in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LigandGeometry {
    pub positions: Vec<[f64; 3]>,
    pub elements: Vec<Element>,
}

impl LigandGeometry {
    pub fn new(positions: Vec<[f64; 3]>, elements: Vec<Element>) -> Self {
        Self {
            positions,
            elements,
        }
    }

    pub fn from_positions(positions: Vec<[f64; 3]>) -> Self {
        let elements = vec![Element::Unknown; positions.len()];
        Self::new(positions, elements)
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Geometric center of the ligand atoms; `None` when there are none.
    pub fn centroid(&self) -> Option<[f64; 3]> {
        centroid(&self.positions)
    }
}

pub fn centroid(points: &[[f64; 3]]) -> Option<[f64; 3]> {
    if points.is_empty() {
        return None;
    }
    let mut sum = [0.0; 3];
    for p in points {
        for k in 0..3 {
            sum[k] += p[k];
        }
    }
    let n = points.len() as f64;
    Some([sum[0] / n, sum[1] / n, sum[2] / n])
}
