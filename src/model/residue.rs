/// A residue as it appears in the parsed file.
///
/// `seq_index` is the residue's ordinal position across the whole structure
/// (0-based, in file order). It is the identity used by pocket index sets and
/// survives sub-structure extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub name: String,
    pub chain_id: char,
    pub residue_number: i32,
    pub insertion_code: char,
    pub seq_index: usize,
    pub atoms: Vec<usize>,
}

impl Residue {
    pub fn new(
        name: impl Into<String>,
        chain_id: char,
        residue_number: i32,
        insertion_code: Option<char>,
        seq_index: usize,
    ) -> Self {
        Self {
            name: name.into(),
            chain_id,
            residue_number,
            insertion_code: insertion_code.unwrap_or(' '),
            seq_index,
            atoms: Vec::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    #[inline]
    pub fn is_amino_acid(&self) -> bool {
        is_amino_acid(&self.name)
    }

    #[inline]
    pub fn one_letter(&self) -> char {
        one_letter_code(&self.name)
    }
}

const STANDARD_AMINO_ACIDS: [(&str, char); 20] = [
    ("ALA", 'A'),
    ("ARG", 'R'),
    ("ASN", 'N'),
    ("ASP", 'D'),
    ("CYS", 'C'),
    ("GLN", 'Q'),
    ("GLU", 'E'),
    ("GLY", 'G'),
    ("HIS", 'H'),
    ("ILE", 'I'),
    ("LEU", 'L'),
    ("LYS", 'K'),
    ("MET", 'M'),
    ("PHE", 'F'),
    ("PRO", 'P'),
    ("SER", 'S'),
    ("THR", 'T'),
    ("TRP", 'W'),
    ("TYR", 'Y'),
    ("VAL", 'V'),
];

// Protonation-state, disulfide and common post-translational variants,
// mapped to their parent residue.
const MODIFIED_AMINO_ACIDS: [(&str, char); 14] = [
    ("MSE", 'M'),
    ("HID", 'H'),
    ("HIE", 'H'),
    ("HIP", 'H'),
    ("HSD", 'H'),
    ("HSE", 'H'),
    ("HSP", 'H'),
    ("CYX", 'C'),
    ("CYM", 'C'),
    ("ASH", 'D'),
    ("GLH", 'E'),
    ("LYN", 'K'),
    ("SEP", 'S'),
    ("TPO", 'T'),
];

/// Returns `true` for residue names that denote an amino acid, standard or
/// modified. Waters, ions and ligands are rejected.
pub fn is_amino_acid(name: &str) -> bool {
    lookup(name).is_some()
}

/// One-letter code of a residue name, `'X'` for anything that is not an
/// amino acid.
pub fn one_letter_code(name: &str) -> char {
    lookup(name).unwrap_or('X')
}

fn lookup(name: &str) -> Option<char> {
    let name = name.trim();
    STANDARD_AMINO_ACIDS
        .iter()
        .chain(MODIFIED_AMINO_ACIDS.iter())
        .find(|(code, _)| code.eq_ignore_ascii_case(name))
        .map(|(_, letter)| *letter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amino_acid_predicate() {
        assert!(is_amino_acid("ALA"));
        assert!(is_amino_acid("gly"));
        assert!(is_amino_acid("MSE"));
        assert!(!is_amino_acid("HOH"));
        assert!(!is_amino_acid("ZN"));
        assert!(!is_amino_acid("LIG"));
    }

    #[test]
    fn one_letter_codes() {
        assert_eq!(one_letter_code("TRP"), 'W');
        assert_eq!(one_letter_code("HIE"), 'H');
        assert_eq!(one_letter_code("HOH"), 'X');
    }

    #[test]
    fn new_residue_defaults() {
        let res = Residue::new("SER", 'A', 12, None, 3);
        assert_eq!(res.insertion_code, ' ');
        assert!(res.is_empty());
        assert!(res.is_amino_acid());
        assert_eq!(res.one_letter(), 'S');
    }
}
