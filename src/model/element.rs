use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

/// Chemical elements found in receptors, ligands and their cofactors.
///
/// Anything outside this set is carried as [`Element::Unknown`] so that a
/// structure with an exotic HETATM record still parses; geometry does not
/// depend on the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    H,
    B,
    C,
    N,
    O,
    F,
    Na,
    Mg,
    Si,
    P,
    S,
    Cl,
    K,
    Ca,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Se,
    Br,
    I,
    Unknown,
}

impl Element {
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Co => "Co",
            Element::Ni => "Ni",
            Element::Cu => "Cu",
            Element::Zn => "Zn",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::I => "I",
            Element::Unknown => "X",
        }
    }

    /// Guesses the element from a PDB/SDF token, tolerating upper-case
    /// symbols (`CL`, `ZN`) and atom names with trailing digits (`CA1`).
    ///
    /// Two-letter symbols win only when the token is exactly that symbol,
    /// so the protein atom name `CA` stays carbon.
    pub fn guess(token: &str) -> Option<Self> {
        let letters: String = token
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        if letters.is_empty() {
            return None;
        }

        let normalized = normalize_symbol(&letters);
        if let Ok(el) = normalized.parse::<Element>() {
            return Some(el);
        }

        let first = letters[..1].to_ascii_uppercase();
        first.parse::<Element>().ok()
    }
}

fn normalize_symbol(s: &str) -> String {
    s.chars()
        .enumerate()
        .map(|(i, c)| {
            if i == 0 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "H" | "D" => Ok(Element::H),
            "B" => Ok(Element::B),
            "C" => Ok(Element::C),
            "N" => Ok(Element::N),
            "O" => Ok(Element::O),
            "F" => Ok(Element::F),
            "Na" => Ok(Element::Na),
            "Mg" => Ok(Element::Mg),
            "Si" => Ok(Element::Si),
            "P" => Ok(Element::P),
            "S" => Ok(Element::S),
            "Cl" => Ok(Element::Cl),
            "K" => Ok(Element::K),
            "Ca" => Ok(Element::Ca),
            "Mn" => Ok(Element::Mn),
            "Fe" => Ok(Element::Fe),
            "Co" => Ok(Element::Co),
            "Ni" => Ok(Element::Ni),
            "Cu" => Ok(Element::Cu),
            "Zn" => Ok(Element::Zn),
            "Se" => Ok(Element::Se),
            "Br" => Ok(Element::Br),
            "I" => Ok(Element::I),
            _ => Err(ParseElementError(s.to_string())),
        }
    }
}
