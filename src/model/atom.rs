use super::element::Element;

/// A receptor atom with the residue it belongs to.
///
/// `residue` indexes into [`Structure::residues`](super::structure::Structure::residues).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub name: String,
    pub element: Element,
    pub position: [f64; 3],
    pub residue: usize,
    pub chain_id: char,
    pub hetero: bool,
}

impl Atom {
    pub fn new(
        name: impl Into<String>,
        element: Element,
        position: [f64; 3],
        residue: usize,
        chain_id: char,
    ) -> Self {
        Self {
            name: name.into(),
            element,
            position,
            residue,
            chain_id,
            hetero: false,
        }
    }
}

#[inline]
pub fn distance_sq(a: [f64; 3], b: [f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}
