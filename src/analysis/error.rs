use thiserror::Error;

/// Errors raised by the geometric and thermodynamic analyses.
///
/// All of these indicate malformed inputs or configuration rather than a
/// transient failure, so the evaluation pipeline treats them as fatal.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// The ligand has no atoms, so no centroid can be computed.
    #[error("ligand contains no atoms: cannot compute a centroid")]
    EmptyLigand,

    /// The computed docking window has a non-positive extent.
    #[error("degenerate docking window: size ({x:.3}, {y:.3}, {z:.3}) must be positive on every axis")]
    DegenerateWindow { x: f64, y: f64, z: f64 },

    /// A selection radius is negative, non-finite, or the tiers are inverted.
    #[error("invalid selection radius: {0}")]
    InvalidRadius(String),

    /// The pocket selection violated one of its cardinality invariants.
    #[error("pocket selection invariant violated: {0}")]
    SelectionInvariant(String),

    /// Temperature for the affinity conversion must be positive.
    #[error("temperature must be positive and finite, got {0} K")]
    InvalidTemperature(f64),
}
