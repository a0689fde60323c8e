//! Geometric, thermodynamic and sequence analyses.
//!
//! - [`window`] – Docking box around the ligand site.
//! - [`pocket`] – Two-tier residue selection defining the pocket.
//! - [`spatial`] – Cell-list neighbour queries used by the selection.
//! - [`affinity`] – ΔG to Kd conversion.
//! - [`mutation`] – Positional sequence diff between receptor variants.
//!
//! Every function here is pure and deterministic.

pub mod affinity;
mod error;
pub mod mutation;
pub mod pocket;
pub mod spatial;
pub mod window;

pub use error::Error;
