//! Core data structures for receptors and ligands.
//!
//! - [`element`] – Chemical elements and symbol guessing for loosely formatted files.
//! - [`atom`] – Receptor atoms with their owning residue and chain.
//! - [`residue`] – Residues, the amino-acid predicate and one-letter codes.
//! - [`structure`] – Parsed receptors ([`Structure`]) and ligands ([`LigandGeometry`]).
//!
//! Structures are built once by the [`crate::io`] readers and only read
//! afterwards; sub-structures (such as a pocket) are new values produced by
//! [`Structure::extract`](structure::Structure::extract).
//!
//! [`Structure`]: structure::Structure
//! [`LigandGeometry`]: structure::LigandGeometry

pub mod atom;
pub mod element;
pub mod residue;
pub mod structure;
