//! Evaluation pipeline for generated protein-receptor variants.
//!
//! Starting from a receptor and a bound ligand, the crate extracts the
//! binding pocket handed to a generative model, lays out the generated
//! candidates as numbered batches, then docks every candidate, converts
//! pose energies to dissociation constants, counts mutations against the
//! source receptor and writes one tab-separated summary. A candidate whose
//! docking fails is recorded as failed; the rest of the batch carries on.
//!
//! # Quick Start
//!
//! ```
//! use mutant_dock::analysis::affinity::AffinityConverter;
//! use mutant_dock::analysis::mutation::diff_sequences;
//! use mutant_dock::analysis::window::{WindowParams, compute_window};
//! use mutant_dock::{Element, Structure};
//!
//! let mut receptor = Structure::new();
//! let ala = receptor.add_residue("ALA", 'A', 1);
//! receptor.add_atom(ala, "CA", Element::C, [3.0, 0.0, 0.0]);
//!
//! let params = WindowParams { cutoff: 5.0, padding: 2.0 };
//! let window = compute_window(&receptor, &[[0.0, 0.0, 0.0]], &params)?;
//! assert_eq!(window.center, [3.0, 0.0, 0.0]);
//! assert_eq!(window.size, [4.0, 4.0, 4.0]);
//!
//! let kd = AffinityConverter::default().kd(0.0);
//! assert_eq!(kd, 1.0);
//!
//! let report = diff_sequences(&["ALA", "GLY", "SER"], &["ALA", "VAL", "SER"]);
//! assert_eq!(report.count(), 1);
//! # Ok::<(), mutant_dock::analysis::Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`model`] – Parsed receptors and ligands
//! - [`io`] – PDB and SDF reading, PDB writing
//! - [`analysis`] – Docking window, pocket selection, affinity, mutations
//! - [`dock`] – Docking adapter over external engines (Vina, Open Babel)
//! - [`generate`] – Pocket features and the generative-model boundary
//! - [`eval`] – Batch evaluation and the summary file

pub mod analysis;
pub mod dock;
pub mod eval;
pub mod generate;
pub mod io;
pub mod model;

pub use model::atom::Atom;
pub use model::element::{Element, ParseElementError};
pub use model::residue::Residue;
pub use model::structure::{LigandGeometry, Structure};

pub use analysis::pocket::{Pocket, PocketParams, PocketSelector};
pub use analysis::window::{DockingWindow, WindowParams, compute_window};
pub use dock::{DockingAdapter, DockingConfig, DockingOutcome, ScoreMode};
pub use eval::{EvalConfig, EvaluationRecord, FailureMarker, Orchestrator, RecordStatus};
pub use generate::{CommandGenerator, Pipeline, PocketFeatures, PocketGenerator};
