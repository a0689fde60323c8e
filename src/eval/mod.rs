//! Batch evaluation of generated receptor variants.
//!
//! For every batch the [`Orchestrator`] docks the source receptor and each
//! candidate against its ligand, converts pose energies to affinities,
//! counts mutations against the batch's source receptor and writes a
//! single tab-separated summary. Docking failures are confined to their
//! own row; malformed or missing inputs abort the run.
//!
//! # Overview
//!
//! - [`EvalConfig`] – Run configuration (TOML).
//! - [`layout`] – Batch directory naming and row ids.
//! - [`BatchManifest`] – Persisted list of materialized batches.
//! - [`EvaluationRecord`] – One summary row.
//! - [`summary`] – TSV serialization.
//! - [`Orchestrator`] / [`EvalObserver`] – The run itself and its progress events.

mod config;
mod error;
pub mod layout;
mod manifest;
mod orchestrator;
mod record;
pub mod summary;

pub use config::{DEFAULT_SUMMARY_NAME, EVALUATION_WINDOW, EvalConfig, FailureMarker};
pub use error::Error;
pub use layout::BatchLayout;
pub use manifest::{BatchEntry, BatchManifest, MANIFEST_FILE};
pub use orchestrator::{EvalObserver, EvalSummary, NoopObserver, Orchestrator};
pub use record::{EvaluationRecord, RecordStatus};
