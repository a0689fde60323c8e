//! Persisted record of the batches materialized in a run directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::Error;
use super::layout::{self, BatchLayout};

pub const MANIFEST_FILE: &str = "manifest.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub index: usize,
    pub candidates: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receptor: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ligand: Option<PathBuf>,
    #[serde(default, rename = "batch")]
    pub batches: Vec<BatchEntry>,
}

impl BatchManifest {
    pub fn path(out_dir: &Path) -> PathBuf {
        out_dir.join(MANIFEST_FILE)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let mut manifest: Self = toml::from_str(s)?;
        manifest.batches.sort_by_key(|b| b.index);
        Ok(manifest)
    }

    /// Reads `manifest.toml` from `out_dir`; `Ok(None)` when absent.
    pub fn load(out_dir: &Path) -> Result<Option<Self>, Error> {
        let path = Self::path(out_dir);
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_toml_str(&text).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::fs(&path, e)),
        }
    }

    /// Rebuilds a manifest by scanning `batch_<n>` directories.
    pub fn discover(out_dir: &Path) -> Result<Self, Error> {
        let indices = layout::discover_batches(out_dir).map_err(|e| Error::fs(out_dir, e))?;
        let batches = indices
            .into_iter()
            .map(|index| BatchEntry {
                index,
                candidates: BatchLayout::new(out_dir, index).count_candidates(),
                generated_at: None,
            })
            .collect();
        Ok(Self {
            batches,
            ..Self::default()
        })
    }

    /// The manifest if present, otherwise what the directory scan finds.
    pub fn load_or_discover(out_dir: &Path) -> Result<Self, Error> {
        match Self::load(out_dir)? {
            Some(manifest) => Ok(manifest),
            None => {
                log::info!(
                    "no {MANIFEST_FILE} in {}; scanning batch directories",
                    out_dir.display()
                );
                Self::discover(out_dir)
            }
        }
    }

    /// Writes the manifest atomically.
    pub fn save(&self, out_dir: &Path) -> Result<(), Error> {
        let text = toml::to_string_pretty(self)?;
        let path = Self::path(out_dir);
        let mut tmp =
            tempfile::NamedTempFile::new_in(out_dir).map_err(|e| Error::fs(out_dir, e))?;
        tmp.write_all(text.as_bytes())
            .map_err(|e| Error::fs(tmp.path(), e))?;
        tmp.persist(&path).map_err(|e| Error::fs(&path, e.error))?;
        Ok(())
    }

    /// Index for the next batch to materialize.
    pub fn next_index(&self) -> usize {
        self.batches.iter().map(|b| b.index + 1).max().unwrap_or(0)
    }

    /// Adds or replaces the entry for `entry.index`, keeping entries sorted.
    pub fn record(&mut self, entry: BatchEntry) {
        match self.batches.binary_search_by_key(&entry.index, |b| b.index) {
            Ok(pos) => self.batches[pos] = entry,
            Err(pos) => self.batches.insert(pos, entry),
        }
    }

    pub fn total_candidates(&self) -> usize {
        self.batches.iter().map(|b| b.candidates).sum()
    }
}
