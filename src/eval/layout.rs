//! On-disk layout of a generation/evaluation run.
//!
//! ```text
//! <out>/
//!   manifest.toml
//!   summary.tsv
//!   batch_0/
//!     orig.pdb  orig.sdf
//!     0_whole.pdb  0.sdf
//!     1_whole.pdb  1.sdf
//!   batch_1/
//!     ...
//! ```

use std::io;
use std::path::{Path, PathBuf};

pub const BATCH_PREFIX: &str = "batch_";
pub const SOURCE_RECEPTOR: &str = "orig.pdb";
pub const SOURCE_LIGAND: &str = "orig.sdf";
pub const CANDIDATE_RECEPTOR_SUFFIX: &str = "_whole.pdb";
pub const FEATURES_FILE: &str = "features.json";

/// Paths and row ids for one batch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLayout {
    index: usize,
    dir: PathBuf,
}

impl BatchLayout {
    pub fn new(out_dir: &Path, index: usize) -> Self {
        Self {
            index,
            dir: out_dir.join(Self::dir_name(index)),
        }
    }

    pub fn dir_name(index: usize) -> String {
        format!("{BATCH_PREFIX}{index}")
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn source_receptor(&self) -> PathBuf {
        self.dir.join(SOURCE_RECEPTOR)
    }

    pub fn source_ligand(&self) -> PathBuf {
        self.dir.join(SOURCE_LIGAND)
    }

    pub fn candidate_receptor(&self, i: usize) -> PathBuf {
        self.dir.join(format!("{i}{CANDIDATE_RECEPTOR_SUFFIX}"))
    }

    pub fn candidate_ligand(&self, i: usize) -> PathBuf {
        self.dir.join(format!("{i}.sdf"))
    }

    pub fn features(&self) -> PathBuf {
        self.dir.join(FEATURES_FILE)
    }

    pub fn source_id(&self) -> String {
        format!("{}/src", Self::dir_name(self.index))
    }

    pub fn candidate_id(&self, i: usize) -> String {
        format!("{}/{i}", Self::dir_name(self.index))
    }

    /// Number of candidates present on disk, counting `0_whole.pdb`,
    /// `1_whole.pdb`, ... until the first gap.
    pub fn count_candidates(&self) -> usize {
        (0..)
            .take_while(|&i| self.candidate_receptor(i).is_file())
            .count()
    }
}

/// Parses `batch_<n>` into `n`.
pub fn parse_batch_dir_name(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(BATCH_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Indices of all `batch_<n>` directories under `out_dir`, ascending.
pub fn discover_batches(out_dir: &Path) -> io::Result<Vec<usize>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(out_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(index) = entry.file_name().to_str().and_then(parse_batch_dir_name) {
            found.push(index);
        }
    }
    found.sort_unstable();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn paths_and_ids() {
        let layout = BatchLayout::new(Path::new("/runs/x"), 2);
        assert_eq!(layout.dir(), Path::new("/runs/x/batch_2"));
        assert_eq!(layout.source_receptor(), Path::new("/runs/x/batch_2/orig.pdb"));
        assert_eq!(layout.source_ligand(), Path::new("/runs/x/batch_2/orig.sdf"));
        assert_eq!(
            layout.candidate_receptor(4),
            Path::new("/runs/x/batch_2/4_whole.pdb")
        );
        assert_eq!(layout.candidate_ligand(4), Path::new("/runs/x/batch_2/4.sdf"));
        assert_eq!(layout.source_id(), "batch_2/src");
        assert_eq!(layout.candidate_id(0), "batch_2/0");
    }

    #[test]
    fn batch_dir_names() {
        assert_eq!(parse_batch_dir_name("batch_0"), Some(0));
        assert_eq!(parse_batch_dir_name("batch_17"), Some(17));
        assert_eq!(parse_batch_dir_name("batch_"), None);
        assert_eq!(parse_batch_dir_name("batch_+1"), None);
        assert_eq!(parse_batch_dir_name("batch_1a"), None);
        assert_eq!(parse_batch_dir_name("poses"), None);
    }

    #[test]
    fn discovers_batches_and_contiguous_candidates() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["batch_1", "batch_0", "batch_10", "notes"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("batch_3"), "a file, not a batch").unwrap();
        assert_eq!(discover_batches(dir.path()).unwrap(), vec![0, 1, 10]);

        let layout = BatchLayout::new(dir.path(), 0);
        for i in [0, 1, 3] {
            fs::write(layout.candidate_receptor(i), "END\n").unwrap();
        }
        assert_eq!(layout.count_candidates(), 2);
        assert_eq!(BatchLayout::new(dir.path(), 1).count_candidates(), 0);
    }
}
