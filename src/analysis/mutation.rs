//! Positional sequence comparison between a receptor and its variant.

use crate::model::structure::Structure;
use std::fmt;

/// A single substitution. `position` is 1-based along the amino-acid
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub position: usize,
    pub from: String,
    pub to: String,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.from, self.position, self.to)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationReport {
    pub mutations: Vec<Mutation>,
    /// Length of the compared prefix.
    pub compared: usize,
    /// `true` when the two sequences have different lengths.
    pub length_mismatch: bool,
}

impl MutationReport {
    #[inline]
    pub fn count(&self) -> usize {
        self.mutations.len()
    }
}

/// Compares two residue-name sequences position by position.
///
/// Only the overlapping prefix is compared; extra residues on either side
/// are ignored.
pub fn diff_sequences<A, B>(original: &[A], variant: &[B]) -> MutationReport
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mutations = original
        .iter()
        .zip(variant)
        .enumerate()
        .filter(|(_, (a, b))| a.as_ref() != b.as_ref())
        .map(|(i, (a, b))| Mutation {
            position: i + 1,
            from: a.as_ref().to_string(),
            to: b.as_ref().to_string(),
        })
        .collect();

    MutationReport {
        mutations,
        compared: original.len().min(variant.len()),
        length_mismatch: original.len() != variant.len(),
    }
}

/// Compares the amino-acid sequences of two structures.
///
/// Waters, ions and ligands are dropped before comparison.
pub fn compare_structures(original: &Structure, variant: &Structure) -> MutationReport {
    let report = diff_sequences(
        &original.amino_acid_sequence(),
        &variant.amino_acid_sequence(),
    );
    if report.length_mismatch {
        log::debug!(
            "sequence lengths differ; compared the first {} residues only",
            report.compared
        );
    }
    report
}

/// Number of mutated positions between two structures.
pub fn count_mutations(original: &Structure, variant: &Structure) -> usize {
    compare_structures(original, variant).count()
}
