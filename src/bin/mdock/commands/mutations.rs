use anyhow::{Context, Result};
use mutant_dock::analysis::mutation::compare_structures;
use mutant_dock::io;

use crate::cli::MutationsArgs;

pub fn run_mutations(args: MutationsArgs) -> Result<()> {
    let original = io::read_receptor(&args.original).context("Failed to read original receptor")?;
    let variant = io::read_receptor(&args.variant).context("Failed to read variant receptor")?;

    let report = compare_structures(&original, &variant);
    if report.length_mismatch {
        log::warn!(
            "sequences differ in length; compared the first {} residues",
            report.compared
        );
    }

    println!("{}", report.count());
    for mutation in &report.mutations {
        println!("{mutation}");
    }
    Ok(())
}
