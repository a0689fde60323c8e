use anyhow::{Context, Result};
use mutant_dock::generate::features::write_batch;
use mutant_dock::{PocketFeatures, PocketParams, PocketSelector};

use super::{pair_substeps, pocket_params, read_pair};
use crate::cli::PocketArgs;
use crate::display::{Context as DisplayContext, Progress, print_kv_table};

const TOTAL_STEPS: u8 = 3;

pub fn run_pocket(args: PocketArgs, ctx: DisplayContext) -> Result<()> {
    let params = pocket_params(&args.pocket, PocketParams::default());
    let selector = PocketSelector::new(params).context("Invalid pocket radii")?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading structures");
    let (receptor, ligand) = read_pair(&args.pair)?;
    progress.complete_step("Reading structures", &pair_substeps(&receptor, &ligand));

    progress.step("Selecting pocket residues");
    let pocket = selector
        .select(&receptor, &ligand.positions)
        .context("Pocket selection failed")?;
    progress.complete_step(
        "Selecting pocket residues",
        &[
            format!("{} residues within {:.1} Å", pocket.residue_count(), params.outer_radius),
            format!("{} editable within {:.1} Å", pocket.editable_count(), params.inner_radius),
        ],
    );

    progress.step("Writing output");
    let mut written = Vec::new();
    if let Some(path) = &args.output {
        let block = pocket.to_pdb().context("Failed to render pocket structure")?;
        std::fs::write(path, block)
            .with_context(|| format!("Failed to write pocket structure to '{}'", path.display()))?;
        written.push(format!("Pocket: {}", path.display()));
    }
    if let Some(path) = &args.features {
        let features =
            PocketFeatures::from_pocket(&pocket, &ligand, &args.pair.receptor, &args.pair.ligand);
        write_batch(path, &[features]).context("Failed to write pocket features")?;
        written.push(format!("Features: {}", path.display()));
    }
    progress.complete_step("Writing output", &written);
    progress.finish("Pocket ready");

    if ctx.interactive {
        print_kv_table(
            "Pocket",
            &[
                ("Residues", pocket.residue_count().to_string()),
                ("Editable", pocket.editable_count().to_string()),
                ("Atoms", pocket.structure.atom_count().to_string()),
            ],
        );
    }

    println!("{}", pocket.sequence);
    let editable: Vec<String> = pocket
        .inner_original_indices()
        .iter()
        .map(|i| i.to_string())
        .collect();
    println!("{}", editable.join(","));
    Ok(())
}
