mod dock;
mod evaluate;
mod generate;
mod mutations;
mod pocket;
mod window;

use anyhow::{Context, Result};
use mutant_dock::{LigandGeometry, PocketParams, Structure, io};

use crate::cli::{Command, PairArgs, PocketOptions};
use crate::display::Context as DisplayContext;

pub fn dispatch(command: Command, ctx: DisplayContext) -> Result<()> {
    match command {
        Command::Window(args) => window::run_window(args, ctx),
        Command::Pocket(args) => pocket::run_pocket(args, ctx),
        Command::Mutations(args) => mutations::run_mutations(args),
        Command::Dock(args) => dock::run_dock(args, ctx),
        Command::Generate(args) => generate::run_generate(args, ctx),
        Command::Evaluate(args) => evaluate::run_evaluate(args, ctx),
    }
}

fn read_pair(pair: &PairArgs) -> Result<(Structure, LigandGeometry)> {
    let receptor = io::read_receptor(&pair.receptor).context("Failed to read receptor")?;
    let ligand = io::read_ligand(&pair.ligand).context("Failed to read ligand")?;
    Ok((receptor, ligand))
}

fn pair_substeps(receptor: &Structure, ligand: &LigandGeometry) -> Vec<String> {
    vec![
        format!(
            "Receptor: {} residues, {} atoms",
            receptor.residue_count(),
            receptor.atom_count()
        ),
        format!("Ligand: {} atoms", ligand.atom_count()),
    ]
}

/// Pocket radii from the command line, falling back to `base` per flag.
fn pocket_params(opts: &PocketOptions, base: PocketParams) -> PocketParams {
    PocketParams {
        outer_radius: opts.outer.unwrap_or(base.outer_radius),
        inner_radius: opts.inner.unwrap_or(base.inner_radius),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pocket_flags_override_configured_radii() {
        let configured = PocketParams {
            outer_radius: 12.0,
            inner_radius: 4.0,
        };
        let none = PocketOptions {
            outer: None,
            inner: None,
        };
        assert_eq!(pocket_params(&none, configured), configured);

        let inner_only = PocketOptions {
            outer: None,
            inner: Some(2.5),
        };
        let merged = pocket_params(&inner_only, configured);
        assert_eq!(merged.outer_radius, 12.0);
        assert_eq!(merged.inner_radius, 2.5);

        assert_eq!(pocket_params(&none, PocketParams::default()), PocketParams::default());
    }
}
