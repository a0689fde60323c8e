use anyhow::{Context, Result};
use mutant_dock::{WindowParams, compute_window};

use super::{pair_substeps, read_pair};
use crate::cli::WindowArgs;
use crate::display::{Context as DisplayContext, Progress, print_kv_table};

const TOTAL_STEPS: u8 = 2;

pub fn run_window(args: WindowArgs, ctx: DisplayContext) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading structures");
    let (receptor, ligand) = read_pair(&args.pair)?;
    progress.complete_step("Reading structures", &pair_substeps(&receptor, &ligand));

    progress.step("Computing docking window");
    let params = WindowParams {
        cutoff: args.window.cutoff,
        padding: args.window.padding,
    };
    let window = compute_window(&receptor, &ligand.positions, &params).with_context(|| {
        format!(
            "Failed to compute the docking window around '{}'",
            args.pair.ligand.display()
        )
    })?;
    progress.complete_step(
        "Computing docking window",
        &[format!(
            "cutoff {:.1} Å, padding {:.1} Å",
            params.cutoff, params.padding
        )],
    );
    progress.finish("Window ready");

    if ctx.interactive {
        let [cx, cy, cz] = window.center;
        let [sx, sy, sz] = window.size;
        print_kv_table(
            "Docking Window",
            &[
                ("Center (Å)", format!("{cx:.3}, {cy:.3}, {cz:.3}")),
                ("Size (Å)", format!("{sx:.3} × {sy:.3} × {sz:.3}")),
                ("Volume (Å³)", format!("{:.1}", window.volume())),
            ],
        );
    }

    // Vina config syntax, so the output can be saved as a --config file.
    for (axis, center, size) in [
        ("x", window.center[0], window.size[0]),
        ("y", window.center[1], window.size[1]),
        ("z", window.center[2], window.size[2]),
    ] {
        println!("center_{axis} = {center:.3}");
        println!("size_{axis} = {size:.3}");
    }
    Ok(())
}
