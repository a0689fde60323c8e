use anyhow::{Context, Result};
use mutant_dock::analysis::affinity::{AffinityConverter, AffinityParams, mean};
use mutant_dock::{DockingAdapter, DockingConfig, ScoreMode, WindowParams, compute_window};

use super::{pair_substeps, read_pair};
use crate::cli::{DockArgs, DockingOptions};
use crate::display::{Context as DisplayContext, Progress, print_kv_table};
use crate::util::text::molar;

const TOTAL_STEPS: u8 = 3;

pub fn run_dock(args: DockArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_docking_config(&args.docking);
    let adapter = DockingAdapter::vina(config).context("Invalid docking options")?;
    let converter = AffinityConverter::new(AffinityParams {
        temperature: args.temperature,
        ..AffinityParams::default()
    })
    .context("Invalid temperature")?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading structures");
    let (receptor, ligand) = read_pair(&args.pair)?;
    progress.complete_step("Reading structures", &pair_substeps(&receptor, &ligand));

    progress.step("Computing docking window");
    let params = WindowParams {
        cutoff: args.window.cutoff,
        padding: args.window.padding,
    };
    let window = compute_window(&receptor, &ligand.positions, &params)
        .context("Failed to compute the docking window")?;
    let [sx, sy, sz] = window.size;
    progress.complete_step(
        "Computing docking window",
        &[format!("{sx:.1} × {sy:.1} × {sz:.1} Å")],
    );

    progress.step(&format!("Docking with {}", adapter.engine_name()));
    let outcome = adapter
        .dock(&args.pair.receptor, &args.pair.ligand, &window)
        .context("Docking failed")?;
    let energies = outcome.energies();
    progress.complete_step(
        &format!("Docking with {}", adapter.engine_name()),
        &[format!(
            "{} poses, exhaustiveness {}",
            energies.len(),
            args.docking.exhaustiveness
        )],
    );
    progress.finish("Docking complete");

    let mean_dg = mean(energies.iter().copied()).unwrap_or(outcome.best());
    let mean_kd = converter.mean_kd(energies).unwrap_or(f64::NAN);

    if ctx.interactive {
        print_kv_table(
            "Affinity",
            &[
                ("Best ΔG", format!("{:.2} kcal/mol", outcome.best())),
                ("Mean ΔG", format!("{mean_dg:.2} kcal/mol")),
                ("Mean Kd", molar(mean_kd)),
            ],
        );
    }

    println!("pose\tdelta_G\tKd");
    for (i, dg) in energies.iter().enumerate() {
        println!("{}\t{dg}\t{}", i + 1, converter.kd(*dg));
    }
    println!("mean\t{mean_dg}\t{mean_kd}");
    Ok(())
}

fn build_docking_config(opts: &DockingOptions) -> DockingConfig {
    DockingConfig {
        exhaustiveness: opts.exhaustiveness,
        num_poses: opts.poses,
        mode: if opts.best {
            ScoreMode::BestOnly
        } else {
            ScoreMode::AllPoses
        },
        write_poses: opts.write_poses.is_some(),
        poses_dir: opts.write_poses.clone(),
        timeout_secs: opts.timeout,
        vina: opts.vina.clone(),
        obabel: opts.obabel.clone(),
        cpu: opts.cpu,
        seed: opts.seed,
    }
}
