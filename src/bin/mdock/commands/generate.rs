use std::time::Duration;

use anyhow::{Context, Result, ensure};
use mutant_dock::eval::{BatchLayout, MANIFEST_FILE};
use mutant_dock::{CommandGenerator, EvalConfig, Pipeline, PocketParams, PocketSelector};

use super::pocket_params;
use crate::cli::GenerateArgs;
use crate::display::{Context as DisplayContext, Progress, print_kv_table};

const TOTAL_STEPS: u8 = 1;

pub fn run_generate(args: GenerateArgs, ctx: DisplayContext) -> Result<()> {
    ensure!(args.batches > 0, "--batches must be at least 1");
    ensure!(args.candidates > 0, "--candidates must be at least 1");

    let configured = match &args.config {
        Some(path) => {
            EvalConfig::load(path)
                .with_context(|| format!("Failed to load run configuration '{}'", path.display()))?
                .pocket
        }
        None => PocketParams::default(),
    };
    let params = pocket_params(&args.pocket, configured);
    log::debug!(
        "pocket radii: outer {:.1} Å, inner {:.1} Å",
        params.outer_radius,
        params.inner_radius
    );
    let selector = PocketSelector::new(params).context("Invalid pocket radii")?;
    let generator = CommandGenerator::new(&args.generator.program)
        .with_args(args.generator.args.iter().cloned())
        .with_timeout(Duration::from_secs(args.generator.timeout))
        .with_seed(args.generator.seed);
    let pipeline = Pipeline::new(&generator, selector);

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    let description = format!(
        "Generating {} × {} candidates",
        args.batches, args.candidates
    );
    progress.step(&description);
    let manifest = pipeline
        .generate_batches(
            &args.pair.receptor,
            &args.pair.ligand,
            &args.out_dir,
            args.batches,
            args.candidates,
        )
        .with_context(|| format!("Generation into '{}' failed", args.out_dir.display()))?;
    progress.complete_step(
        &description,
        &[format!(
            "Manifest: {}",
            args.out_dir.join(MANIFEST_FILE).display()
        )],
    );
    progress.finish("Generation complete");

    if ctx.interactive {
        print_kv_table(
            "Run Directory",
            &[
                ("Batches", manifest.batches.len().to_string()),
                ("Candidates", manifest.total_candidates().to_string()),
            ],
        );
    }

    for entry in &manifest.batches {
        println!(
            "{}\t{}",
            BatchLayout::dir_name(entry.index),
            entry.candidates
        );
    }
    Ok(())
}
