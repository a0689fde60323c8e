use anyhow::{Context, Result, ensure};
use mutant_dock::{EvalConfig, FailureMarker, Orchestrator};

use crate::cli::{EvaluateArgs, EvaluateOverrides, FailureMarkerArg};
use crate::display::{BatchProgress, Context as DisplayContext, print_kv_table, print_records};

const TOP_ROWS: usize = 10;

pub fn run_evaluate(args: EvaluateArgs, ctx: DisplayContext) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EvalConfig::load(path)
            .with_context(|| format!("Failed to load run configuration '{}'", path.display()))?,
        None => EvalConfig::default(),
    };
    apply_overrides(&mut config, &args.overrides)?;

    let orchestrator = Orchestrator::new(config).context("Invalid run configuration")?;

    let progress = BatchProgress::new(ctx.interactive);
    let result = orchestrator.run(&args.out_dir, &progress);
    progress.finish();
    let summary =
        result.with_context(|| format!("Evaluation of '{}' failed", args.out_dir.display()))?;

    if ctx.interactive {
        print_kv_table(
            "Evaluation",
            &[
                ("Rows", summary.records.len().to_string()),
                ("Docking failures", summary.failed().to_string()),
                ("Summary", summary.path.display().to_string()),
            ],
        );
        print_records(&summary.records, TOP_ROWS);
    }

    println!("{}", summary.path.display());
    Ok(())
}

fn apply_overrides(config: &mut EvalConfig, overrides: &EvaluateOverrides) -> Result<()> {
    if let Some(jobs) = overrides.jobs {
        ensure!(jobs > 0, "--jobs must be at least 1");
        config.jobs = jobs;
    }
    if let Some(marker) = overrides.failure_marker {
        config.failure_marker = match marker {
            FailureMarkerArg::Sentinel => FailureMarker::Sentinel,
            FailureMarkerArg::Zero => FailureMarker::Zero,
        };
    }
    if let Some(exhaustiveness) = overrides.exhaustiveness {
        config.docking.exhaustiveness = exhaustiveness;
    }
    if let Some(poses) = overrides.poses {
        config.docking.num_poses = poses;
    }
    if let Some(name) = &overrides.summary_name {
        config.summary_name = name.clone();
    }
    Ok(())
}
