use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "mdock",
    about = "Pocket extraction, docking and affinity evaluation for generated receptor variants",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub output: OutputOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute the docking box around a bound ligand
    #[command(visible_alias = "w")]
    Window(WindowArgs),

    /// Extract the two-tier binding pocket (and optionally its features)
    #[command(visible_alias = "p")]
    Pocket(PocketArgs),

    /// Count positional amino-acid substitutions between two receptors
    #[command(visible_alias = "m")]
    Mutations(MutationsArgs),

    /// Dock a ligand into a receptor and report affinities
    #[command(visible_alias = "d")]
    Dock(DockArgs),

    /// Materialize batches of generated receptor variants
    #[command(visible_alias = "g")]
    Generate(GenerateArgs),

    /// Dock every batch of a run directory and write the summary
    #[command(visible_alias = "e")]
    Evaluate(EvaluateArgs),
}

/// Logging and progress options shared by all commands.
#[derive(Args)]
#[command(next_help_heading = "Output")]
pub struct OutputOptions {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress banner, progress and informational logs
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// A receptor and its bound ligand.
#[derive(Args)]
pub struct PairArgs {
    /// Receptor structure (PDB)
    #[arg(short, long, value_name = "FILE")]
    pub receptor: PathBuf,

    /// Bound ligand (SDF)
    #[arg(short, long, value_name = "FILE")]
    pub ligand: PathBuf,
}

#[derive(Args)]
#[command(next_help_heading = "Docking Window")]
pub struct WindowOptions {
    /// Capture distance around the ligand centroid (Å)
    #[arg(long, value_name = "Å", default_value = "5.0")]
    pub cutoff: f64,

    /// Margin added on each side of the captured atoms (Å)
    #[arg(long, value_name = "Å", default_value = "5.0")]
    pub padding: f64,
}

#[derive(Args)]
#[command(next_help_heading = "Pocket Selection")]
pub struct PocketOptions {
    /// Radius of the pocket handed to the generator (Å) [default: 10.0]
    #[arg(long, value_name = "Å")]
    pub outer: Option<f64>,

    /// Radius of the residues the generator may redesign (Å) [default: 3.5]
    #[arg(long, value_name = "Å")]
    pub inner: Option<f64>,
}

#[derive(Args)]
#[command(next_help_heading = "Docking")]
pub struct DockingOptions {
    /// Search exhaustiveness
    #[arg(long, value_name = "N", default_value = "40")]
    pub exhaustiveness: u32,

    /// Number of poses to generate
    #[arg(long, value_name = "N", default_value = "20")]
    pub poses: u32,

    /// Report only the best pose instead of averaging all of them
    #[arg(long)]
    pub best: bool,

    /// Keep docked poses in this directory
    #[arg(long, value_name = "DIR")]
    pub write_poses: Option<PathBuf>,

    /// Timeout per conversion and per whole Vina run (seconds)
    #[arg(long, value_name = "SECS", default_value = "600")]
    pub timeout: u64,

    /// CPUs per docking call (engine default if omitted)
    #[arg(long, value_name = "N")]
    pub cpu: Option<usize>,

    /// Random seed for the docking search
    #[arg(long, value_name = "SEED", allow_hyphen_values = true)]
    pub seed: Option<i64>,

    /// Vina executable
    #[arg(long, value_name = "PATH", default_value = "vina")]
    pub vina: PathBuf,

    /// Open Babel executable
    #[arg(long, value_name = "PATH", default_value = "obabel")]
    pub obabel: PathBuf,
}

#[derive(Args)]
pub struct WindowArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    #[command(flatten)]
    pub window: WindowOptions,
}

#[derive(Args)]
pub struct PocketArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    #[command(flatten)]
    pub pocket: PocketOptions,

    /// Write the pocket residues as PDB
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the generator features as JSON
    #[arg(long, value_name = "FILE")]
    pub features: Option<PathBuf>,
}

#[derive(Args)]
pub struct MutationsArgs {
    /// Reference receptor
    #[arg(value_name = "ORIGINAL")]
    pub original: PathBuf,

    /// Variant receptor
    #[arg(value_name = "VARIANT")]
    pub variant: PathBuf,
}

#[derive(Args)]
pub struct DockArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    #[command(flatten)]
    pub window: WindowOptions,

    #[command(flatten)]
    pub docking: DockingOptions,

    /// Temperature for the Kd conversion (K)
    #[arg(long, value_name = "K", default_value = "298.0")]
    pub temperature: f64,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    /// Run directory receiving the batches
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Number of batches to add
    #[arg(long, value_name = "N", default_value = "1")]
    pub batches: usize,

    /// Candidates per batch
    #[arg(long, value_name = "N", default_value = "100")]
    pub candidates: usize,

    /// Run configuration (TOML) supplying [pocket]; pocket flags override it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub pocket: PocketOptions,

    #[command(flatten)]
    pub generator: GeneratorOptions,
}

#[derive(Args)]
#[command(next_help_heading = "Generator")]
pub struct GeneratorOptions {
    /// Generator executable
    #[arg(long = "generator", value_name = "CMD")]
    pub program: PathBuf,

    /// Extra argument passed to the generator, repeatable
    #[arg(
        long = "generator-arg",
        value_name = "ARG",
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,

    /// Seed forwarded to the generator
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Timeout per batch (seconds)
    #[arg(long = "generator-timeout", value_name = "SECS", default_value = "3600")]
    pub timeout: u64,
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Run directory holding the batches
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Run configuration (TOML); flags below override it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: EvaluateOverrides,
}

#[derive(Args)]
#[command(next_help_heading = "Overrides")]
pub struct EvaluateOverrides {
    /// Candidates docked concurrently within a batch
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// How failed rows appear in the summary
    #[arg(long, value_name = "MARKER")]
    pub failure_marker: Option<FailureMarkerArg>,

    /// Search exhaustiveness
    #[arg(long, value_name = "N")]
    pub exhaustiveness: Option<u32>,

    /// Number of poses to generate
    #[arg(long, value_name = "N")]
    pub poses: Option<u32>,

    /// Summary file name inside the run directory
    #[arg(long, value_name = "NAME")]
    pub summary_name: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FailureMarkerArg {
    /// Write NA in the energy and affinity columns
    Sentinel,
    /// Write the zero-energy placeholder values
    Zero,
}

pub fn parse() -> Cli {
    Cli::parse()
}
