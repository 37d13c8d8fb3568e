//! Command-line parsing for the inverse-PIT tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/transform code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DegeneratePolicy, EdgeOrder, Extrapolation, Normalization, SampleKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "invpit",
    version,
    about = "Re-express sampled distributions on a fiducial scale (inverse PIT)"
)]
pub struct Cli {
    /// Log fit/transform details to stderr (same as `INVPIT_LOG=debug`).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Map a test PDF/CDF table onto the fiducial scale.
    Transform(TransformArgs),
    /// Evaluate the fiducial quantile function at given probabilities.
    Quantile(QuantileArgs),
    /// Map individual test draws onto the fiducial scale.
    Remap(RemapArgs),
    /// Print a previously exported curve JSON.
    Show(ShowArgs),
    /// Run the built-in normal-vs-normal example.
    Demo(DemoArgs),
}

/// Where the fiducial distribution comes from and how its table is built.
#[derive(Debug, Args, Clone)]
pub struct FiducialArgs {
    /// Fiducial table CSV (`x` plus a value column).
    #[arg(long, value_name = "CSV")]
    pub fiducial: PathBuf,

    /// Whether the fiducial table holds PDF or CDF values.
    #[arg(long, value_enum, default_value_t = SampleKind::Pdf)]
    pub fiducial_kind: SampleKind,

    /// Rescale the fitted CDF table so it ends at 1.
    ///
    /// Defaults to `total` for PDF tables and `if-needed` for CDF tables.
    #[arg(long, value_enum)]
    pub normalize: Option<Normalization>,

    /// Quantile behavior for probabilities outside the fitted table.
    #[arg(long, value_enum, default_value_t = Extrapolation::Clamp)]
    pub extrapolation: Extrapolation,
}

/// The test distribution table.
#[derive(Debug, Args, Clone)]
pub struct TestArgs {
    /// Test table CSV (`x` plus a value column).
    #[arg(long, value_name = "CSV")]
    pub test: PathBuf,

    /// Whether the test table holds PDF or CDF values.
    #[arg(long, value_enum, default_value_t = SampleKind::Pdf)]
    pub test_kind: SampleKind,
}

/// Options for `invpit transform`.
#[derive(Debug, Args, Clone)]
pub struct TransformArgs {
    #[command(flatten)]
    pub fiducial: FiducialArgs,

    #[command(flatten)]
    pub test: TestArgs,

    /// Boundary stencil for the Jacobian estimate.
    #[arg(long, value_enum, default_value_t = EdgeOrder::Second)]
    pub edge_order: EdgeOrder,

    /// What to do where the Jacobian vanishes (PDF transforms only).
    #[arg(long, value_enum, default_value_t = DegeneratePolicy::Zero)]
    pub degenerate: DegeneratePolicy,

    /// Export the transformed curve to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the transformed curve (plus run metadata) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for `invpit quantile`.
#[derive(Debug, Args, Clone)]
pub struct QuantileArgs {
    #[command(flatten)]
    pub fiducial: FiducialArgs,

    /// Probabilities to evaluate.
    #[arg(short = 'p', long = "prob", value_name = "P", num_args = 1.., required = true, allow_negative_numbers = true)]
    pub probabilities: Vec<f64>,
}

/// Options for `invpit remap`.
#[derive(Debug, Args, Clone)]
pub struct RemapArgs {
    #[command(flatten)]
    pub fiducial: FiducialArgs,

    #[command(flatten)]
    pub test: TestArgs,

    /// Draws from the test distribution (`sample` column or the first column).
    #[arg(long, value_name = "CSV")]
    pub samples: PathBuf,

    /// Export `sample,remapped` rows to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// Options for `invpit show`.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Curve JSON file produced by `invpit transform --export-json`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,
}

/// Options for `invpit demo`.
///
/// The fiducial is a standard normal; the test distribution is
/// `N(loc, scale²)`. Both are tabulated on `linspace(-4, 4, points)`.
#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Grid size.
    #[arg(long, default_value_t = 1000)]
    pub points: usize,

    /// Test distribution mean.
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    pub loc: f64,

    /// Test distribution standard deviation.
    #[arg(long, default_value_t = 0.5)]
    pub scale: f64,

    /// Number of random test draws to remap (0 skips the remap step).
    #[arg(long, default_value_t = 10_000)]
    pub draws: usize,

    /// Random seed for the draws.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
