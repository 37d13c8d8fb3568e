//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs the log subscriber
//! - parses CLI arguments
//! - runs the fit/transform pipeline
//! - prints reports and writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, DemoArgs, FiducialArgs, QuantileArgs, RemapArgs, ShowArgs, TransformArgs};
use crate::data::compute_stats;
use crate::domain::{FiducialConfig, Normalization, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "INVPIT_LOG";

/// Entry point for the `invpit` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the common case.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Transform(args) => handle_transform(args),
        Command::Quantile(args) => handle_quantile(args),
        Command::Remap(args) => handle_remap(args),
        Command::Show(args) => handle_show(args),
        Command::Demo(args) => handle_demo(args),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Ignore the error if a subscriber is already installed (tests, embedding).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_transform(args: TransformArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_transform(&config)?;

    if let Some(mapping) = run.fitter.mapping() {
        println!("{}", crate::report::format_fit_summary(config.fiducial.kind.display_name(), mapping));
    }
    println!("{}", crate::report::format_curve_summary(&run.curve));

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::export::write_curve_csv(path, &run.curve)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::curve::write_curve_json(path, &run.curve, config.fiducial.kind, config.fiducial.extrapolation)?;
    }

    Ok(())
}

fn handle_quantile(args: QuantileArgs) -> Result<(), AppError> {
    let fiducial = fiducial_config_from_args(&args.fiducial);
    let fitter = pipeline::load_fiducial(&fiducial)?;
    let quantiles = fitter.quantile_many(&args.probabilities)?;

    println!("{}", crate::report::format_quantiles(&args.probabilities, &quantiles));
    Ok(())
}

fn handle_remap(args: RemapArgs) -> Result<(), AppError> {
    let fiducial = fiducial_config_from_args(&args.fiducial);
    let run = pipeline::run_remap(&fiducial, &args.test.test, args.test.test_kind, &args.samples)?;

    if let (Some(before), Some(after)) = (compute_stats(&run.samples), compute_stats(&run.remapped)) {
        print!("{}", crate::report::format_sample_stats("test", &before));
        print!("{}", crate::report::format_sample_stats("remapped", &after));
    }

    if let Some(path) = &args.export {
        crate::io::export::write_samples_csv(path, &run.samples, &run.remapped)?;
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let doc = crate::io::curve::read_curve_json(&args.curve)?;
    println!("{}", crate::report::format_curve_file(&doc));
    Ok(())
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = pipeline::DemoConfig {
        points: args.points,
        loc: args.loc,
        scale: args.scale,
        draws: args.draws,
        seed: args.seed,
    };
    let run = pipeline::run_demo(&config)?;

    println!("=== invpit demo: N(0, 1) fiducial vs N({}, {}) test ===\n", args.loc, args.scale);
    for (label, fitter) in [("from PDF", &run.from_pdf), ("from CDF", &run.from_cdf)] {
        if let Some(mapping) = fitter.mapping() {
            println!("{}", crate::report::format_fit_summary(label, mapping));
        }
    }
    println!("Max quantile gap (PDF vs CDF fit): {:.3e}\n", run.max_quantile_gap);

    println!("{}", crate::report::format_curve_summary(&run.pdf_curve));
    println!("{}", crate::report::format_curve_summary(&run.cdf_curve));

    if let Some((before, after)) = &run.draws {
        print!("{}", crate::report::format_sample_stats("test", before));
        print!("{}", crate::report::format_sample_stats("remapped", after));
    }
    Ok(())
}

pub fn fiducial_config_from_args(args: &FiducialArgs) -> FiducialConfig {
    FiducialConfig {
        path: args.fiducial.clone(),
        kind: args.fiducial_kind,
        normalization: args
            .normalize
            .unwrap_or_else(|| Normalization::default_for(args.fiducial_kind)),
        extrapolation: args.extrapolation,
    }
}

pub fn run_config_from_args(args: &TransformArgs) -> RunConfig {
    RunConfig {
        fiducial: fiducial_config_from_args(&args.fiducial),
        test_path: args.test.test.clone(),
        test_kind: args.test.test_kind,
        edge_order: args.edge_order,
        degenerate: args.degenerate,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
    }
}
