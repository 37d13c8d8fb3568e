//! Shared pipeline logic used by the CLI handlers.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load tables -> fit fiducial -> transform / remap
//!
//! The handlers in `app` then only deal with presentation and exports.

use std::path::Path;

use tracing::info;

use crate::data::{Normal, Reference, SampleStats, compute_stats, draw_normal};
use crate::domain::{FiducialConfig, Normalization, RunConfig, SampleKind, SampledDistribution, TransformedCurve};
use crate::error::AppError;
use crate::fit::{FiducialFitter, FitOptions};
use crate::io::ingest::{load_distribution, load_samples};
use crate::math::linspace;
use crate::transform::{TransformOptions, Transformer, cdf_from_pdf};

/// Outputs of `invpit transform`.
#[derive(Debug, Clone)]
pub struct TransformRun {
    pub fitter: FiducialFitter,
    pub test: SampledDistribution,
    pub curve: TransformedCurve,
}

/// Outputs of `invpit remap`.
#[derive(Debug, Clone)]
pub struct RemapRun {
    pub fitter: FiducialFitter,
    pub samples: Vec<f64>,
    pub remapped: Vec<f64>,
}

/// Parameters of `invpit demo`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoConfig {
    pub points: usize,
    pub loc: f64,
    pub scale: f64,
    pub draws: usize,
    pub seed: u64,
}

/// Outputs of `invpit demo`.
#[derive(Debug, Clone)]
pub struct DemoRun {
    pub from_pdf: FiducialFitter,
    pub from_cdf: FiducialFitter,
    /// Largest |Q_pdf(p) - Q_cdf(p)| over p in [0.01, 0.99].
    pub max_quantile_gap: f64,
    pub pdf_curve: TransformedCurve,
    pub cdf_curve: TransformedCurve,
    /// Draw moments before and after remapping.
    pub draws: Option<(SampleStats, SampleStats)>,
}

/// Fit a fiducial table with the given options.
pub fn fit_table(dist: &SampledDistribution, options: FitOptions) -> Result<FiducialFitter, AppError> {
    let mut fitter = FiducialFitter::with_options(options);
    match dist.kind {
        SampleKind::Pdf => fitter.fit_from_pdf(&dist.x, &dist.values)?,
        SampleKind::Cdf => fitter.fit_from_cdf(&dist.x, &dist.values)?,
    }
    Ok(fitter)
}

/// Load and fit the fiducial table named by `config`.
pub fn load_fiducial(config: &FiducialConfig) -> Result<FiducialFitter, AppError> {
    let dist = load_distribution(&config.path, config.kind)?;
    let options = FitOptions {
        normalization: config.normalization,
        extrapolation: config.extrapolation,
    };
    let fitter = fit_table(&dist, options)?;
    info!(path = %config.path.display(), points = dist.len(), kind = dist.kind.display_name(), "fitted fiducial");
    Ok(fitter)
}

/// Execute a table transform.
pub fn run_transform(config: &RunConfig) -> Result<TransformRun, AppError> {
    let fitter = load_fiducial(&config.fiducial)?;
    let test = load_distribution(&config.test_path, config.test_kind)?;

    let options = TransformOptions {
        edge_order: config.edge_order,
        degenerate: config.degenerate,
    };
    let curve = Transformer::new(&fitter)?
        .with_options(options)
        .transform(test.kind, &test.x, &test.values)?;

    Ok(TransformRun { fitter, test, curve })
}

/// Execute a draw remap.
///
/// A PDF test table is integrated (and normalized) to get the CDF the draws
/// are evaluated against.
pub fn run_remap(
    fiducial: &FiducialConfig,
    test_path: &Path,
    test_kind: SampleKind,
    samples_path: &Path,
) -> Result<RemapRun, AppError> {
    let fitter = load_fiducial(fiducial)?;
    let test = load_distribution(test_path, test_kind)?;
    let samples = load_samples(samples_path)?;

    let cdf_test = match test.kind {
        SampleKind::Pdf => cdf_from_pdf(&test.x, &test.values)?,
        SampleKind::Cdf => test.values.clone(),
    };
    let remapped = Transformer::new(&fitter)?.remap_samples(&test.x, &cdf_test, &samples)?;

    Ok(RemapRun {
        fitter,
        samples,
        remapped,
    })
}

/// Standard normal fiducial against `N(loc, scale²)`, fitted both from the
/// PDF and from the exact CDF.
///
/// Each fit uses the command-line normalization default for its kind, so the
/// truncated tails of the `[-4, 4]` grid do not clamp the transform.
pub fn run_demo(config: &DemoConfig) -> Result<DemoRun, AppError> {
    let x = linspace(-4.0, 4.0, config.points)?;
    let fiducial = Normal::standard();
    let test = Normal::new(config.loc, config.scale)?;

    let from_pdf = fit_table(&fiducial.sample_on(SampleKind::Pdf, &x), demo_options(SampleKind::Pdf))?;
    let from_cdf = fit_table(&fiducial.sample_on(SampleKind::Cdf, &x), demo_options(SampleKind::Cdf))?;

    let probs = linspace(0.01, 0.99, 99)?;
    let q_pdf = from_pdf.quantile_many(&probs)?;
    let q_cdf = from_cdf.quantile_many(&probs)?;
    let max_quantile_gap = q_pdf
        .iter()
        .zip(q_cdf.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);

    let test_cdf = test.cdf_on(&x);
    let pdf_curve = from_pdf.transform_pdf(&x, &test.pdf_on(&x))?;
    let cdf_curve = from_pdf.transform_cdf(&x, &test_cdf)?;

    let draws = if config.draws > 0 {
        let raw = draw_normal(config.loc, config.scale, config.draws, config.seed)?;
        let remapped = Transformer::new(&from_pdf)?.remap_samples(&x, &test_cdf, &raw)?;
        compute_stats(&raw).zip(compute_stats(&remapped))
    } else {
        None
    };

    Ok(DemoRun {
        from_pdf,
        from_cdf,
        max_quantile_gap,
        pdf_curve,
        cdf_curve,
        draws,
    })
}

fn demo_options(kind: SampleKind) -> FitOptions {
    FitOptions {
        normalization: Normalization::default_for(kind),
        ..FitOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DegeneratePolicy, EdgeOrder, Extrapolation};
    use std::io::Write;
    use std::path::PathBuf;

    fn write_table(name: &str, header: &str, x: &[f64], v: &[f64]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("invpit_pipeline_{}_{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{header}").unwrap();
        for (a, b) in x.iter().zip(v.iter()) {
            writeln!(file, "{a},{b}").unwrap();
        }
        path
    }

    #[test]
    fn demo_fits_agree_and_remap_matches_fiducial() {
        let run = run_demo(&DemoConfig {
            points: 1000,
            loc: 0.5,
            scale: 0.5,
            draws: 5000,
            seed: 3,
        })
        .unwrap();

        assert!(run.max_quantile_gap < 1e-2, "gap = {}", run.max_quantile_gap);
        assert_eq!(run.pdf_curve.len(), 1000);
        assert_eq!(run.cdf_curve.values.len(), 1000);

        let (raw, remapped) = run.draws.unwrap();
        assert!((raw.mean - 0.5).abs() < 0.05);
        assert!(remapped.mean.abs() < 0.06, "mean = {}", remapped.mean);
        assert!((remapped.std_dev - 1.0).abs() < 0.06, "std = {}", remapped.std_dev);
    }

    #[test]
    fn demo_with_identical_distributions_is_the_identity() {
        let run = run_demo(&DemoConfig {
            points: 1000,
            loc: 0.0,
            scale: 1.0,
            draws: 0,
            seed: 0,
        })
        .unwrap();
        assert!(run.draws.is_none());

        let x = linspace(-4.0, 4.0, 1000).unwrap();
        let pdf = Normal::standard().pdf_on(&x);
        assert!(run.pdf_curve.degenerate.is_empty(), "{:?}", run.pdf_curve.degenerate);
        for i in 0..x.len() {
            assert!((run.pdf_curve.x[i] - x[i]).abs() < 1e-9, "i={i}");
            assert!((run.pdf_curve.values[i] - pdf[i]).abs() < 1e-6, "i={i}");
        }
    }

    #[test]
    fn transform_run_reads_tables_from_disk() {
        let x = linspace(-4.0, 4.0, 401).unwrap();
        let n = Normal::standard();
        let fid = write_table("fid.csv", "x,cdf", &x, &n.cdf_on(&x));
        let test = write_table("test.csv", "x,pdf", &x, &n.pdf_on(&x));

        let config = RunConfig {
            fiducial: FiducialConfig {
                path: fid.clone(),
                kind: SampleKind::Cdf,
                normalization: Normalization::IfNeeded,
                extrapolation: Extrapolation::Clamp,
            },
            test_path: test.clone(),
            test_kind: SampleKind::Pdf,
            edge_order: EdgeOrder::Second,
            degenerate: DegeneratePolicy::Zero,
            export_csv: None,
            export_json: None,
        };
        let run = run_transform(&config).unwrap();
        assert!(run.fitter.is_fitted());
        assert_eq!(run.curve.kind, SampleKind::Pdf);
        assert_eq!(run.curve.len(), 401);
        // Same shape on both sides: the map is close to the identity away
        // from the tails, where the two tables are normalized differently.
        for (a, b) in run.curve.x.iter().zip(x.iter()).skip(100).take(201) {
            assert!((a - b).abs() < 2e-3, "{a} vs {b}");
        }

        std::fs::remove_file(fid).ok();
        std::fs::remove_file(test).ok();
    }

    #[test]
    fn numerical_faults_keep_their_exit_code() {
        let dist = SampledDistribution::new(SampleKind::Cdf, vec![0.0, 1.0, 2.0, 3.0], vec![0.1, 0.5, 0.3, 0.9]);
        let err = fit_table(&dist, FitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
