//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the fit and transform stages
//! - exported to JSON/CSV
//! - reloaded later for inspection or comparisons

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How a sampled distribution is expressed on its grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    /// Density values (non-negative).
    Pdf,
    /// Cumulative values (non-decreasing, nominally in [0, 1]).
    Cdf,
}

impl SampleKind {
    pub fn display_name(self) -> &'static str {
        match self {
            SampleKind::Pdf => "PDF",
            SampleKind::Cdf => "CDF",
        }
    }
}

/// What the quantile function returns for probabilities outside the fitted
/// table's `[F[0], F[n-1]]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Extrapolation {
    /// Clamp to the grid ends `[x[0], x[n-1]]`.
    #[default]
    Clamp,
    /// Extend the first/last table segment linearly.
    Linear,
}

/// Whether the fitted CDF table is rescaled so it ends at 1.
///
/// Densities sampled on a truncated support integrate to slightly less than
/// one. `None` keeps the table exactly as integrated/given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    #[default]
    None,
    /// Always divide by the final table value.
    Total,
    /// Divide by the final table value unless it is already within `1e-8` of 1.
    IfNeeded,
}

impl Normalization {
    /// What the command-line tool uses when `--normalize` is not given.
    ///
    /// An integrated density on a truncated grid always falls short of 1, so
    /// it is rescaled; cumulative tables are only touched when they need it.
    pub fn default_for(kind: SampleKind) -> Self {
        match kind {
            SampleKind::Pdf => Normalization::Total,
            SampleKind::Cdf => Normalization::IfNeeded,
        }
    }
}

/// Boundary stencil used by the numerical gradient.
///
/// Interior points always use second-order central differences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EdgeOrder {
    /// Two-point one-sided differences.
    First,
    /// Three-point one-sided differences (needs at least 3 points).
    #[default]
    Second,
}

/// What `transform_pdf` does where the Jacobian `d(x_out)/d(x_test)`
/// collapses to (near) zero.
///
/// This happens where the quantile map is flat: probabilities clamped at the
/// ends of the fitted table, or test CDF increments below floating-point
/// resolution in the far tails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Return `PitError::DegenerateDerivative` at the first degenerate point.
    Fail,
    /// Set the transformed density to zero there and record the index.
    #[default]
    Zero,
}

/// A distribution sampled on a grid, as loaded from disk or generated.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledDistribution {
    pub kind: SampleKind,
    pub x: Vec<f64>,
    pub values: Vec<f64>,
}

impl SampledDistribution {
    pub fn new(kind: SampleKind, x: Vec<f64>, values: Vec<f64>) -> Self {
        Self { kind, x, values }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Output of a transform: values aligned to the fiducial-space grid `x`.
///
/// The grid is the image of the test grid under the quantile map, so it is
/// generally non-uniform and may repeat values where the map is flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedCurve {
    pub kind: SampleKind,
    pub x: Vec<f64>,
    pub values: Vec<f64>,
    /// Indices whose density was zeroed under `DegeneratePolicy::Zero`.
    #[serde(default)]
    pub degenerate: Vec<usize>,
}

impl TransformedCurve {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Split into `(x_out, values)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.x, self.values)
    }
}

/// A saved transform result (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub fiducial_kind: SampleKind,
    pub test_kind: SampleKind,
    pub extrapolation: Extrapolation,
    pub curve: TransformedCurve,
}

/// Where the fiducial table comes from and how it is fitted.
#[derive(Debug, Clone)]
pub struct FiducialConfig {
    pub path: PathBuf,
    pub kind: SampleKind,
    pub normalization: Normalization,
    pub extrapolation: Extrapolation,
}

/// A full `transform` run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub fiducial: FiducialConfig,
    pub test_path: PathBuf,
    pub test_kind: SampleKind,

    pub edge_order: EdgeOrder,
    pub degenerate: DegeneratePolicy,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}
