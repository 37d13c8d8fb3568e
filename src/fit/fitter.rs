//! Fiducial fitting: turning a sampled PDF or CDF into an invertible table.
//!
//! Given:
//! - a strictly increasing grid `x`
//! - the fiducial distribution sampled on it, as densities or cumulatives
//!
//! we build a `FittedMapping`: a `(cdf, x)` table whose CDF column is strictly
//! increasing, so the piecewise linear quantile function `Q(p)` is well defined.
//!
//! A fitter owns at most one mapping. Fitting replaces it wholesale and a
//! failed fit leaves the previous mapping in place. Quantile queries take
//! `&self`, so a fitted fitter can be shared across threads freely.

use tracing::debug;

use crate::domain::{Extrapolation, Normalization};
use crate::error::{InputFault, PitError};
use crate::math::integrate::cumulative_trapezoid;
use crate::math::interp::{ensure_query, interp_unchecked};
use crate::math::validate::{
    ensure_finite, ensure_grid, ensure_non_decreasing, ensure_non_negative, ensure_same_len,
    ensure_strictly_increasing,
};

/// How close to 1 a table must end for `Normalization::IfNeeded` to leave it alone.
const NORMALIZATION_TOL: f64 = 1e-8;

/// Options that affect how the fiducial table is built and queried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitOptions {
    pub normalization: Normalization,
    /// Policy for probabilities outside `[F[0], F[n-1]]`.
    pub extrapolation: Extrapolation,
}

/// The fitted `(cdf, x)` table. Immutable once built.
///
/// Only a successful fit constructs one, so the table always has at least
/// two points and a strictly increasing CDF column.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedMapping {
    cdf: Vec<f64>,
    x: Vec<f64>,
    extrapolation: Extrapolation,
}

impl FittedMapping {
    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// `(x[0], x[n-1])`.
    pub fn support(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// `(F[0], F[n-1])`.
    pub fn probability_range(&self) -> (f64, f64) {
        (self.cdf[0], self.cdf[self.cdf.len() - 1])
    }

    /// Quantile at `p`.
    pub fn quantile(&self, p: f64) -> Result<f64, PitError> {
        ensure_query("p", p, 0)?;
        Ok(self.quantile_unchecked(p))
    }

    /// Elementwise quantile.
    pub fn quantile_many(&self, ps: &[f64]) -> Result<Vec<f64>, PitError> {
        ensure_finite("p", ps)?;
        Ok(ps.iter().map(|&p| self.quantile_unchecked(p)).collect())
    }

    /// Whether `p` lies outside the table and is therefore extrapolated.
    pub fn is_outside(&self, p: f64) -> bool {
        let (lo, hi) = self.probability_range();
        p < lo || p > hi
    }

    pub(crate) fn quantile_unchecked(&self, p: f64) -> f64 {
        interp_unchecked(&self.cdf, &self.x, p, self.extrapolation)
    }
}

/// Builds and holds the fiducial quantile mapping.
#[derive(Debug, Clone, Default)]
pub struct FiducialFitter {
    options: FitOptions,
    mapping: Option<FittedMapping>,
}

impl FiducialFitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FitOptions) -> Self {
        Self {
            options,
            mapping: None,
        }
    }

    pub fn options(&self) -> FitOptions {
        self.options
    }

    pub fn is_fitted(&self) -> bool {
        self.mapping.is_some()
    }

    pub fn mapping(&self) -> Option<&FittedMapping> {
        self.mapping.as_ref()
    }

    /// The fitted mapping, or `NotFitted`.
    pub fn fitted(&self) -> Result<&FittedMapping, PitError> {
        self.mapping.as_ref().ok_or(PitError::NotFitted)
    }

    /// Fit from a density sampled on `x`.
    ///
    /// The CDF column is the cumulative trapezoidal integral of `pdf`. Zero
    /// density over a whole segment produces a tie, which is rejected as
    /// `NonMonotonic`.
    pub fn fit_from_pdf(&mut self, x: &[f64], pdf: &[f64]) -> Result<(), PitError> {
        ensure_grid("x", x)?;
        ensure_same_len("pdf", x.len(), pdf)?;
        ensure_finite("pdf", pdf)?;
        ensure_non_negative("pdf", pdf)?;

        let cdf = cumulative_trapezoid(x, pdf);
        self.install("pdf", x, cdf)
    }

    /// Fit from cumulative values sampled on `x`; the values are used as given.
    pub fn fit_from_cdf(&mut self, x: &[f64], cdf: &[f64]) -> Result<(), PitError> {
        ensure_grid("x", x)?;
        ensure_same_len("cdf", x.len(), cdf)?;
        ensure_finite("cdf", cdf)?;
        // Report a genuine decrease before a mere tie.
        ensure_non_decreasing("cdf", cdf)?;

        self.install("cdf", x, cdf.to_vec())
    }

    /// Quantile at `p`; `NotFitted` before any fit.
    pub fn quantile(&self, p: f64) -> Result<f64, PitError> {
        self.fitted()?.quantile(p)
    }

    /// Elementwise quantile; `NotFitted` before any fit.
    pub fn quantile_many(&self, ps: &[f64]) -> Result<Vec<f64>, PitError> {
        self.fitted()?.quantile_many(ps)
    }

    fn install(&mut self, source: &'static str, x: &[f64], mut cdf: Vec<f64>) -> Result<(), PitError> {
        let total = cdf[cdf.len() - 1];
        let rescale = match self.options.normalization {
            Normalization::None => false,
            Normalization::Total => true,
            Normalization::IfNeeded => (total - 1.0).abs() > NORMALIZATION_TOL,
        };
        if rescale {
            if !(total > 0.0) {
                return Err(PitError::invalid(source, InputFault::ZeroMass { total }));
            }
            cdf.iter_mut().for_each(|v| *v /= total);
        }

        ensure_strictly_increasing(source, &cdf)?;

        debug!(
            source,
            points = x.len(),
            cdf_first = cdf[0],
            cdf_last = cdf[cdf.len() - 1],
            rescaled = rescale,
            "fitted fiducial mapping"
        );

        self.mapping = Some(FittedMapping {
            cdf,
            x: x.to_vec(),
            extrapolation: self.options.extrapolation,
        });
        Ok(())
    }
}
