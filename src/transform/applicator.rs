//! Applying a fitted mapping to a test distribution.
//!
//! The inverse probability integral transform re-expresses a test
//! distribution on the fiducial scale:
//!
//! ```text
//! x_out = Q_fid(F_test(x_test))
//! ```
//!
//! - For a CDF the values are unchanged; only the axis moves.
//! - For a PDF the density picks up the change-of-variables factor
//!   `pdf_out = pdf_test / |d(x_out)/d(x_test)|`, with the Jacobian estimated
//!   by finite differences on the paired arrays.
//!
//! The output grid is the image of the test grid, so it is non-uniform and
//! repeats values wherever the quantile map is flat. Flat stretches have no
//! finite density; `DegeneratePolicy` decides whether they fail the call or
//! are zeroed. Under `Extrapolation::Clamp`, test probabilities beyond the
//! fitted table land on a single boundary point and are treated the same way.

use tracing::{debug, warn};

use crate::domain::{DegeneratePolicy, EdgeOrder, Extrapolation, SampleKind, TransformedCurve};
use crate::error::{InputFault, PitError};
use crate::fit::{FiducialFitter, FittedMapping};
use crate::math::gradient::gradient_unchecked;
use crate::math::integrate::cumulative_trapezoid;
use crate::math::validate::{
    ensure_finite, ensure_grid, ensure_non_decreasing, ensure_non_negative, ensure_same_len,
    ensure_unit_range,
};

/// A Jacobian at or below `JACOBIAN_RTOL * mean_slope` is treated as zero,
/// where `mean_slope` is the end-to-end slope of the map.
pub const JACOBIAN_RTOL: f64 = 1e-10;

/// Options for the density transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub edge_order: EdgeOrder,
    pub degenerate: DegeneratePolicy,
}

/// Borrows a fitted mapping for the duration of one or more transforms.
#[derive(Debug, Clone, Copy)]
pub struct Transformer<'a> {
    mapping: &'a FittedMapping,
    options: TransformOptions,
}

impl<'a> Transformer<'a> {
    /// `NotFitted` if the fitter has no mapping yet.
    pub fn new(fitter: &'a FiducialFitter) -> Result<Self, PitError> {
        Ok(Self::from_mapping(fitter.fitted()?))
    }

    pub fn from_mapping(mapping: &'a FittedMapping) -> Self {
        Self {
            mapping,
            options: TransformOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    pub fn mapping(&self) -> &'a FittedMapping {
        self.mapping
    }

    pub fn options(&self) -> TransformOptions {
        self.options
    }

    /// Map a test CDF onto the fiducial axis.
    ///
    /// Returns `(x_out, cdf_test)`: matching CDF values is what defines the
    /// transform, so only the coordinate changes.
    pub fn transform_cdf(&self, x_test: &[f64], cdf_test: &[f64]) -> Result<TransformedCurve, PitError> {
        ensure_test_cdf(x_test, cdf_test)?;

        let x_out = self.map_probabilities(cdf_test);
        debug!(points = x_test.len(), "transformed test CDF");

        Ok(TransformedCurve {
            kind: SampleKind::Cdf,
            x: x_out,
            values: cdf_test.to_vec(),
            degenerate: Vec::new(),
        })
    }

    /// Map a test PDF onto the fiducial axis.
    ///
    /// The test CDF is integrated and normalized to end at exactly 1 before
    /// mapping, since the density rule needs a proper CDF.
    pub fn transform_pdf(&self, x_test: &[f64], pdf_test: &[f64]) -> Result<TransformedCurve, PitError> {
        let cdf_test = cdf_from_pdf(x_test, pdf_test)?;
        let x_out = self.map_probabilities(&cdf_test);
        let jacobian = gradient_unchecked(x_test, &x_out, self.options.edge_order);

        let n = x_test.len();
        let mean_slope = (x_out[n - 1] - x_out[0]) / (x_test[n - 1] - x_test[0]);
        let threshold = JACOBIAN_RTOL * mean_slope.abs();

        let clamps = self.mapping.extrapolation() == Extrapolation::Clamp;

        let mut values = Vec::with_capacity(n);
        let mut degenerate = Vec::new();
        for i in 0..n {
            let density = pdf_test[i];
            // No mass, nothing to stretch.
            if density == 0.0 {
                values.push(0.0);
                continue;
            }

            // Mass beyond a clamped table collapses onto the boundary point.
            let collapsed = clamps && self.mapping.is_outside(cdf_test[i]);
            let jac = jacobian[i];
            let value = density / jac.abs();
            if !collapsed && jac.abs() > threshold && value.is_finite() {
                values.push(value);
                continue;
            }

            match self.options.degenerate {
                DegeneratePolicy::Fail => {
                    return Err(PitError::DegenerateDerivative { index: i, jacobian: jac });
                }
                DegeneratePolicy::Zero => {
                    degenerate.push(i);
                    values.push(0.0);
                }
            }
        }

        if !degenerate.is_empty() {
            warn!(
                count = degenerate.len(),
                first = degenerate[0],
                "zeroed transformed density where d(x_out)/d(x_test) vanishes"
            );
        }
        debug!(points = n, mean_slope, "transformed test PDF");

        Ok(TransformedCurve {
            kind: SampleKind::Pdf,
            x: x_out,
            values,
            degenerate,
        })
    }

    /// Transform either kind of sampled test distribution.
    pub fn transform(&self, kind: SampleKind, x_test: &[f64], values: &[f64]) -> Result<TransformedCurve, PitError> {
        match kind {
            SampleKind::Pdf => self.transform_pdf(x_test, values),
            SampleKind::Cdf => self.transform_cdf(x_test, values),
        }
    }

    pub(crate) fn map_probabilities(&self, ps: &[f64]) -> Vec<f64> {
        let outside = ps.iter().filter(|&&p| self.mapping.is_outside(p)).count();
        if outside > 0 {
            let (lo, hi) = self.mapping.probability_range();
            debug!(
                outside,
                table_min = lo,
                table_max = hi,
                extrapolation = ?self.mapping.extrapolation(),
                "test probabilities fall outside the fitted table"
            );
        }
        ps.iter().map(|&p| self.mapping.quantile_unchecked(p)).collect()
    }
}

impl FiducialFitter {
    /// Shorthand for `Transformer::new(self)?.transform_cdf(..)` with default options.
    pub fn transform_cdf(&self, x_test: &[f64], cdf_test: &[f64]) -> Result<TransformedCurve, PitError> {
        Transformer::new(self)?.transform_cdf(x_test, cdf_test)
    }

    /// Shorthand for `Transformer::new(self)?.transform_pdf(..)` with default options.
    pub fn transform_pdf(&self, x_test: &[f64], pdf_test: &[f64]) -> Result<TransformedCurve, PitError> {
        Transformer::new(self)?.transform_pdf(x_test, pdf_test)
    }
}

/// Normalized cumulative integral of a test density.
pub fn cdf_from_pdf(x_test: &[f64], pdf_test: &[f64]) -> Result<Vec<f64>, PitError> {
    ensure_grid("x_test", x_test)?;
    ensure_same_len("pdf_test", x_test.len(), pdf_test)?;
    ensure_finite("pdf_test", pdf_test)?;
    ensure_non_negative("pdf_test", pdf_test)?;

    let mut cdf = cumulative_trapezoid(x_test, pdf_test);
    let total = cdf[cdf.len() - 1];
    if !(total > 0.0) {
        return Err(PitError::invalid("pdf_test", InputFault::ZeroMass { total }));
    }
    cdf.iter_mut().for_each(|v| *v /= total);
    Ok(cdf)
}

pub(crate) fn ensure_test_cdf(x_test: &[f64], cdf_test: &[f64]) -> Result<(), PitError> {
    ensure_grid("x_test", x_test)?;
    ensure_same_len("cdf_test", x_test.len(), cdf_test)?;
    ensure_finite("cdf_test", cdf_test)?;
    ensure_unit_range("cdf_test", cdf_test)?;
    ensure_non_decreasing("cdf_test", cdf_test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Normal, Reference};
    use crate::domain::Normalization;
    use crate::fit::FitOptions;
    use crate::math::{linspace, trapezoid};

    fn normal_tables(x: &[f64], loc: f64, scale: f64) -> (Vec<f64>, Vec<f64>) {
        let dist = Normal::new(loc, scale).unwrap();
        (dist.pdf_on(x), dist.cdf_on(x))
    }

    #[test]
    fn transform_before_fit_is_not_fitted() {
        let fitter = FiducialFitter::new();
        let x = [0.0, 1.0, 2.0];
        assert_eq!(fitter.transform_cdf(&x, &[0.0, 0.5, 1.0]).unwrap_err(), PitError::NotFitted);
        assert_eq!(fitter.transform_pdf(&x, &[1.0, 1.0, 1.0]).unwrap_err(), PitError::NotFitted);
        assert!(Transformer::new(&fitter).is_err());
    }

    #[test]
    fn transform_cdf_of_the_fiducial_is_the_identity() {
        let x = linspace(-4.0, 4.0, 1000).unwrap();
        let (_, cdf) = normal_tables(&x, 0.0, 1.0);
        let mut fitter = FiducialFitter::new();
        fitter.fit_from_cdf(&x, &cdf).unwrap();

        let curve = fitter.transform_cdf(&x, &cdf).unwrap();
        assert_eq!(curve.values, cdf);
        for (a, b) in curve.x.iter().zip(x.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn shifted_normal_maps_onto_the_standard_normal() {
        let x = linspace(-4.0, 4.0, 1000).unwrap();
        let (fid_pdf, _) = normal_tables(&x, 0.0, 1.0);
        let (test_pdf, test_cdf) = normal_tables(&x, 0.5, 0.5);

        let mut fitter = FiducialFitter::new();
        fitter.fit_from_pdf(&x, &fid_pdf).unwrap();

        let curve = fitter.transform_pdf(&x, &test_pdf).unwrap();
        assert_eq!(curve.len(), x.len());
        assert!(curve.values.iter().all(|v| v.is_finite() && *v >= 0.0));

        let mass = trapezoid(&curve.x, &curve.values).unwrap();
        assert!((mass - 1.0).abs() < 1e-2, "mass = {mass}");

        let peak = curve
            .values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| curve.x[i])
            .unwrap();
        let median = fitter.quantile(0.5).unwrap();
        assert!((peak - median).abs() < 0.05, "peak {peak} vs median {median}");

        // Away from the tails the map is x -> 2x - 1.
        let cdf_curve = fitter.transform_cdf(&x, &test_cdf).unwrap();
        for (xt, xo) in x.iter().zip(cdf_curve.x.iter()) {
            if (-1.0..=1.5).contains(xt) {
                assert!((xo - (2.0 * xt - 1.0)).abs() < 1e-2, "x={xt}: {xo}");
            }
        }
    }

    #[test]
    fn identical_distributions_are_left_unchanged() {
        let x = linspace(-4.0, 4.0, 1000).unwrap();
        let (pdf, _) = normal_tables(&x, 0.0, 1.0);

        let mut fitter = FiducialFitter::with_options(FitOptions {
            normalization: Normalization::Total,
            ..FitOptions::default()
        });
        fitter.fit_from_pdf(&x, &pdf).unwrap();

        let curve = fitter.transform_pdf(&x, &pdf).unwrap();
        assert!(curve.degenerate.is_empty());
        for i in 0..x.len() {
            assert!((curve.x[i] - x[i]).abs() < 1e-9);
            assert!((curve.values[i] - pdf[i]).abs() < 1e-6, "i={i}");
        }
    }

    #[test]
    fn unnormalized_fiducial_collapses_the_upper_tail_of_an_identical_test() {
        // The integrated fiducial ends just short of 1 while the test CDF is
        // normalized to end at exactly 1, so the top of the test mass clamps.
        let x = linspace(-4.0, 4.0, 1000).unwrap();
        let (pdf, _) = normal_tables(&x, 0.0, 1.0);

        let mut fitter = FiducialFitter::new();
        fitter.fit_from_pdf(&x, &pdf).unwrap();
        let (_, top) = fitter.mapping().unwrap().probability_range();
        assert!(top < 1.0);

        let curve = fitter.transform_pdf(&x, &pdf).unwrap();
        assert!(!curve.degenerate.is_empty());
        for &i in &curve.degenerate {
            assert!(x[i] > 3.5, "zeroed at x={}", x[i]);
            assert_eq!(curve.x[i], 4.0);
            assert_eq!(curve.values[i], 0.0);
        }
        for i in 0..x.len() {
            if x[i].abs() <= 2.0 {
                assert!((curve.x[i] - x[i]).abs() < 5e-3, "i={i}");
                assert!((curve.values[i] - pdf[i]).abs() < 1e-3, "i={i}");
            }
        }
    }

    #[test]
    fn identical_uniforms_are_unchanged_without_normalization() {
        let x = linspace(0.0, 2.0, 41).unwrap();
        let pdf = vec![0.5; x.len()];

        let mut fitter = FiducialFitter::new();
        fitter.fit_from_pdf(&x, &pdf).unwrap();

        let (x_out, pdf_out) = fitter.transform_pdf(&x, &pdf).unwrap().into_parts();
        for i in 0..x.len() {
            assert!((x_out[i] - x[i]).abs() < 1e-12);
            assert!((pdf_out[i] - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn flat_quantile_map_is_a_declared_fault_or_zeroed() {
        // The table tops out at 0.5, so the upper half of the test mass clamps.
        let mut fitter = FiducialFitter::new();
        fitter.fit_from_cdf(&[0.0, 1.0, 2.0], &[0.0, 0.25, 0.5]).unwrap();
        let x_test = linspace(0.0, 1.0, 5).unwrap();
        let pdf_test = vec![1.0; 5];

        let strict = Transformer::new(&fitter).unwrap().with_options(TransformOptions {
            degenerate: DegeneratePolicy::Fail,
            ..TransformOptions::default()
        });
        assert_eq!(
            strict.transform_pdf(&x_test, &pdf_test).unwrap_err(),
            PitError::DegenerateDerivative { index: 3, jacobian: 0.0 }
        );

        let curve = fitter.transform_pdf(&x_test, &pdf_test).unwrap();
        assert_eq!(curve.x, vec![0.0, 1.0, 2.0, 2.0, 2.0]);
        assert_eq!(curve.degenerate, vec![3, 4]);
        let want = [0.25, 0.25, 0.5, 0.0, 0.0];
        for (got, want) in curve.values.iter().zip(want.iter()) {
            assert!((got - want).abs() < 1e-12, "{got} vs {want}");
        }
    }

    #[test]
    fn zero_density_points_stay_zero() {
        let mut fitter = FiducialFitter::new();
        fitter.fit_from_cdf(&[0.0, 1.0], &[0.0, 1.0]).unwrap();

        // Mass only on [0.5, 1]: the lower half maps to a flat x_out = 0.
        let x_test = [0.0, 0.25, 0.5, 0.75, 1.0];
        let pdf_test = [0.0, 0.0, 0.0, 2.0, 2.0];
        let curve = Transformer::new(&fitter)
            .unwrap()
            .with_options(TransformOptions {
                degenerate: DegeneratePolicy::Fail,
                edge_order: EdgeOrder::First,
            })
            .transform_pdf(&x_test, &pdf_test)
            .unwrap();
        assert_eq!(&curve.values[..3], &[0.0, 0.0, 0.0]);
        assert!(curve.values[3] > 0.0 && curve.values[4] > 0.0);
    }

    #[test]
    fn transform_inputs_are_validated() {
        let mut fitter = FiducialFitter::new();
        fitter.fit_from_cdf(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        let x = [0.0, 1.0, 2.0];

        assert_eq!(
            fitter.transform_cdf(&x, &[0.0, 1.0]).unwrap_err(),
            PitError::invalid("cdf_test", InputFault::LengthMismatch { expected: 3, found: 2 })
        );
        assert_eq!(
            fitter.transform_cdf(&x, &[0.0, 0.5, 1.7]).unwrap_err(),
            PitError::invalid("cdf_test", InputFault::OutOfRange { index: 2, value: 1.7 })
        );
        assert_eq!(
            fitter.transform_cdf(&x, &[0.0, 0.6, 0.4]).unwrap_err(),
            PitError::NonMonotonic { array: "cdf_test", index: 2 }
        );
        assert_eq!(
            fitter.transform_pdf(&x, &[0.0, 0.0, 0.0]).unwrap_err(),
            PitError::invalid("pdf_test", InputFault::ZeroMass { total: 0.0 })
        );
        assert_eq!(
            fitter.transform_pdf(&x, &[0.0, f64::INFINITY, 0.0]).unwrap_err(),
            PitError::invalid("pdf_test", InputFault::NonFinite { index: 1 })
        );
    }
}
