//! Reference distributions for demos and tests.
//!
//! The transform itself only ever sees sampled `(x, value)` tables; these
//! types exist to produce such tables for the `demo` command and for tests
//! with a known answer. Densities and cumulatives come from `statrs`.

use statrs::distribution::{self as sd, Continuous, ContinuousCDF};

use crate::domain::{SampleKind, SampledDistribution};
use crate::error::AppError;

/// A distribution with a closed-form density and cumulative function.
pub trait Reference {
    fn pdf(&self, x: f64) -> f64;

    fn cdf(&self, x: f64) -> f64;

    fn pdf_on(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&v| self.pdf(v)).collect()
    }

    fn cdf_on(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&v| self.cdf(v)).collect()
    }

    /// Sample the density or cumulative function on `x`.
    fn sample_on(&self, kind: SampleKind, x: &[f64]) -> SampledDistribution {
        let values = match kind {
            SampleKind::Pdf => self.pdf_on(x),
            SampleKind::Cdf => self.cdf_on(x),
        };
        SampledDistribution::new(kind, x.to_vec(), values)
    }
}

/// Normal distribution `N(loc, scale²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal(sd::Normal);

impl Normal {
    pub fn new(loc: f64, scale: f64) -> Result<Self, AppError> {
        sd::Normal::new(loc, scale)
            .map(Self)
            .map_err(|e| AppError::new(2, format!("Invalid normal parameters (loc={loc}, scale={scale}): {e}")))
    }

    pub fn standard() -> Self {
        Self(sd::Normal::standard())
    }
}

impl Reference for Normal {
    fn pdf(&self, x: f64) -> f64 {
        self.0.pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.0.cdf(x)
    }
}

/// Uniform distribution on `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform(sd::Uniform);

impl Uniform {
    pub fn new(lo: f64, hi: f64) -> Result<Self, AppError> {
        sd::Uniform::new(lo, hi)
            .map(Self)
            .map_err(|e| AppError::new(2, format!("Invalid uniform bounds (lo={lo}, hi={hi}): {e}")))
    }
}

impl Reference for Uniform {
    fn pdf(&self, x: f64) -> f64 {
        self.0.pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.0.cdf(x)
    }
}
