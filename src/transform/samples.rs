//! Remapping individual draws.
//!
//! A draw `s` from the test distribution becomes `Q_fid(F_test(s))`, where the
//! test CDF is the tabulated one, linearly interpolated and clamped at the
//! ends of the test grid. Draws are independent, so the work is spread over
//! rayon's pool; output order matches input order.

use rayon::prelude::*;
use tracing::debug;

use crate::domain::Extrapolation;
use crate::error::PitError;
use crate::math::interp::interp_unchecked;
use crate::math::validate::ensure_finite;
use crate::transform::applicator::{Transformer, ensure_test_cdf};

impl Transformer<'_> {
    /// Map test-distribution draws onto the fiducial scale.
    pub fn remap_samples(&self, x_test: &[f64], cdf_test: &[f64], samples: &[f64]) -> Result<Vec<f64>, PitError> {
        ensure_test_cdf(x_test, cdf_test)?;
        ensure_finite("samples", samples)?;

        let mapping = self.mapping();
        let out: Vec<f64> = samples
            .par_iter()
            .map(|&s| {
                let p = interp_unchecked(x_test, cdf_test, s, Extrapolation::Clamp);
                mapping.quantile_unchecked(p)
            })
            .collect();

        debug!(samples = samples.len(), "remapped draws");
        Ok(out)
    }
}
