//! Piecewise linear interpolation and CDF inversion.
//!
//! The quantile function of a tabulated CDF is the same piecewise linear
//! interpolant with the columns swapped: given strictly increasing `F` paired
//! with `x`, `Q(p)` interpolates `x` against `F`.
//!
//! Lookups are `O(log n)` via binary search. Queries outside the table follow
//! an explicit `Extrapolation` policy:
//!
//! - `Clamp`: return the boundary value
//! - `Linear`: extend the boundary segment

use crate::domain::Extrapolation;
use crate::error::{InputFault, PitError};
use crate::math::validate::{ensure_finite, ensure_grid, ensure_same_len, ensure_strictly_increasing};

/// Interpolate `fp` (sampled at strictly increasing `xp`) at `q`.
pub fn interpolate(xp: &[f64], fp: &[f64], q: f64, extrapolation: Extrapolation) -> Result<f64, PitError> {
    ensure_grid("xp", xp)?;
    ensure_same_len("fp", xp.len(), fp)?;
    ensure_finite("fp", fp)?;
    ensure_query("q", q, 0)?;
    Ok(interp_unchecked(xp, fp, q, extrapolation))
}

/// Quantile lookup: the `x` at which the piecewise linear CDF reaches `p`.
///
/// `cdf` must be strictly increasing; ties are a fault, not something this
/// routine tries to repair.
pub fn invert(cdf: &[f64], x: &[f64], p: f64, extrapolation: Extrapolation) -> Result<f64, PitError> {
    ensure_table(cdf, x)?;
    ensure_query("p", p, 0)?;
    Ok(interp_unchecked(cdf, x, p, extrapolation))
}

/// Elementwise `invert` over many probabilities.
pub fn invert_many(
    cdf: &[f64],
    x: &[f64],
    ps: &[f64],
    extrapolation: Extrapolation,
) -> Result<Vec<f64>, PitError> {
    ensure_table(cdf, x)?;
    ensure_finite("p", ps)?;
    Ok(ps
        .iter()
        .map(|&p| interp_unchecked(cdf, x, p, extrapolation))
        .collect())
}

fn ensure_table(cdf: &[f64], x: &[f64]) -> Result<(), PitError> {
    ensure_grid("x", x)?;
    ensure_same_len("cdf", x.len(), cdf)?;
    ensure_finite("cdf", cdf)?;
    ensure_strictly_increasing("cdf", cdf)
}

pub(crate) fn ensure_query(array: &'static str, q: f64, index: usize) -> Result<(), PitError> {
    if !q.is_finite() {
        return Err(PitError::invalid(array, InputFault::NonFinite { index }));
    }
    Ok(())
}

/// Unchecked interpolation; `xp` must be strictly increasing with `len >= 2`
/// and `fp` the same length.
pub(crate) fn interp_unchecked(xp: &[f64], fp: &[f64], q: f64, extrapolation: Extrapolation) -> f64 {
    let n = xp.len();
    let last = n - 1;

    if q <= xp[0] {
        return match extrapolation {
            Extrapolation::Clamp => fp[0],
            Extrapolation::Linear => lerp(xp, fp, 0, q),
        };
    }
    if q >= xp[last] {
        return match extrapolation {
            Extrapolation::Clamp => fp[last],
            Extrapolation::Linear => lerp(xp, fp, last - 1, q),
        };
    }

    // First index with xp[j] > q; the bracket is [j-1, j].
    let j = xp.partition_point(|&v| v <= q);
    lerp(xp, fp, j - 1, q)
}

/// Evaluate the line through segment `[i, i+1]` at `q`.
fn lerp(xp: &[f64], fp: &[f64], i: usize, q: f64) -> f64 {
    let t = (q - xp[i]) / (xp[i + 1] - xp[i]);
    fp[i] + t * (fp[i + 1] - fp[i])
}
