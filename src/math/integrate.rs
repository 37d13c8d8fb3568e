//! Trapezoidal integration on a sampled grid.
//!
//! The cumulative integral is the bridge from a density table to a CDF table:
//!
//! ```text
//! F[0] = 0
//! F[i] = F[i-1] + (f[i] + f[i-1]) * (x[i] - x[i-1]) / 2
//! ```
//!
//! The result is never normalized here. Densities sampled on a truncated
//! support integrate to less than one and callers decide whether that matters.

use crate::error::PitError;
use crate::math::validate::{ensure_finite, ensure_grid, ensure_same_len};

/// Running trapezoidal integral of `f` over `x`, starting at 0.
pub fn cumulative_integral(x: &[f64], f: &[f64]) -> Result<Vec<f64>, PitError> {
    ensure_grid("x", x)?;
    ensure_same_len("f", x.len(), f)?;
    ensure_finite("f", f)?;
    Ok(cumulative_trapezoid(x, f))
}

/// Total trapezoidal integral of `f` over `x`.
pub fn trapezoid(x: &[f64], f: &[f64]) -> Result<f64, PitError> {
    ensure_same_len("f", x.len(), f)?;
    ensure_finite("x", x)?;
    ensure_finite("f", f)?;
    Ok(trapezoid_sum(x, f))
}

/// Unchecked running integral; inputs must already be validated.
pub(crate) fn cumulative_trapezoid(x: &[f64], f: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(x.len());
    let mut acc = 0.0;
    out.push(acc);
    for i in 1..x.len() {
        acc += 0.5 * (f[i] + f[i - 1]) * (x[i] - x[i - 1]);
        out.push(acc);
    }
    out
}

// `x` may repeat values (a transformed grid is flat where the quantile map
// clamps); those segments simply contribute nothing.
pub(crate) fn trapezoid_sum(x: &[f64], f: &[f64]) -> f64 {
    x.windows(2)
        .zip(f.windows(2))
        .map(|(xs, fs)| 0.5 * (fs[0] + fs[1]) * (xs[1] - xs[0]))
        .sum()
}
