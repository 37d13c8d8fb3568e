//! Numerical derivative of tabulated data on a non-uniform grid.
//!
//! Interior points use the second-order central difference for uneven
//! spacing. With `h1 = x[i] - x[i-1]` and `h2 = x[i+1] - x[i]`:
//!
//! ```text
//! y'[i] ≈ -h2/(h1(h1+h2)) y[i-1] + (h2-h1)/(h1 h2) y[i] + h1/(h2(h1+h2)) y[i+1]
//! ```
//!
//! which collapses to `(y[i+1] - y[i-1]) / 2h` on a uniform grid. The two
//! boundary points use one-sided stencils of the requested order.

use crate::domain::EdgeOrder;
use crate::error::PitError;
use crate::math::validate::{ensure_finite, ensure_grid, ensure_same_len};

/// `dy/dx` at every grid point; same length as the input.
pub fn gradient(x: &[f64], y: &[f64], edge_order: EdgeOrder) -> Result<Vec<f64>, PitError> {
    ensure_grid("x", x)?;
    ensure_same_len("y", x.len(), y)?;
    ensure_finite("y", y)?;
    Ok(gradient_unchecked(x, y, edge_order))
}

/// Unchecked variant; `x` must be a validated grid and `y` the same length.
pub(crate) fn gradient_unchecked(x: &[f64], y: &[f64], edge_order: EdgeOrder) -> Vec<f64> {
    let n = x.len();
    let mut out = vec![0.0; n];

    for i in 1..n - 1 {
        let h1 = x[i] - x[i - 1];
        let h2 = x[i + 1] - x[i];
        let a = -h2 / (h1 * (h1 + h2));
        let b = (h2 - h1) / (h1 * h2);
        let c = h1 / (h2 * (h1 + h2));
        out[i] = a * y[i - 1] + b * y[i] + c * y[i + 1];
    }

    // Three-point edges need three points.
    let edge_order = if n < 3 { EdgeOrder::First } else { edge_order };
    match edge_order {
        EdgeOrder::First => {
            out[0] = (y[1] - y[0]) / (x[1] - x[0]);
            out[n - 1] = (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]);
        }
        EdgeOrder::Second => {
            let h1 = x[1] - x[0];
            let h2 = x[2] - x[1];
            let a = -(2.0 * h1 + h2) / (h1 * (h1 + h2));
            let b = (h1 + h2) / (h1 * h2);
            let c = -h1 / (h2 * (h1 + h2));
            out[0] = a * y[0] + b * y[1] + c * y[2];

            let h1 = x[n - 2] - x[n - 3];
            let h2 = x[n - 1] - x[n - 2];
            let a = h2 / (h1 * (h1 + h2));
            let b = -(h1 + h2) / (h1 * h2);
            let c = (2.0 * h2 + h1) / (h2 * (h1 + h2));
            out[n - 1] = a * y[n - 3] + b * y[n - 2] + c * y[n - 1];
        }
    }

    out
}
