//! Input checks shared by the numerical routines and the fit/transform stages.
//!
//! Every check names the array it rejects so a caller can tell a mis-shaped
//! grid from a malformed density.

use crate::error::{InputFault, PitError};

/// Relative tolerance used by the strict-increase checks.
///
/// Two consecutive values whose difference is at or below
/// `STRICT_EPS * max(1, |v[n-1] - v[0]|)` count as a tie.
pub const STRICT_EPS: f64 = 1e-12;

/// Absolute slack allowed outside `[0, 1]` for cumulative inputs.
pub const UNIT_RANGE_TOL: f64 = 1e-9;

/// Minimum number of points in a grid.
pub const MIN_GRID_LEN: usize = 2;

/// Tie tolerance for a monotone column.
pub fn tie_tolerance(values: &[f64]) -> f64 {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) => STRICT_EPS * (last - first).abs().max(1.0),
        _ => STRICT_EPS,
    }
}

pub fn ensure_finite(array: &'static str, values: &[f64]) -> Result<(), PitError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(PitError::invalid(array, InputFault::NonFinite { index })),
        None => Ok(()),
    }
}

pub fn ensure_same_len(array: &'static str, grid_len: usize, values: &[f64]) -> Result<(), PitError> {
    if values.len() != grid_len {
        return Err(PitError::invalid(
            array,
            InputFault::LengthMismatch {
                expected: grid_len,
                found: values.len(),
            },
        ));
    }
    Ok(())
}

/// Grids must be finite, have at least two points, and be strictly increasing.
pub fn ensure_grid(array: &'static str, x: &[f64]) -> Result<(), PitError> {
    if x.len() < MIN_GRID_LEN {
        return Err(PitError::invalid(
            array,
            InputFault::TooShort {
                len: x.len(),
                min: MIN_GRID_LEN,
            },
        ));
    }
    ensure_finite(array, x)?;
    if let Some(index) = first_tie_or_decrease(x) {
        return Err(PitError::invalid(array, InputFault::NotIncreasing { index }));
    }
    Ok(())
}

pub fn ensure_non_negative(array: &'static str, values: &[f64]) -> Result<(), PitError> {
    match values.iter().position(|&v| v < 0.0) {
        Some(index) => Err(PitError::invalid(
            array,
            InputFault::Negative {
                index,
                value: values[index],
            },
        )),
        None => Ok(()),
    }
}

/// Rejects any decrease larger than the tie tolerance. Ties are allowed.
pub fn ensure_non_decreasing(array: &'static str, values: &[f64]) -> Result<(), PitError> {
    let tol = tie_tolerance(values);
    match values.windows(2).position(|w| w[0] - w[1] > tol) {
        Some(i) => Err(PitError::NonMonotonic { array, index: i + 1 }),
        None => Ok(()),
    }
}

/// Rejects ties as well as decreases.
pub fn ensure_strictly_increasing(array: &'static str, values: &[f64]) -> Result<(), PitError> {
    match first_tie_or_decrease(values) {
        Some(index) => Err(PitError::NonMonotonic { array, index }),
        None => Ok(()),
    }
}

pub fn ensure_unit_range(array: &'static str, values: &[f64]) -> Result<(), PitError> {
    let outside = |v: f64| v < -UNIT_RANGE_TOL || v > 1.0 + UNIT_RANGE_TOL;
    match values.iter().position(|&v| outside(v)) {
        Some(index) => Err(PitError::invalid(
            array,
            InputFault::OutOfRange {
                index,
                value: values[index],
            },
        )),
        None => Ok(()),
    }
}

/// Index of the first element that does not exceed its predecessor by more
/// than the tie tolerance.
fn first_tie_or_decrease(values: &[f64]) -> Option<usize> {
    let tol = tie_tolerance(values);
    values.windows(2).position(|w| w[1] - w[0] <= tol).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_checks_report_the_failing_index() {
        assert!(ensure_grid("x", &[0.0, 1.0, 2.0]).is_ok());

        let err = ensure_grid("x", &[0.0, 1.0, 1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            PitError::invalid("x", InputFault::NotIncreasing { index: 2 })
        );

        let err = ensure_grid("x", &[0.0]).unwrap_err();
        assert_eq!(
            err,
            PitError::invalid("x", InputFault::TooShort { len: 1, min: 2 })
        );

        let err = ensure_grid("x", &[0.0, f64::NAN]).unwrap_err();
        assert_eq!(err, PitError::invalid("x", InputFault::NonFinite { index: 1 }));
    }

    #[test]
    fn non_decreasing_allows_ties_but_strict_does_not() {
        let flat = [0.0, 0.5, 0.5, 1.0];
        assert!(ensure_non_decreasing("cdf", &flat).is_ok());
        assert_eq!(
            ensure_strictly_increasing("cdf", &flat).unwrap_err(),
            PitError::NonMonotonic { array: "cdf", index: 2 }
        );
    }

    #[test]
    fn floating_noise_counts_as_a_tie() {
        let noisy = [0.0, 0.5, 0.5 + 1e-15, 1.0];
        assert!(ensure_strictly_increasing("cdf", &noisy).is_err());

        let dipping = [0.0, 0.5, 0.5 - 1e-15, 1.0];
        assert!(ensure_non_decreasing("cdf", &dipping).is_ok());
    }

    #[test]
    fn unit_range_has_small_slack() {
        assert!(ensure_unit_range("cdf", &[-1e-12, 0.5, 1.0 + 1e-12]).is_ok());
        assert_eq!(
            ensure_unit_range("cdf", &[0.0, 1.5]).unwrap_err(),
            PitError::invalid("cdf", InputFault::OutOfRange { index: 1, value: 1.5 })
        );
    }
}
