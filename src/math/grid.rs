//! Grid construction.

use crate::error::AppError;

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn linspace(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(AppError::new(
            2,
            format!("Invalid grid range: min={min}, max={max} (must be finite and max>min)."),
        ));
    }
    if steps < 2 {
        return Err(AppError::new(2, "Grid must have >= 2 points."));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps - 1 {
        out.push(min + step * i as f64);
    }
    // Pin the endpoint instead of accumulating rounding into it.
    out.push(max);
    Ok(out)
}
