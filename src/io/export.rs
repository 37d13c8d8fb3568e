//! Export transformed curves and remapped draws to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or plotting scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::TransformedCurve;
use crate::error::AppError;

/// Write `index,x_out,value,degenerate` rows.
pub fn write_curve_csv(path: &Path, curve: &TransformedCurve) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "index,x_out,{},degenerate", curve.kind.display_name().to_lowercase())
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (i, (x, v)) in curve.x.iter().zip(curve.values.iter()).enumerate() {
        let degenerate = curve.degenerate.binary_search(&i).is_ok();
        writeln!(file, "{i},{x:.12e},{v:.12e},{degenerate}")
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write `sample,remapped` rows.
pub fn write_samples_csv(path: &Path, samples: &[f64], remapped: &[f64]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "sample,remapped")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;
    for (s, r) in samples.iter().zip(remapped.iter()) {
        writeln!(file, "{s:.12e},{r:.12e}")
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
