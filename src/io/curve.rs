//! Read/write transformed-curve JSON files.
//!
//! Curve JSON is the "portable" representation of a transform result:
//! - the transformed grid and values (plus any zeroed indices)
//! - run metadata (input kinds, extrapolation policy, timestamp)
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{CurveFile, Extrapolation, SampleKind, TransformedCurve};
use crate::error::AppError;

/// Write a curve JSON file.
pub fn write_curve_json(
    path: &Path,
    curve: &TransformedCurve,
    fiducial_kind: SampleKind,
    extrapolation: Extrapolation,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    let doc = CurveFile {
        tool: "invpit".to_string(),
        generated: Utc::now(),
        fiducial_kind,
        test_kind: curve.kind,
        extrapolation,
        curve: curve.clone(),
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}
