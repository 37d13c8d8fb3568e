//! CSV ingest for sampled distributions and raw draws.
//!
//! Table files have a header row and two numeric columns:
//!
//! - `x`: the grid
//! - `value` (or `pdf`, `cdf`, `density`, `cumulative`): the sampled values
//!
//! Unlike a list of independent observations, a grid with holes is not
//! meaningful, so any malformed row fails the whole load with its line number.
//! Shape and monotonicity checks are left to the fit/transform stages.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{SampleKind, SampledDistribution};
use crate::error::AppError;

const VALUE_COLUMNS: [&str; 5] = ["value", "pdf", "cdf", "density", "cumulative"];
const SAMPLE_COLUMNS: [&str; 3] = ["sample", "samples", "x"];

/// Load a sampled PDF or CDF table.
pub fn load_distribution(path: &Path, kind: SampleKind) -> Result<SampledDistribution, AppError> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader)?;
    let header_map = build_header_map(&headers);

    let x_idx = *header_map
        .get("x")
        .ok_or_else(|| AppError::new(2, format!("Missing required column `x` in '{}'.", path.display())))?;
    let value_idx = VALUE_COLUMNS
        .iter()
        .find_map(|name| header_map.get(*name).copied())
        .ok_or_else(|| {
            AppError::new(
                2,
                format!(
                    "Missing value column in '{}': expected one of {}.",
                    path.display(),
                    VALUE_COLUMNS.join(", ")
                ),
            )
        })?;

    let mut x = Vec::new();
    let mut values = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header, and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("CSV parse error on line {line}: {e}")))?;
        x.push(parse_field(&record, x_idx, "x", line)?);
        values.push(parse_field(&record, value_idx, "value", line)?);
    }

    if x.is_empty() {
        return Err(AppError::new(3, format!("No rows in '{}'.", path.display())));
    }

    Ok(SampledDistribution::new(kind, x, values))
}

/// Load a single column of draws.
///
/// Uses the `sample` column when present, otherwise the first column.
pub fn load_samples(path: &Path) -> Result<Vec<f64>, AppError> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader)?;
    let header_map = build_header_map(&headers);

    let idx = SAMPLE_COLUMNS
        .iter()
        .find_map(|name| header_map.get(*name).copied())
        .unwrap_or(0);

    let mut samples = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = result.map_err(|e| AppError::new(2, format!("CSV parse error on line {line}: {e}")))?;
        samples.push(parse_field(&record, idx, "sample", line)?);
    }

    if samples.is_empty() {
        return Err(AppError::new(3, format!("No samples in '{}'.", path.display())));
    }
    Ok(samples)
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn read_headers(reader: &mut csv::Reader<File>) -> Result<StringRecord, AppError> {
    Ok(reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_field(record: &StringRecord, idx: usize, column: &str, line: usize) -> Result<f64, AppError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| AppError::new(2, format!("Line {line}: missing `{column}` field.")))?;
    raw.parse::<f64>()
        .map_err(|_| AppError::new(2, format!("Line {line}: invalid `{column}` value '{raw}'.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("invpit_ingest_{}_{name}", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_table_with_aliased_value_column_and_bom() {
        let path = write_temp("table.csv", "\u{feff}X , PDF\n0.0, 0.5\n1.0, 0.5\n2.0,0.5\n");
        let dist = load_distribution(&path, SampleKind::Pdf).unwrap();
        assert_eq!(dist.kind, SampleKind::Pdf);
        assert_eq!(dist.x, vec![0.0, 1.0, 2.0]);
        assert_eq!(dist.values, vec![0.5, 0.5, 0.5]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn malformed_rows_fail_with_their_line_number() {
        let path = write_temp("bad.csv", "x,cdf\n0.0,0.0\n1.0,abc\n");
        let err = load_distribution(&path, SampleKind::Cdf).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Line 3"), "{err}");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_columns_are_reported() {
        let path = write_temp("nocol.csv", "x,weight\n0.0,1.0\n");
        let err = load_distribution(&path, SampleKind::Pdf).unwrap_err();
        assert!(err.to_string().contains("Missing value column"), "{err}");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn samples_fall_back_to_the_first_column() {
        let path = write_temp("draws.csv", "draw\n0.25\n-1.5\n");
        assert_eq!(load_samples(&path).unwrap(), vec![0.25, -1.5]);
        std::fs::remove_file(path).ok();
    }
}
