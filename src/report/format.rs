//! Formatted terminal output.
//!
//! Formatting stays in one place so the fit/transform code only returns data
//! and output changes are localized.

use crate::data::SampleStats;
use crate::domain::{CurveFile, SampleKind, TransformedCurve};
use crate::fit::FittedMapping;
use crate::math::integrate::trapezoid_sum;

/// Shape summary of a transformed curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSummary {
    pub points: usize,
    pub x_min: f64,
    pub x_max: f64,
    /// Trapezoid integral over `x_out` (PDF curves only).
    pub mass: Option<f64>,
    /// `x_out` of the largest value (PDF curves only).
    pub peak_x: Option<f64>,
    pub degenerate: usize,
}

/// Summarize a transformed curve.
pub fn summarize_curve(curve: &TransformedCurve) -> CurveSummary {
    let x_min = curve.x.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = curve.x.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (mass, peak_x) = match curve.kind {
        SampleKind::Pdf => {
            let peak = curve
                .values
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(i, _)| curve.x[i]);
            (Some(trapezoid_sum(&curve.x, &curve.values)), peak)
        }
        SampleKind::Cdf => (None, None),
    };

    CurveSummary {
        points: curve.len(),
        x_min,
        x_max,
        mass,
        peak_x,
        degenerate: curve.degenerate.len(),
    }
}

/// Format the fitted fiducial table.
pub fn format_fit_summary(label: &str, mapping: &FittedMapping) -> String {
    let mut out = String::new();
    let (x_min, x_max) = mapping.support();
    let (p_min, p_max) = mapping.probability_range();

    out.push_str(&format!("Fiducial ({label}):\n"));
    out.push_str(&format!("- points     : {}\n", mapping.len()));
    out.push_str(&format!("- support    : [{x_min:.6}, {x_max:.6}]\n"));
    out.push_str(&format!("- cdf range  : [{p_min:.6e}, {p_max:.6e}]\n"));
    out.push_str(&format!("- extrapolate: {:?}\n", mapping.extrapolation()));
    if let Ok(median) = mapping.quantile(0.5) {
        out.push_str(&format!("- median     : {median:.6}\n"));
    }

    out
}

/// Format a transformed curve summary.
pub fn format_curve_summary(curve: &TransformedCurve) -> String {
    let s = summarize_curve(curve);
    let mut out = String::new();

    out.push_str(&format!("Transformed {}:\n", curve.kind.display_name()));
    out.push_str(&format!("- points     : {}\n", s.points));
    out.push_str(&format!("- x_out      : [{:.6}, {:.6}]\n", s.x_min, s.x_max));
    if let Some(mass) = s.mass {
        out.push_str(&format!("- mass       : {mass:.6}\n"));
    }
    if let Some(peak) = s.peak_x {
        out.push_str(&format!("- peak at    : {peak:.6}\n"));
    }
    if s.degenerate > 0 {
        out.push_str(&format!("- zeroed     : {} degenerate point(s)\n", s.degenerate));
    }

    out
}

/// Format a saved curve file header plus its summary.
pub fn format_curve_file(doc: &CurveFile) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} curve ({}) ===\n", doc.tool, doc.generated.to_rfc3339()));
    out.push_str(&format!(
        "Fiducial: {} | Test: {} | Extrapolation: {:?}\n",
        doc.fiducial_kind.display_name(),
        doc.test_kind.display_name(),
        doc.extrapolation
    ));
    out.push_str(&format_curve_summary(&doc.curve));
    out
}

/// Format a `p -> quantile` table.
pub fn format_quantiles(ps: &[f64], qs: &[f64]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:>14} {:>16}", "p", "quantile").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<14} {:-<16}", "", "").trim_end());
    out.push('\n');
    for (p, q) in ps.iter().zip(qs.iter()) {
        out.push_str(&format!("{p:>14.8} {q:>16.8}\n"));
    }
    out
}

/// Format one line of sample moments.
pub fn format_sample_stats(label: &str, stats: &SampleStats) -> String {
    format!(
        "{label:<10} n={} mean={:.4} std={:.4} range=[{:.4}, {:.4}]\n",
        stats.n, stats.mean, stats.std_dev, stats.min, stats.max
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::FiducialFitter;

    fn pdf_curve() -> TransformedCurve {
        TransformedCurve {
            kind: SampleKind::Pdf,
            x: vec![0.0, 1.0, 2.0, 2.0],
            values: vec![0.0, 1.0, 0.0, 0.0],
            degenerate: vec![3],
        }
    }

    #[test]
    fn summary_integrates_and_locates_peak() {
        let s = summarize_curve(&pdf_curve());
        assert_eq!(s.points, 4);
        assert_eq!((s.x_min, s.x_max), (0.0, 2.0));
        assert!((s.mass.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(s.peak_x, Some(1.0));
        assert_eq!(s.degenerate, 1);
    }

    #[test]
    fn cdf_summary_has_no_mass() {
        let curve = TransformedCurve {
            kind: SampleKind::Cdf,
            x: vec![0.0, 1.0],
            values: vec![0.0, 1.0],
            degenerate: Vec::new(),
        };
        let s = summarize_curve(&curve);
        assert_eq!(s.mass, None);
        assert!(!format_curve_summary(&curve).contains("mass"));
    }

    #[test]
    fn fit_summary_reports_support_and_median() {
        let mut fitter = FiducialFitter::new();
        fitter.fit_from_cdf(&[0.0, 2.0], &[0.0, 1.0]).unwrap();
        let text = format_fit_summary("cdf", fitter.mapping().unwrap());
        assert!(text.contains("support    : [0.000000, 2.000000]"), "{text}");
        assert!(text.contains("median     : 1.000000"), "{text}");
    }

    #[test]
    fn quantile_table_has_one_row_per_probability() {
        let text = format_quantiles(&[0.1, 0.9], &[-1.0, 1.0]);
        assert_eq!(text.lines().count(), 4);
    }
}
