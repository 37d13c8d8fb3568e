//! Transform application.
//!
//! Responsibilities:
//!
//! - map test CDFs and PDFs through a fitted fiducial mapping
//! - apply the change-of-variables rule and its degenerate-Jacobian policy
//! - remap individual test draws (parallel)

pub mod applicator;
pub mod samples;

pub use applicator::*;
