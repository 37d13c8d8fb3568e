//! Fiducial fitting.
//!
//! Responsibilities:
//!
//! - validate the fiducial grid and its PDF/CDF samples
//! - build the strictly increasing `(cdf, x)` table
//! - answer quantile queries over it

pub mod fitter;

pub use fitter::*;
