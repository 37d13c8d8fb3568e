//! `inv-pit` library crate.
//!
//! Re-expresses sampled distributions on the scale of a fiducial one by
//! composing the fiducial quantile function with the test CDF.
//!
//! The binary (`invpit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the fit/transform types are usable from other crates directly

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod report;
pub mod transform;
