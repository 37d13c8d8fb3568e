//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - numerical policy enums (`Extrapolation`, `Normalization`, `EdgeOrder`,
//!   `DegeneratePolicy`)
//! - sampled inputs (`SampledDistribution`) and transform outputs
//!   (`TransformedCurve`, `CurveFile`)
//! - the resolved CLI configuration (`RunConfig`)

pub mod types;

pub use types::*;
