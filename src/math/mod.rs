//! Numerical utilities: trapezoidal integration, monotone interpolation and
//! inversion, finite-difference derivatives, and the shared input checks.

pub mod gradient;
pub mod grid;
pub mod integrate;
pub mod interp;
pub mod validate;

pub use gradient::gradient;
pub use grid::linspace;
pub use integrate::{cumulative_integral, trapezoid};
pub use interp::{interpolate, invert, invert_many};
