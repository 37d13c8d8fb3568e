//! Input generation for demos: closed-form reference distributions sampled
//! on grids, and seeded random draws.

pub mod reference;
pub mod sample;

pub use reference::*;
pub use sample::*;
