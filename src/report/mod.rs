//! Reporting utilities: curve summaries and formatted terminal output.

pub mod format;

pub use format::*;
