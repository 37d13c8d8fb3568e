//! Error types.
//!
//! - `PitError` is the library error: every fit/transform/numerical routine
//!   returns it, naming the offending array and the check that failed.
//! - `AppError` is the binary error: a message plus a process exit code.

use thiserror::Error;

/// Which validation check rejected an input array.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputFault {
    #[error("needs at least {min} points, got {len}")]
    TooShort { len: usize, min: usize },
    #[error("length {found} does not match its grid length {expected}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("non-finite value at index {index}")]
    NonFinite { index: usize },
    #[error("negative value {value} at index {index}")]
    Negative { index: usize, value: f64 },
    #[error("not strictly increasing at index {index}")]
    NotIncreasing { index: usize },
    #[error("value {value} at index {index} is outside [0, 1]")]
    OutOfRange { index: usize, value: f64 },
    #[error("total mass {total} is not positive")]
    ZeroMass { total: f64 },
}

/// Library error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PitError {
    #[error("invalid `{array}`: {fault}")]
    InvalidInput {
        array: &'static str,
        fault: InputFault,
    },

    #[error("`{array}` is not strictly increasing at index {index}")]
    NonMonotonic { array: &'static str, index: usize },

    #[error("transformation must be fitted first")]
    NotFitted,

    #[error("degenerate derivative d(x_out)/d(x_test) = {jacobian:e} at index {index}")]
    DegenerateDerivative { index: usize, jacobian: f64 },
}

impl PitError {
    pub fn invalid(array: &'static str, fault: InputFault) -> Self {
        Self::InvalidInput { array, fault }
    }

    /// Exit code used by the binary for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput { .. } => 3,
            Self::NonMonotonic { .. } | Self::DegenerateDerivative { .. } => 4,
            Self::NotFitted => 5,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PitError> for AppError {
    fn from(err: PitError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pit_errors_map_to_exit_codes() {
        let err = PitError::invalid("pdf", InputFault::Negative { index: 3, value: -0.5 });
        let app: AppError = err.into();
        assert_eq!(app.exit_code(), 3);
        assert!(app.to_string().contains("`pdf`"));
        assert!(app.to_string().contains("index 3"));

        let app: AppError = PitError::NotFitted.into();
        assert_eq!(app.exit_code(), 5);
    }
}
