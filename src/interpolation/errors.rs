use thiserror::Error;

use crate::root_finding::errors::ErrorKind;

#[derive(Debug, Error)]
pub enum InterpolationError {
    #[error("unequal length: x has {x_len} elements, y has {y_len}")]
    UnequalLength { x_len: usize, y_len: usize },

    #[error("non-finite value in input vector at index {idx}")]
    NonFiniteVec { idx: usize },

    #[error("empty input vector(s)")]
    EmptyInput,

    #[error("duplicate x-values detected: {x1} and {x2}")]
    DuplicateX { x1: f64, x2: f64 },

    #[error("evaluation point {got} out of bounds in ({x_min}, {x_max})")]
    OutOfBounds { got: f64, x_min: f64, x_max: f64 },
}
impl InterpolationError {
    /// Coincident abscissas are a zero divided-difference denominator;
    /// everything else is a malformed call.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InterpolationError::DuplicateX { .. } => ErrorKind::DivisionByZero,
            _                                     => ErrorKind::InvalidArgument,
        }
    }
}
