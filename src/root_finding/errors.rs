//! Root-finding error types.
//!
//! ┌ [`RootFindingError`] : common runtime errors
//! │   ├ non-finite function evaluation
//! │   ├ iteration budget exhausted / cancellation observed
//! │   └ invalid global parameters (e.g. max_iter, error mode)
//! │
//! ├ [`ToleranceError`]   : invalid input tolerances
//! │
//! └ [`ErrorKind`]        : coarse category every error in the crate maps to


use thiserror::Error;
use super::algorithms::Algorithm;
use super::controller::ErrorMode;


/// Coarse error categories.
///
/// ├ `InvalidArgument` : malformed call, raised before any iteration
/// ├ `DivisionByZero`  : numerically degenerate step (zero derivative,
/// │                     zero secant denominator, non-finite evaluation, ...)
/// ├ `NonConvergence`  : iteration budget exhausted
/// ├ `Cancelled`       : cooperative cancellation observed
/// └ `UnsupportedMode` : [`ErrorMode`] not meaningful for the method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    DivisionByZero,
    NonConvergence,
    Cancelled,
    UnsupportedMode,
}


/// Root-finding runtime errors.
#[derive(Debug, Error)]
pub enum RootFindingError {
    #[error("function non-finite at x={x}, f(x)={fx}")]
    NonFiniteEvaluation { x: f64, fx: f64 },

    #[error("no convergence after {iterations} iterations; last estimate {last}")]
    NonConvergence { iterations: usize, last: f64 },

    #[error("search cancelled before iteration {iteration}")]
    Cancelled { iteration: usize },

    #[error("invalid max_iter: must be >= 1. got max_iter={got}")]
    InvalidMaxIter { got: usize },

    #[error("error mode {mode:?} not supported by {algorithm}")]
    UnsupportedMode { mode: ErrorMode, algorithm: Algorithm },

    #[error("{algorithm} search already drained")]
    Exhausted { algorithm: Algorithm },
}
impl RootFindingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RootFindingError::NonFiniteEvaluation { .. } => ErrorKind::DivisionByZero,
            RootFindingError::NonConvergence { .. }      => ErrorKind::NonConvergence,
            RootFindingError::Cancelled { .. }           => ErrorKind::Cancelled,
            RootFindingError::InvalidMaxIter { .. }
            | RootFindingError::Exhausted { .. }         => ErrorKind::InvalidArgument,
            RootFindingError::UnsupportedMode { .. }     => ErrorKind::UnsupportedMode,
        }
    }
}


/// Tolerance configuration errors.
///
/// ┌ `residual`          : abscissa (step) tolerance, finite and > 0
/// └ `function_residual` : function-value tolerance, finite and > 0
#[derive(Debug, Error)]
pub enum ToleranceError {
    #[error("invalid `residual` tolerance: must be finite and > 0. got {got}")]
    InvalidResidual { got: f64 },

    #[error("invalid `function_residual` tolerance: must be finite and > 0. got {got}")]
    InvalidFunctionResidual { got: f64 },
}
impl ToleranceError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}
