use std::fmt;
use std::iter::FusedIterator;

use super::algorithms::{Algorithm, OpenFamily, DEFAULT_MAX_ITER};
use super::config::{CommonCfg, impl_common_cfg};
use super::controller::IterationController;
use super::errors::{ErrorKind, RootFindingError, ToleranceError};
use super::function::Evaluable;
use super::report::{drain, IterationResult, RootFindingReport, Stencil, ToleranceSatisfied};
use thiserror::Error;

const ALGORITHM: Algorithm = Algorithm::Open(OpenFamily::Secant);


#[derive(Debug, Error)]
pub enum SecantError {
    #[error(transparent)]
    RootFinding(#[from] RootFindingError),

    #[error(transparent)]
    Tolerance(#[from] ToleranceError),

    #[error("invalid initial guesses: x0={x0} and x1={x1} must be finite")]
    InvalidGuess { x0: f64, x1: f64 },

    #[error("degenerate secant: f(x0) == f(x1) == {fx} at x0={x0}, x1={x1}")]
    DegenerateSecantStep { x0: f64, x1: f64, fx: f64 },
}
impl SecantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SecantError::RootFinding(e) => e.kind(),
            SecantError::Tolerance(e)   => e.kind(),
            SecantError::InvalidGuess { .. }         => ErrorKind::InvalidArgument,
            SecantError::DegenerateSecantStep { .. } => ErrorKind::DivisionByZero,
        }
    }
}


/// Secant configuration
///
/// # Fields
/// - `common` : [`CommonCfg`] with tolerances and optional `max_iter`.
///
/// # Defaults
/// - If `common.max_iter` is `None`, [`secant`] uses
///   [`DEFAULT_MAX_ITER`] (200).
#[derive(Debug, Clone)]
pub struct SecantCfg {
    common: CommonCfg,
}
impl SecantCfg {
    #[must_use]
    pub fn new() -> Self {
        Self { common: CommonCfg::new() }
    }
}
impl Default for SecantCfg {
    fn default() -> Self { Self::new() }
}
impl_common_cfg!(SecantCfg);


/// Calculates the secant x-intercept through `(x0, f0)` and `(x1, f1)`:
/// `x1 - f1 (x1 - x0) / (f1 - f0)`
#[inline]
pub(crate) fn secant_x_intercept(
    (x0, f0): (f64, f64),
    (x1, f1): (f64, f64),
) -> Result<f64, SecantError> {
    if f1 == f0 {
        return Err(SecantError::DegenerateSecantStep { x0, x1, fx: f1 });
    }
    Ok(x1 - f1 * (x1 - x0) / (f1 - f0))
}


/// Lazy secant sequence returned by [`secant`].
#[derive(Clone)]
pub struct Secant<F> {
    func: F,
    ctl:  IterationController,
    x0:   f64,
    f0:   f64,
    x1:   f64,
    f1:   f64,
}

impl<F> fmt::Debug for Secant<F> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        out.debug_struct("Secant")
            .field("x0", &self.x0)
            .field("x1", &self.x1)
            .field("ctl", &self.ctl)
            .finish_non_exhaustive()
    }
}

/// Finds a root of a function using the
/// [secant method](https://en.wikipedia.org/wiki/Secant_method).
///
/// # Arguments
/// - `func` : The function whose root is to be found
/// - `x0`   : First initial guess, must be finite
/// - `x1`   : Second initial guess, must be finite
/// - `cfg`  : [`SecantCfg`] (tolerances, optional `max_iter`)
///
/// # Behavior
/// - Update:
///   x_{n+1} = x_n - f(x_n) * (x_n - x_{n-1}) / (f(x_n) - f(x_{n-1}))
/// - Accepted once the step error between `x_n` and `x_{n+1}` is below
///   `residual`.
/// - Equal seeds are not rejected up front; their equal function values
///   surface as a degenerate step on the first pull.
///
/// # Errors
/// - [`SecantError::InvalidGuess`]         : returned immediately for NaN/inf seeds
/// - [`SecantError::DegenerateSecantStep`] : `f(x_n) == f(x_{n-1})`
/// - `NonFiniteEvaluation`, `NonConvergence`, `Cancelled` via [`SecantError::RootFinding`]
///
/// # Notes
/// - Convergence is superlinear (~1.618) near simple roots.
pub fn secant<F>(
    mut func: F,
    x0: f64,
    x1: f64,
    cfg: SecantCfg
) -> Result<Secant<F>, SecantError>
where F: FnMut(f64) -> f64 {

    if !(x0.is_finite() && x1.is_finite()) {
        return Err(SecantError::InvalidGuess { x0, x1 });
    }

    let max_iter = cfg.common.max_iter().unwrap_or(DEFAULT_MAX_ITER);
    let mut ctl  = IterationController::new(ALGORITHM, &cfg.common, max_iter)?;

    let f0 = ctl.evaluate(&mut func, x0)?;
    let f1 = ctl.evaluate(&mut func, x1)?;

    log::debug!("secant: seeds {x0}, {x1}, budget {max_iter}");

    Ok(Secant { func, ctl, x0, f0, x1, f1 })
}

impl<F: Evaluable> Secant<F> {
    pub fn iterations(&self)  -> usize { self.ctl.iterations() }
    pub fn evaluations(&self) -> usize { self.ctl.evaluations() }

    fn step(&mut self) -> Result<IterationResult, SecantError> {
        self.ctl.begin_step(self.x1)?;

        let x2 = secant_x_intercept((self.x0, self.f0), (self.x1, self.f1))?;
        if self.ctl.step_converged(self.x1, x2) {
            // the accepted point is never evaluated; only the stencil moves
            self.x0 = self.x1;
            self.x1 = x2;
            return Ok(IterationResult::converged(x2));
        }

        let f2 = self.ctl.evaluate(&mut self.func, x2)?;
        self.x0 = self.x1;
        self.f0 = self.f1;
        self.x1 = x2;
        self.f1 = f2;

        Ok(IterationResult::pending(x2))
    }

    /// Drains the sequence and reports the accepted root.
    pub fn solve(mut self) -> Result<RootFindingReport, SecantError> {
        let accepted = drain(&mut self, ALGORITHM)?;
        Ok(RootFindingReport {
            root                : accepted.value,
            iterations          : self.ctl.iterations(),
            evaluations         : self.ctl.evaluations(),
            tolerance_satisfied : ToleranceSatisfied::StepSize,
            stencil             : Stencil::doubleton(self.x1, self.x0),
            algorithm_name      : ALGORITHM.algorithm_name(),
        })
    }
}

impl<F: Evaluable> Iterator for Secant<F> {
    type Item = Result<IterationResult, SecantError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ctl.is_finished() {
            return None;
        }
        let step = self.step();
        Some(self.ctl.settle(step))
    }
}
impl<F: Evaluable> FusedIterator for Secant<F> {}
