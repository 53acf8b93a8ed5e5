//! Newton-Raphson method

use std::fmt;
use std::iter::FusedIterator;

use super::algorithms::{Algorithm, OpenFamily, DEFAULT_MAX_ITER};
use super::config::{CommonCfg, impl_common_cfg};
use super::controller::IterationController;
use super::errors::{ErrorKind, RootFindingError, ToleranceError};
use super::function::{Differentiable, WithDerivative};
use super::report::{drain, IterationResult, RootFindingReport, Stencil, ToleranceSatisfied};
use thiserror::Error;

const ALGORITHM: Algorithm = Algorithm::Open(OpenFamily::Newton);


#[derive(Debug, Error)]
pub enum NewtonError {
    #[error(transparent)]
    RootFinding(#[from] RootFindingError),

    #[error(transparent)]
    Tolerance(#[from] ToleranceError),

    #[error("invalid initial guess: x0={x0} must be finite")]
    InvalidGuess { x0: f64 },

    #[error("derivative vanished at x={x}; no bracket to fall back on")]
    ZeroDerivative { x: f64 },

    #[error("derivative non-finite at x={x}, f'(x)={dfx}")]
    DerivativeNotFinite { x: f64, dfx: f64 },

    #[error("step non-finite at x={x}, step={step}; x + step undefined")]
    StepNotFinite { x: f64, step: f64 },
}
impl NewtonError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NewtonError::RootFinding(e) => e.kind(),
            NewtonError::Tolerance(e)   => e.kind(),
            NewtonError::InvalidGuess { .. } => ErrorKind::InvalidArgument,
            NewtonError::ZeroDerivative { .. }
            | NewtonError::DerivativeNotFinite { .. }
            | NewtonError::StepNotFinite { .. } => ErrorKind::DivisionByZero,
        }
    }
}


/// Newton configuration.
///
/// # Fields
/// - `common` : [`CommonCfg`]; `residual` bounds the step, `max_iter`
///   defaults to 200.
#[derive(Debug, Clone)]
pub struct NewtonCfg {
    common: CommonCfg,
}
impl NewtonCfg {
    #[must_use]
    pub fn new() -> Self {
        Self { common: CommonCfg::new() }
    }
}
impl Default for NewtonCfg {
    fn default() -> Self { Self::new() }
}
impl_common_cfg!(NewtonCfg);


/// Lazy Newton-Raphson sequence returned by [`newton`] and [`newton_with`].
#[derive(Clone)]
pub struct Newton<D> {
    func:     D,
    ctl:      IterationController,
    x:        f64,
    previous: f64,
}

impl<D> fmt::Debug for Newton<D> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        out.debug_struct("Newton")
            .field("x", &self.x)
            .field("ctl", &self.ctl)
            .finish_non_exhaustive()
    }
}

/// Finds a root using the
/// [Newton-Raphson method](https://en.wikipedia.org/wiki/Newton%27s_method)
/// with an analytic derivative.
///
/// # Arguments
/// - `f`   : function whose root is sought
/// - `df`  : its first derivative
/// - `x0`  : initial guess, must be finite
/// - `cfg` : [`NewtonCfg`]
///
/// # Behavior
/// - Update: `x_{n+1} = x_n - f(x_n) / f'(x_n)`
/// - Emits `(x_{n+1}, converged)` per step, accepted once the step error
///   between `x_n` and `x_{n+1}` is below `residual`.
///
/// # Errors
/// - [`NewtonError::InvalidGuess`]        : returned immediately for NaN/inf `x0`
/// - [`NewtonError::ZeroDerivative`]      : `f'(x_n) == 0` at a step
/// - [`NewtonError::DerivativeNotFinite`] : `f'(x_n)` is NaN/inf
/// - [`NewtonError::StepNotFinite`]       : `f(x_n) / f'(x_n)` overflowed
/// - `NonFiniteEvaluation`, `NonConvergence`, `Cancelled` via [`NewtonError::RootFinding`]
///
/// # Warning
/// - Poor initial guesses may lead to divergence or cycling. For guaranteed
///   convergence, use a bracketing method.
pub fn newton<F, G>(
    f: F,
    df: G,
    x0: f64,
    cfg: NewtonCfg
) -> Result<Newton<WithDerivative<F, G>>, NewtonError>
where
    F: FnMut(f64) -> f64,
    G: FnMut(f64) -> f64
{
    newton_with(WithDerivative::new(f, df), x0, cfg)
}

/// [`newton`] over any [`Differentiable`] function.
pub fn newton_with<D>(
    func: D,
    x0: f64,
    cfg: NewtonCfg
) -> Result<Newton<D>, NewtonError>
where D: Differentiable {
    if !x0.is_finite() {
        return Err(NewtonError::InvalidGuess { x0 });
    }

    let max_iter = cfg.common.max_iter().unwrap_or(DEFAULT_MAX_ITER);
    let ctl = IterationController::new(ALGORITHM, &cfg.common, max_iter)?;

    log::debug!("newton: x0={x0}, budget {max_iter}");

    Ok(Newton { func, ctl, x: x0, previous: x0 })
}

impl<D: Differentiable> Newton<D> {
    pub fn iterations(&self)  -> usize { self.ctl.iterations() }
    pub fn evaluations(&self) -> usize { self.ctl.evaluations() }

    fn step(&mut self) -> Result<IterationResult, NewtonError> {
        self.ctl.begin_step(self.x)?;

        let x  = self.x;
        let fx = self.ctl.evaluate(&mut self.func, x)?;

        self.ctl.count_evaluation();
        let dfx = self.func.derivative(x);
        if dfx == 0.0 {
            return Err(NewtonError::ZeroDerivative { x });
        }
        if !dfx.is_finite() {
            return Err(NewtonError::DerivativeNotFinite { x, dfx });
        }

        let step = -fx / dfx;
        let next = x + step;
        if !next.is_finite() {
            return Err(NewtonError::StepNotFinite { x, step });
        }

        self.previous = x;
        self.x        = next;

        if self.ctl.step_converged(x, next) {
            Ok(IterationResult::converged(next))
        } else {
            Ok(IterationResult::pending(next))
        }
    }

    /// Drains the sequence and reports the accepted root.
    pub fn solve(mut self) -> Result<RootFindingReport, NewtonError> {
        let accepted = drain(&mut self, ALGORITHM)?;
        Ok(RootFindingReport {
            root                : accepted.value,
            iterations          : self.ctl.iterations(),
            evaluations         : self.ctl.evaluations(),
            tolerance_satisfied : ToleranceSatisfied::StepSize,
            stencil             : Stencil::singleton(self.previous),
            algorithm_name      : ALGORITHM.algorithm_name(),
        })
    }
}

impl<D: Differentiable> Iterator for Newton<D> {
    type Item = Result<IterationResult, NewtonError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ctl.is_finished() {
            return None;
        }
        let step = self.step();
        Some(self.ctl.settle(step))
    }
}
impl<D: Differentiable> FusedIterator for Newton<D> {}
