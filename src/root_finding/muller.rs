//! Muller's method
//!
//! Fits a quadratic through the three most recent points and steps to
//! the root of that quadratic closest to the newest point. Complex roots
//! are not pursued: a negative discriminant is clamped to zero, which
//! steps to the vertex of the parabola instead.

use std::fmt;
use std::iter::FusedIterator;

use super::algorithms::{Algorithm, InterpolatingFamily, DEFAULT_MAX_ITER};
use super::config::{CommonCfg, impl_common_cfg};
use super::controller::IterationController;
use super::errors::{ErrorKind, RootFindingError, ToleranceError};
use super::function::Evaluable;
use super::report::{drain, IterationResult, RootFindingReport, Stencil, ToleranceSatisfied};
use thiserror::Error;

const ALGORITHM: Algorithm = Algorithm::Interpolating(InterpolatingFamily::Muller);


#[derive(Debug, Error)]
pub enum MullerError {
    #[error(transparent)]
    RootFinding(#[from] RootFindingError),

    #[error(transparent)]
    Tolerance(#[from] ToleranceError),

    #[error("invalid initial guesses: {a0}, {a1}, {a2} must be finite")]
    InvalidGuess { a0: f64, a1: f64, a2: f64 },

    #[error("degenerate stencil: points {a0}, {a1}, {a2} are not distinct")]
    DegenerateStencil { a0: f64, a1: f64, a2: f64 },

    #[error("quadratic step denominator vanished: b={b}, discriminant={disc}")]
    DegenerateDenominator { b: f64, disc: f64 },
}
impl MullerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MullerError::RootFinding(e) => e.kind(),
            MullerError::Tolerance(e)   => e.kind(),
            MullerError::InvalidGuess { .. } => ErrorKind::InvalidArgument,
            MullerError::DegenerateStencil { .. }
            | MullerError::DegenerateDenominator { .. } => ErrorKind::DivisionByZero,
        }
    }
}


/// Muller configuration
///
/// # Fields
/// - `common` : [`CommonCfg`]
///
/// # Defaults
/// - `residual`, `function_residual` = 1e-6, `max_iter` = 200
/// - error mode is [`ErrorMode::Relative`](super::controller::ErrorMode),
///   so the step is normalized by the magnitude of the new estimate.
#[derive(Debug, Clone)]
pub struct MullerCfg {
    common: CommonCfg,
}
impl MullerCfg {
    #[must_use]
    pub fn new() -> Self {
        Self { common: CommonCfg::new() }
    }
}
impl Default for MullerCfg {
    fn default() -> Self { Self::new() }
}
impl_common_cfg!(MullerCfg);


/// Coefficients of `p(z) = a z^2 + b z + c`, `z = x - x[2]`, through
/// `(x[i], fx[i])`.
///
/// Solves the 2x2 system `a h_i^2 + b h_i = f_i - f_2` for `h_i = x_i - x_2`.
/// Its determinant is `(x0 - x2)(x1 - x2)(x0 - x1)`.
///
/// # Returns
/// - `None` if the determinant is zero
#[inline]
fn fit_quadratic(x: [f64; 3], fx: [f64; 3]) -> Option<(f64, f64, f64)> {
    let h0 = x[0] - x[2];
    let h1 = x[1] - x[2];
    let det = h0 * h1 * (x[0] - x[1]);
    if det == 0.0 {
        return None;
    }

    let e0 = fx[0] - fx[2];
    let e1 = fx[1] - fx[2];
    let a = (h1 * e0 - h0 * e1) / det;
    let b = (h0 * h0 * e1 - h1 * h1 * e0) / det;
    Some((a, b, fx[2]))
}

/// Offset `z` from `x[2]` to the numerically stable root of the fitted
/// quadratic: `z = -2c / (b + sign(b) sqrt(max(b^2 - 4ac, 0)))`.
#[inline]
fn quadratic_step(x: [f64; 3], fx: [f64; 3]) -> Result<f64, MullerError> {
    let (a, b, c) = fit_quadratic(x, fx)
        .ok_or(MullerError::DegenerateStencil { a0: x[0], a1: x[1], a2: x[2] })?;

    let radicand = b * b - 4.0 * a * c;
    let mut disc = if radicand >= 0.0 { radicand.sqrt() } else { 0.0 };
    if b < 0.0 {
        disc = -disc;
    }

    let denom = b + disc;
    if denom == 0.0 {
        return Err(MullerError::DegenerateDenominator { b, disc });
    }
    Ok(-2.0 * c / denom)
}


/// Lazy Muller sequence returned by [`muller`].
///
/// `x[2]` is always the newest point; `x[1]` and `x[0]` are the two
/// earlier points closest to it.
#[derive(Clone)]
pub struct Muller<F> {
    func:    F,
    ctl:     IterationController,
    x:       [f64; 3],
    fx:      [f64; 3],
    stencil: [f64; 3],
}

impl<F> fmt::Debug for Muller<F> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        out.debug_struct("Muller")
            .field("x", &self.x)
            .field("fx", &self.fx)
            .field("ctl", &self.ctl)
            .finish_non_exhaustive()
    }
}

/// Finds a root of a function using
/// [Muller's method](https://en.wikipedia.org/wiki/Muller%27s_method).
///
/// # Arguments
/// - `func`         : function whose root is sought
/// - `a0, a1, a2`   : three finite seeds; `a2` anchors the first fit
/// - `cfg`          : [`MullerCfg`]
///
/// # Behavior
/// - Each step fits a quadratic through the three working points, steps to
///   `x = a2 + z` and evaluates `f(x)` once. The two old points closest to
///   `x` are kept for the next fit.
/// - Accepted when the step error (relative by default) is below
///   `residual` and `|f(x)| < function_residual`.
///
/// # Errors
/// - [`MullerError::InvalidGuess`]          : returned immediately for NaN/inf seeds
/// - [`MullerError::DegenerateStencil`]     : two working points coincide
/// - [`MullerError::DegenerateDenominator`] : `b + disc == 0` (flat fit)
/// - `NonFiniteEvaluation`, `NonConvergence`, `Cancelled` via [`MullerError::RootFinding`]
pub fn muller<F>(
    mut func: F,
    a0: f64,
    a1: f64,
    a2: f64,
    cfg: MullerCfg
) -> Result<Muller<F>, MullerError>
where F: FnMut(f64) -> f64 {

    if !(a0.is_finite() && a1.is_finite() && a2.is_finite()) {
        return Err(MullerError::InvalidGuess { a0, a1, a2 });
    }

    let max_iter = cfg.common.max_iter().unwrap_or(DEFAULT_MAX_ITER);
    let mut ctl  = IterationController::new(ALGORITHM, &cfg.common, max_iter)?;

    let f0 = ctl.evaluate(&mut func, a0)?;
    let f1 = ctl.evaluate(&mut func, a1)?;
    let f2 = ctl.evaluate(&mut func, a2)?;

    log::debug!("muller: seeds {a0}, {a1}, {a2}, budget {max_iter}");

    Ok(Muller {
        func,
        ctl,
        x       : [a0, a1, a2],
        fx      : [f0, f1, f2],
        stencil : [a0, a1, a2],
    })
}

impl<F: Evaluable> Muller<F> {
    pub fn iterations(&self)  -> usize { self.ctl.iterations() }
    pub fn evaluations(&self) -> usize { self.ctl.evaluations() }

    fn step(&mut self) -> Result<IterationResult, MullerError> {
        self.ctl.begin_step(self.x[2])?;

        let z     = quadratic_step(self.x, self.fx)?;
        let x_new = self.x[2] + z;
        let f_new = self.ctl.evaluate(&mut self.func, x_new)?;
        self.stencil = self.x;

        if self.ctl.step_converged(self.x[2], x_new) && self.ctl.residual_converged(f_new) {
            return Ok(IterationResult::converged(x_new));
        }

        // keep the two old points nearest the new estimate
        let mut order = [0usize, 1, 2];
        order.sort_by(|&i, &j| {
            (self.x[i] - x_new).abs().total_cmp(&(self.x[j] - x_new).abs())
        });
        let (near, next) = (order[0], order[1]);
        self.x  = [self.x[next], self.x[near], x_new];
        self.fx = [self.fx[next], self.fx[near], f_new];

        Ok(IterationResult::pending(x_new))
    }

    /// Drains the sequence and reports the accepted root.
    pub fn solve(mut self) -> Result<RootFindingReport, MullerError> {
        let accepted = drain(&mut self, ALGORITHM)?;
        let [s0, s1, s2] = self.stencil;
        Ok(RootFindingReport {
            root                : accepted.value,
            iterations          : self.ctl.iterations(),
            evaluations         : self.ctl.evaluations(),
            tolerance_satisfied : ToleranceSatisfied::StepAndFunction,
            stencil             : Stencil::tripleton(s0, s1, s2),
            algorithm_name      : ALGORITHM.algorithm_name(),
        })
    }
}

impl<F: Evaluable> Iterator for Muller<F> {
    type Item = Result<IterationResult, MullerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ctl.is_finished() {
            return None;
        }
        let step = self.step();
        Some(self.ctl.settle(step))
    }
}
impl<F: Evaluable> FusedIterator for Muller<F> {}
