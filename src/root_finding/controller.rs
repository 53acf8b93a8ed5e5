//! Iteration control shared by every search.
//!
//! [`IterationController`] owns the resolved tolerances, the iteration
//! budget and the optional cancellation token of one search invocation,
//! and decides per step whether to continue, accept or fail.
//!
//! [`ErrorMode`] selects how the step size between successive estimates
//! is normalized before it is compared against `residual`.

use std::fmt::Display;

use super::algorithms::Algorithm;
use super::cancel::CancellationToken;
use super::config::CommonCfg;
use super::errors::RootFindingError;
use super::function::Evaluable;
use super::report::IterationResult;


/// Offset keeping the relative step error finite near `x = 0`.
pub const INFINITESIMAL: f64 = 1e-6;


/// Step-size normalization.
/// - [`ErrorMode::Absolute`] : `|x_new - x_old|`
/// - [`ErrorMode::Relative`] : `2 |x_new - x_old| / (|x_new| + INFINITESIMAL)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    Absolute,
    Relative,
}
impl ErrorMode {
    #[inline]
    pub fn step_error(self, previous: f64, next: f64) -> f64 {
        let delta = (next - previous).abs();
        match self {
            ErrorMode::Absolute => delta,
            ErrorMode::Relative => 2.0 * delta / (next.abs() + INFINITESIMAL),
        }
    }
}


/// Per-invocation iteration state and stopping policy.
///
/// Tolerances, budget and error mode are fixed at construction; only the
/// counters and the finished flag move while the search runs.
#[derive(Debug, Clone)]
pub struct IterationController {
    algorithm:         Algorithm,
    residual:          f64,
    function_residual: f64,
    max_iter:          usize,
    error_mode:        ErrorMode,
    cancel:            Option<CancellationToken>,

    iteration:   usize,
    evaluations: usize,
    finished:    bool,
}

impl IterationController {
    /// Resolves `cfg` for `algorithm` with the given iteration budget.
    ///
    /// # Errors
    /// - [`RootFindingError::InvalidMaxIter`]  : `max_iter == 0`
    /// - [`RootFindingError::UnsupportedMode`] : error mode not meaningful for `algorithm`
    pub fn new(
        algorithm: Algorithm,
        cfg: &CommonCfg,
        max_iter: usize
    ) -> Result<Self, RootFindingError> {
        if max_iter == 0 {
            return Err(RootFindingError::InvalidMaxIter { got: max_iter });
        }

        let error_mode = cfg.error_mode().unwrap_or(algorithm.default_error_mode());
        if !algorithm.supports(error_mode) {
            return Err(RootFindingError::UnsupportedMode { mode: error_mode, algorithm });
        }

        Ok(Self {
            algorithm,
            residual          : cfg.residual(),
            function_residual : cfg.function_residual(),
            max_iter,
            error_mode,
            cancel            : cfg.cancel().cloned(),
            iteration         : 0,
            evaluations       : 0,
            finished          : false,
        })
    }

    // getters
    pub fn algorithm(&self)         -> Algorithm { self.algorithm }
    pub fn residual(&self)          -> f64 { self.residual }
    pub fn function_residual(&self) -> f64 { self.function_residual }
    pub fn max_iter(&self)          -> usize { self.max_iter }
    pub fn error_mode(&self)        -> ErrorMode { self.error_mode }
    pub fn iterations(&self)        -> usize { self.iteration }
    pub fn evaluations(&self)       -> usize { self.evaluations }
    pub fn is_finished(&self)       -> bool { self.finished }
    pub fn has_budget(&self)        -> bool { self.iteration < self.max_iter }

    /// Opens the next iteration.
    ///
    /// Cancellation is checked first, then the budget. `last` is the most
    /// recent estimate and is carried in the non-convergence error.
    ///
    /// # Errors
    /// - [`RootFindingError::Cancelled`]      : token signalled
    /// - [`RootFindingError::NonConvergence`] : `max_iter` steps already taken
    pub fn begin_step(&mut self, last: f64) -> Result<usize, RootFindingError> {
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(RootFindingError::Cancelled { iteration: self.iteration + 1 });
        }
        if !self.has_budget() {
            return Err(RootFindingError::NonConvergence {
                iterations: self.iteration,
                last
            });
        }
        self.iteration += 1;
        Ok(self.iteration)
    }

    /// Evaluates `f(x)`, counting the evaluation and rejecting NaN/inf.
    pub fn evaluate<F>(&mut self, f: &mut F, x: f64) -> Result<f64, RootFindingError>
    where F: Evaluable + ?Sized {
        self.evaluations += 1;
        let fx = f.eval(x);
        if !fx.is_finite() {
            return Err(RootFindingError::NonFiniteEvaluation { x, fx });
        }
        Ok(fx)
    }

    /// Counts an evaluation made outside [`IterationController::evaluate`]
    /// (e.g. a derivative).
    pub(crate) fn count_evaluation(&mut self) {
        self.evaluations += 1;
    }

    #[inline]
    pub fn step_error(&self, previous: f64, next: f64) -> f64 {
        self.error_mode.step_error(previous, next)
    }

    #[inline]
    pub fn step_converged(&self, previous: f64, next: f64) -> bool {
        self.step_error(previous, next) < self.residual
    }

    #[inline]
    pub fn residual_converged(&self, fx: f64) -> bool {
        fx.abs() < self.function_residual
    }

    /// Records the outcome of one step; a converged result or any error
    /// finishes the search.
    pub(crate) fn settle<E: Display>(
        &mut self,
        step: Result<IterationResult, E>
    ) -> Result<IterationResult, E> {
        match &step {
            Ok(result) if result.converged => {
                self.finished = true;
                log::debug!(
                    "{}: accepted {} after {} iterations, {} evaluations",
                    self.algorithm, result.value, self.iteration, self.evaluations
                );
            }
            Ok(result) => {
                log::trace!("{}: iteration {} -> {}", self.algorithm, self.iteration, result.value);
            }
            Err(e) => {
                self.finished = true;
                log::debug!("{}: stopped at iteration {}: {e}", self.algorithm, self.iteration);
            }
        }
        step
    }
}
