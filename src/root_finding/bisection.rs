use std::fmt;
use std::iter::FusedIterator;

use super::algorithms::{Algorithm, BracketFamily};
use super::config::{CommonCfg, impl_common_cfg};
use super::controller::IterationController;
use super::errors::{ErrorKind, RootFindingError, ToleranceError};
use super::function::Evaluable;
use super::report::{drain, IterationResult, RootFindingReport, Stencil, ToleranceSatisfied};
use super::signs::{check_endpoints, opposite_sign, EndpointCheck};
use thiserror::Error;

const ALGORITHM: Algorithm = Algorithm::Bracket(BracketFamily::Bisection);

#[derive(Debug, Error)]
pub enum BisectionError {
    #[error(transparent)]
    RootFinding(#[from] RootFindingError),

    #[error(transparent)]
    Tolerance(#[from] ToleranceError),

    #[error("no sign change on [{a}, {b}]: f(a) * f(b) > 0")]
    NoSignChange  { a: f64, b: f64 },

    #[error("invalid bounds: a and b must be finite with a < b. got [{a}, {b}]")]
    InvalidBounds { a: f64, b: f64 },
}
impl BisectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BisectionError::RootFinding(e) => e.kind(),
            BisectionError::Tolerance(e)   => e.kind(),
            BisectionError::NoSignChange { .. }
            | BisectionError::InvalidBounds { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Bisection Configuration
///
/// # Fields
/// - `common` : [`CommonCfg`]; only `residual`, `max_iter` and the
///   cancellation token are read.
///
/// # Notes:
/// └ If `max_iter` is None, it will be set to [`theoretical_iter`]
///     ├ where [`theoretical_iter`] is the number of halvings needed to
///     └ shrink `[a, b]` below `residual`.
#[derive(Debug, Clone)]
pub struct BisectionCfg {
    common: CommonCfg,
}
impl BisectionCfg {
    #[must_use]
    pub fn new() -> Self {
        Self { common: CommonCfg::new() }
    }
}
impl Default for BisectionCfg {
    fn default() -> Self { Self::new() }
}
impl_common_cfg!(BisectionCfg);


/// Midpoint of [a, b]
#[inline]
pub(crate) fn midpoint(a: f64, b: f64) -> f64 {
    0.5 * a + 0.5 * b
}

/// Number of halvings needed for `[a, b]` to shrink below `residual`:
/// `ceil(log2((b - a) / residual))`, at least 1.
///
/// Works from the half-width so brackets wider than `f64::MAX` still get a
/// finite budget.
pub fn theoretical_iter(a: f64, b: f64, residual: f64) -> usize {
    let half = 0.5 * b - 0.5 * a;
    if half <= 0.5 * residual {
        return 1;
    }
    ((half.log2() + 1.0 - residual.log2()).ceil() as usize).max(1)
}


/// Lazy bisection sequence returned by [`bisection`].
///
/// Each call to `next` halves the bracket once. The bracket
/// `f(lower) * f(upper) < 0` holds after every step.
#[derive(Clone)]
pub struct Bisection<F> {
    func:      F,
    ctl:       IterationController,
    lower:     f64,
    upper:     f64,
    f_lower:   f64,
    exact:     Option<f64>,
    last:      f64,
    satisfied: ToleranceSatisfied,
}

// `func` is usually a closure and has no Debug
impl<F> fmt::Debug for Bisection<F> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        out.debug_struct("Bisection")
            .field("bracket", &[self.lower, self.upper])
            .field("ctl", &self.ctl)
            .finish_non_exhaustive()
    }
}

/// Finds a root of a function using the
/// [bisection method](https://en.wikipedia.org/wiki/Bisection_method).
///
/// This method assumes that the function `func` is continuous on the interval `[a, b]`
/// and that `func(a)` and `func(b)` have opposite signs, guaranteeing a root exists
/// within the interval.
///
/// # Arguments
///
/// ┌ `func` - The function whose root is to be found.
/// ├ `a`    - Lower bound of the search interval. Must be finite and less than `b`.
/// ├ `b`    - Upper bound of the search interval. Must be finite and greater than `a`.
/// └ `cfg`  - [`BisectionCfg`]
///    Defaults:
///    ├ residual = 1e-6
///    └ max_iter = ceil(log2((b - a) / residual))
///
/// # Returns
///
/// A [`Bisection`] iterator. Nothing past the two endpoint evaluations
/// happens until it is pulled. Each item is one step:
/// ├ `(midpoint, false)` while `|f(midpoint)| >= residual`
/// └ `(midpoint, true)`  once `|f(midpoint)| < residual`, then the sequence ends.
/// An endpoint with `f = 0` is emitted immediately as `(endpoint, true)`.
///
/// # Errors
///
/// Returned immediately:
/// ┌ [`BisectionError::InvalidBounds`] - `a` or `b` is NaN/inf or if `a >= b`.
/// ├ [`BisectionError::NoSignChange`]  - `func(a)` and `func(b)` share a sign.
/// └ via [`BisectionError::RootFinding`]
///     ├ `NonFiniteEvaluation` - an endpoint evaluates to NaN/inf
///     ├ `InvalidMaxIter`      - theoretical budget resolved to 0
///     └ `UnsupportedMode`     - [`ErrorMode::Relative`](super::controller::ErrorMode) selected
///
/// Yielded by the iterator:
/// ┌ `NonConvergence`      - budget exhausted without `|f(mid)| < residual`
/// ├ `Cancelled`           - cancellation token signalled
/// └ `NonFiniteEvaluation` - `func(midpoint)` is NaN/inf
pub fn bisection<F>(
    mut func: F,
    a: f64,
    b: f64,
    cfg: BisectionCfg
) -> Result<Bisection<F>, BisectionError>
where F: FnMut(f64) -> f64 {

    if !(a.is_finite() && b.is_finite()) || a >= b {
        return Err(BisectionError::InvalidBounds { a, b });
    }

    let max_iter = cfg.common.max_iter()
        .unwrap_or_else(|| theoretical_iter(a, b, cfg.common.residual()));
    let mut ctl = IterationController::new(ALGORITHM, &cfg.common, max_iter)?;

    let fa = ctl.evaluate(&mut func, a)?;
    let fb = ctl.evaluate(&mut func, b)?;

    let exact = match check_endpoints((a, fa), (b, fb)) {
        EndpointCheck::Root(x)      => Some(x),
        EndpointCheck::SignChange   => None,
        EndpointCheck::NoSignChange => return Err(BisectionError::NoSignChange { a, b }),
    };

    log::debug!("bisection: bracket [{a}, {b}], budget {max_iter}");

    Ok(Bisection {
        func,
        ctl,
        lower     : a,
        upper     : b,
        f_lower   : fa,
        exact,
        last      : midpoint(a, b),
        satisfied : ToleranceSatisfied::FunctionResidual,
    })
}

impl<F: Evaluable> Bisection<F> {
    pub fn iterations(&self)  -> usize { self.ctl.iterations() }
    pub fn evaluations(&self) -> usize { self.ctl.evaluations() }
    pub fn bracket(&self)     -> [f64; 2] { [self.lower, self.upper] }

    fn step(&mut self) -> Result<IterationResult, BisectionError> {
        if let Some(root) = self.exact.take() {
            self.last      = root;
            self.satisfied = ToleranceSatisfied::ExactRoot;
            return Ok(IterationResult::converged(root));
        }

        self.ctl.begin_step(self.last)?;

        let mid = midpoint(self.lower, self.upper);
        let fm  = self.ctl.evaluate(&mut self.func, mid)?;
        self.last = mid;

        // bisection tests the function value against `residual`
        if fm.abs() < self.ctl.residual() {
            return Ok(IterationResult::converged(mid));
        }

        // shrink interval
        if opposite_sign(self.f_lower, fm) {
            self.upper = mid;
        } else {
            self.lower   = mid;
            self.f_lower = fm;
        }

        Ok(IterationResult::pending(mid))
    }

    /// Drains the sequence and reports the accepted root.
    pub fn solve(mut self) -> Result<RootFindingReport, BisectionError> {
        let accepted = drain(&mut self, ALGORITHM)?;
        Ok(RootFindingReport {
            root                : accepted.value,
            iterations          : self.ctl.iterations(),
            evaluations         : self.ctl.evaluations(),
            tolerance_satisfied : self.satisfied,
            stencil             : Stencil::Bracket { bounds: [self.lower, self.upper] },
            algorithm_name      : ALGORITHM.algorithm_name(),
        })
    }
}

impl<F: Evaluable> Iterator for Bisection<F> {
    type Item = Result<IterationResult, BisectionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ctl.is_finished() {
            return None;
        }
        let step = self.step();
        Some(self.ctl.settle(step))
    }
}
impl<F: Evaluable> FusedIterator for Bisection<F> {}
