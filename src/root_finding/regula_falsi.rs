use std::fmt;
use std::iter::FusedIterator;

use super::algorithms::{Algorithm, BracketFamily};
use super::config::{CommonCfg, impl_common_cfg};
use super::controller::IterationController;
use super::errors::{ErrorKind, RootFindingError, ToleranceError};
use super::function::Evaluable;
use super::report::{drain, IterationResult, RootFindingReport, Stencil, ToleranceSatisfied};
use super::signs::{check_endpoints, same_sign, EndpointCheck};
use thiserror::Error;

const ALGORITHM: Algorithm = Algorithm::Bracket(BracketFamily::RegulaFalsi);

#[derive(Debug, Error)]
pub enum RegulaFalsiError {
    #[error(transparent)]
    RootFinding(#[from] RootFindingError),

    #[error(transparent)]
    Tolerance(#[from] ToleranceError),

    #[error("no sign change on [{a}, {b}]: f(a) * f(b) > 0")]
    NoSignChange  { a: f64, b: f64 },

    #[error("invalid bounds: a and b must be finite with a < b. got [{a}, {b}]")]
    InvalidBounds { a: f64, b: f64 },

    #[error("denominator fb - fa vanished in false-position step: fa={fa}, fb={fb}")]
    DegenerateSecantStep { fa: f64, fb: f64 },
}
impl RegulaFalsiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegulaFalsiError::RootFinding(e) => e.kind(),
            RegulaFalsiError::Tolerance(e)   => e.kind(),
            RegulaFalsiError::NoSignChange { .. }
            | RegulaFalsiError::InvalidBounds { .. }       => ErrorKind::InvalidArgument,
            RegulaFalsiError::DegenerateSecantStep { .. } => ErrorKind::DivisionByZero,
        }
    }
}

/// RegulaFalsi Configuration
///
/// # Fields
/// - `common` : [`CommonCfg`] with `residual` (step), `function_residual`,
///   optional `max_iter` (default 200) and error mode (default absolute).
#[derive(Debug, Clone)]
pub struct RegulaFalsiCfg {
    common: CommonCfg,
}
impl RegulaFalsiCfg {
    #[must_use]
    pub fn new() -> Self {
        Self { common: CommonCfg::new() }
    }
}
impl Default for RegulaFalsiCfg {
    fn default() -> Self { Self::new() }
}
impl_common_cfg!(RegulaFalsiCfg);


/// Calculates the false-position point for the line
/// connecting `(a, fa)` and `(b, fb)`
///
/// `b - fb * (b - a) / (fb - fa)`
///
/// # Returns
/// ├ `Ok(x)` if `fb - fa` is non-zero
/// └ `Err(DegenerateSecantStep)` otherwise
#[inline]
fn false_position(
    (a, fa): (f64, f64),
    (b, fb): (f64, f64),
) -> Result<f64, RegulaFalsiError> {
    let denom = fb - fa;
    if denom == 0.0 {
        return Err(RegulaFalsiError::DegenerateSecantStep { fa, fb });
    }
    // fraction of the bracket to step back from b, t in [0, 1]
    let t = if denom.is_finite() {
        fb / denom
    } else {
        (0.5 * fb) / (0.5 * fb - 0.5 * fa)
    };
    let width = b - a;
    if width.is_finite() {
        Ok(b - t * width)
    } else {
        Ok(b - t * b + t * a)
    }
}


/// Lazy false-position sequence returned by [`regula_falsi`].
#[derive(Clone)]
pub struct RegulaFalsi<F> {
    func:      F,
    ctl:       IterationController,
    lower:     f64,
    upper:     f64,
    f_lower:   f64,
    f_upper:   f64,
    previous:  Option<f64>,
    exact:     Option<f64>,
    satisfied: ToleranceSatisfied,
}

impl<F> fmt::Debug for RegulaFalsi<F> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        out.debug_struct("RegulaFalsi")
            .field("bracket", &[self.lower, self.upper])
            .field("previous", &self.previous)
            .field("ctl", &self.ctl)
            .finish_non_exhaustive()
    }
}

/// Finds a root of a function using the ancient
/// [regula falsi method](https://en.wikipedia.org/wiki/Regula_falsi).
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
/// └ `cfg`  - [`RegulaFalsiCfg`]
///    Defaults:
///    ├ residual          = 1e-6
///    ├ function_residual = 1e-6
///    └ max_iter          = 200
///
/// # Behavior
///
/// Each step computes `x = b - f(b)(b - a) / (f(b) - f(a))`, evaluates
/// `f(x)` and replaces the bound whose value shares the sign of `f(x)`.
/// A step is accepted when both the distance to the previous false
/// position is below `residual` and `|f(x)| < function_residual`.
///
/// # Errors
///
/// Returned immediately:
/// ┌ [`RegulaFalsiError::InvalidBounds`] - `a` or `b` is NaN/inf or if `a >= b`.
/// ├ [`RegulaFalsiError::NoSignChange`]  - `func(a)` and `func(b)` share a sign.
/// └ `NonFiniteEvaluation` on an endpoint.
///
/// Yielded by the iterator:
/// ┌ [`RegulaFalsiError::DegenerateSecantStep`] - `f(b) == f(a)`
/// ├ `NonFiniteEvaluation` - e.g. the false position hits a pole
/// ├ `NonConvergence`      - budget exhausted
/// └ `Cancelled`
pub fn regula_falsi<F>(
    mut func: F,
    a: f64,
    b: f64,
    cfg: RegulaFalsiCfg
) -> Result<RegulaFalsi<F>, RegulaFalsiError>
where F: FnMut(f64) -> f64 {

    if !(a.is_finite() && b.is_finite()) || a >= b {
        return Err(RegulaFalsiError::InvalidBounds { a, b });
    }

    let max_iter = cfg.common.max_iter()
        .or(ALGORITHM.default_max_iter())
        .unwrap_or(super::algorithms::DEFAULT_MAX_ITER);
    let mut ctl = IterationController::new(ALGORITHM, &cfg.common, max_iter)?;

    let fa = ctl.evaluate(&mut func, a)?;
    let fb = ctl.evaluate(&mut func, b)?;

    let exact = match check_endpoints((a, fa), (b, fb)) {
        EndpointCheck::Root(x)      => Some(x),
        EndpointCheck::SignChange   => None,
        EndpointCheck::NoSignChange => return Err(RegulaFalsiError::NoSignChange { a, b }),
    };

    log::debug!("regula_falsi: bracket [{a}, {b}], budget {max_iter}");

    Ok(RegulaFalsi {
        func,
        ctl,
        lower     : a,
        upper     : b,
        f_lower   : fa,
        f_upper   : fb,
        previous  : None,
        exact,
        satisfied : ToleranceSatisfied::StepAndFunction,
    })
}

impl<F: Evaluable> RegulaFalsi<F> {
    pub fn iterations(&self)  -> usize { self.ctl.iterations() }
    pub fn evaluations(&self) -> usize { self.ctl.evaluations() }
    pub fn bracket(&self)     -> [f64; 2] { [self.lower, self.upper] }

    fn step(&mut self) -> Result<IterationResult, RegulaFalsiError> {
        if let Some(root) = self.exact.take() {
            self.satisfied = ToleranceSatisfied::ExactRoot;
            return Ok(IterationResult::converged(root));
        }

        let last = self.previous.unwrap_or(self.upper);
        self.ctl.begin_step(last)?;

        let x  = false_position((self.lower, self.f_lower), (self.upper, self.f_upper))?;
        let fx = self.ctl.evaluate(&mut self.func, x)?;

        if fx == 0.0 {
            self.satisfied = ToleranceSatisfied::ExactRoot;
            self.previous  = Some(x);
            return Ok(IterationResult::converged(x));
        }

        let replaces_lower = same_sign(fx, self.f_lower);
        // first step is measured against the bound it replaces
        let from = self.previous.unwrap_or(if replaces_lower { self.lower } else { self.upper });
        self.previous = Some(x);
        if self.ctl.step_converged(from, x) && self.ctl.residual_converged(fx) {
            return Ok(IterationResult::converged(x));
        }

        if replaces_lower {
            self.lower   = x;
            self.f_lower = fx;
        } else {
            self.upper   = x;
            self.f_upper = fx;
        }

        Ok(IterationResult::pending(x))
    }

    /// Drains the sequence and reports the accepted root.
    pub fn solve(mut self) -> Result<RootFindingReport, RegulaFalsiError> {
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

impl<F: Evaluable> Iterator for RegulaFalsi<F> {
    type Item = Result<IterationResult, RegulaFalsiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ctl.is_finished() {
            return None;
        }
        let step = self.step();
        Some(self.ctl.settle(step))
    }
}
impl<F: Evaluable> FusedIterator for RegulaFalsi<F> {}
