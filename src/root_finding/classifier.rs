//! Fixed-point convergence classification.
//!
//! [`classify`] iterates `x_{n+1} = g(x_n)` and estimates the local slope
//! `(g(x_n) - g(x_{n-1})) / (x_n - x_{n-1})` from the last two steps. A
//! slope magnitude above 1 marks the iteration as locally diverging.
//!
//! By default the iteration always runs `max_iter + 1` steps and never
//! exits on `tolerance`; [`ClassifierCfg::with_early_exit`] enables a
//! tolerance-driven stop using the configured error mode.

use super::algorithms::Algorithm;
use super::config::{CommonCfg, impl_common_cfg};
use super::controller::IterationController;
use super::errors::{ErrorKind, RootFindingError, ToleranceError};
use thiserror::Error;

pub const DEFAULT_CLASSIFIER_MAX_ITER: usize = 200;


/// Local behaviour of a fixed-point iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceClass {
    Converging,
    Diverging,
}


#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error(transparent)]
    RootFinding(#[from] RootFindingError),

    #[error(transparent)]
    Tolerance(#[from] ToleranceError),

    #[error("invalid seed: x0={x0} must be finite")]
    InvalidSeed { x0: f64 },
}
impl ClassifierError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassifierError::RootFinding(e) => e.kind(),
            ClassifierError::Tolerance(e)   => e.kind(),
            ClassifierError::InvalidSeed { .. } => ErrorKind::InvalidArgument,
        }
    }
}


/// Classifier configuration.
///
/// - `common.residual` is the tolerance (default 1e-6)
/// - `common.max_iter` defaults to 200, error mode to relative
/// - `early_exit` (default `false`) stops once the step error drops
///   below tolerance
#[derive(Debug, Clone)]
pub struct ClassifierCfg {
    common:     CommonCfg,
    early_exit: bool,
}
impl ClassifierCfg {
    #[must_use]
    pub fn new() -> Self {
        Self { common: CommonCfg::new(), early_exit: false }
    }
    #[must_use]
    pub fn with_early_exit(mut self, v: bool) -> Self {
        self.early_exit = v;
        self
    }
    pub fn early_exit(&self) -> bool { self.early_exit }
}
impl Default for ClassifierCfg {
    fn default() -> Self { Self::new() }
}
impl_common_cfg!(ClassifierCfg);


/// Outcome of [`classify_with_report`].
///
/// - `iterations`  : steps taken, `max_iter + 1` unless stopped early
/// - `evaluations` : calls to `g`, including the priming call at `x0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub class:       SequenceClass,
    pub iterations:  usize,
    pub evaluations: usize,
}


/// Classifies the fixed-point iteration of `g` seeded at `x0`.
///
/// # Returns
/// ├ [`SequenceClass::Diverging`]  if `|slope| > 1` or an iterate became NaN/inf
/// └ [`SequenceClass::Converging`] otherwise, including an exact fixed point
///   (last step of zero length)
///
/// # Errors
/// ├ [`ClassifierError::InvalidSeed`] : `x0` is NaN/inf
/// └ `Cancelled` via [`ClassifierError::RootFinding`]
pub fn classify<G>(
    g: G,
    x0: f64,
    cfg: ClassifierCfg
) -> Result<SequenceClass, ClassifierError>
where G: FnMut(f64) -> f64 {
    classify_with_report(g, x0, cfg).map(|c| c.class)
}

/// [`classify`], also reporting the step and evaluation counts.
pub fn classify_with_report<G>(
    mut g: G,
    x0: f64,
    cfg: ClassifierCfg
) -> Result<Classification, ClassifierError>
where G: FnMut(f64) -> f64 {

    if !x0.is_finite() {
        return Err(ClassifierError::InvalidSeed { x0 });
    }

    let max_iter = cfg.common.max_iter().unwrap_or(DEFAULT_CLASSIFIER_MAX_ITER);
    let mut ctl  = IterationController::new(Algorithm::FixedPoint, &cfg.common, max_iter.saturating_add(1))?;

    let report = |ctl: &IterationController, class| Classification {
        class,
        iterations:  ctl.iterations(),
        evaluations: ctl.evaluations(),
    };

    let mut previous = x0;
    let mut current  = x0;
    let mut next = match ctl.evaluate(&mut g, current) {
        Ok(v) => v,
        Err(RootFindingError::NonFiniteEvaluation { .. }) => {
            return Ok(report(&ctl, SequenceClass::Diverging));
        }
        Err(e) => return Err(e.into()),
    };

    while ctl.has_budget() {
        ctl.begin_step(current)?;
        previous = current;
        current  = next;
        next = match ctl.evaluate(&mut g, current) {
            Ok(v) => v,
            Err(RootFindingError::NonFiniteEvaluation { .. }) => {
                log::debug!("classify: iterate left the reals at step {}", ctl.iterations());
                return Ok(report(&ctl, SequenceClass::Diverging));
            }
            Err(e) => return Err(e.into()),
        };

        if cfg.early_exit && ctl.step_error(current, next) < ctl.residual() {
            break;
        }
    }

    let dx = current - previous;
    if dx == 0.0 {
        return Ok(report(&ctl, SequenceClass::Converging));
    }

    let slope = (next - current) / dx;
    log::debug!(
        "classify: slope {slope} after {} steps, {} evaluations",
        ctl.iterations(), ctl.evaluations()
    );

    if slope.abs() > 1.0 {
        Ok(report(&ctl, SequenceClass::Diverging))
    } else {
        Ok(report(&ctl, SequenceClass::Converging))
    }
}
