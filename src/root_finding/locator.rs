//! Coarse root location by uniform scanning.
//!
//! [`locate_roots`] partitions `[lower, upper]` into equal cells and reports
//! a [`RootCandidate`] wherever
//! ├ the ordinate strictly changes sign across a cell,
//! ├ a grid ordinate is exactly zero, or
//! └ an interior ordinate is below `function_residual` and the slope
//!   changes sign around it (a near-tangent touch such as a double root).
//!
//! A zero ordinate is not a sign change, so a root sitting on a grid point
//! is reported once, as [`CandidateKind::ExactZero`].
//!
//! Candidates are meant as brackets or seeds for the iterative searches.

use std::fmt;
use std::iter::FusedIterator;

use super::cancel::CancellationToken;
use super::errors::{ErrorKind, RootFindingError, ToleranceError};
use super::function::Evaluable;
use super::signs::{opposite_sign, strict_sign_change};
use thiserror::Error;


pub const DEFAULT_SUB_INTERVALS     : usize = 100;
pub const DEFAULT_LOCATOR_RESIDUAL  : f64   = 1e-2;


#[derive(Debug, Error)]
pub enum LocatorError {
    #[error(transparent)]
    RootFinding(#[from] RootFindingError),

    #[error(transparent)]
    Tolerance(#[from] ToleranceError),

    #[error("no function supplied to scan")]
    MissingFunction,

    #[error("invalid bounds: lower and upper must be finite with lower < upper. got [{lower}, {upper}]")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("invalid sub-interval count: must be >= 1. got {got}")]
    InvalidSubIntervals { got: usize },
}
impl LocatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LocatorError::RootFinding(e) => e.kind(),
            LocatorError::Tolerance(e)   => e.kind(),
            LocatorError::MissingFunction
            | LocatorError::InvalidBounds { .. }
            | LocatorError::InvalidSubIntervals { .. } => ErrorKind::InvalidArgument,
        }
    }
}


/// Locator configuration
///
/// - `sub_intervals`     : number of equal cells, default 100
/// - `function_residual` : ordinate threshold of the near-tangent test, default 1e-2
/// - `cancel`            : optional token, checked once per cell
#[derive(Debug, Clone)]
pub struct LocatorCfg {
    sub_intervals:     usize,
    function_residual: f64,
    cancel:            Option<CancellationToken>,
}
impl LocatorCfg {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sub_intervals     : DEFAULT_SUB_INTERVALS,
            function_residual : DEFAULT_LOCATOR_RESIDUAL,
            cancel            : None,
        }
    }

    pub fn sub_intervals(&self)     -> usize { self.sub_intervals }
    pub fn function_residual(&self) -> f64 { self.function_residual }

    pub fn set_sub_intervals(mut self, v: usize) -> Result<Self, LocatorError> {
        if v == 0 {
            return Err(LocatorError::InvalidSubIntervals { got: v });
        }
        self.sub_intervals = v;
        Ok(self)
    }
    pub fn set_function_residual(mut self, v: f64) -> Result<Self, ToleranceError> {
        if !v.is_finite() || v <= 0.0 {
            return Err(ToleranceError::InvalidFunctionResidual { got: v });
        }
        self.function_residual = v;
        Ok(self)
    }
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}
impl Default for LocatorCfg {
    fn default() -> Self { Self::new() }
}


/// How a candidate was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// `f` changes sign across the cell
    SignChange,
    /// small `|f|` at a local extremum of the sampled ordinates
    NearTangent,
    /// `f` is exactly zero at a grid point
    ExactZero,
}

/// Approximate root reported by the scan.
///
/// - `index`    : 1-based position in the candidate sequence
/// - `abscissa` : cell midpoint (sign change) or grid point (otherwise)
/// - `bracket`  : sub-interval enclosing the candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootCandidate {
    pub index:    usize,
    pub abscissa: f64,
    pub bracket:  [f64; 2],
    pub kind:     CandidateKind,
}


/// Lazy scan returned by [`locate_roots`] and [`RootLocator::scan`].
///
/// Holds a sliding window of three consecutive samples; `f` is evaluated
/// at each grid point exactly once, as the scan reaches it.
#[derive(Clone)]
pub struct RootScan<F> {
    func:   F,
    lower:  f64,
    upper:  f64,
    cells:  usize,
    thresh: f64,
    cancel: Option<CancellationToken>,

    // samples at i - 1 and i; `ahead` caches f(x_{i+1})
    started:     bool,
    boundary:    usize,
    prev:        f64,
    curr:        f64,
    ahead:       Option<f64>,
    found:       usize,
    evaluations: usize,
    finished:    bool,
}

impl<F> fmt::Debug for RootScan<F> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        out.debug_struct("RootScan")
            .field("boundary", &self.boundary)
            .field("cells", &self.cells)
            .field("found", &self.found)
            .finish_non_exhaustive()
    }
}

/// Scans `[lower, upper]` for approximate roots of `func`.
///
/// # Arguments
/// ┌ `func`  - function to scan
/// ├ `lower` - left end, finite and `< upper`
/// ├ `upper` - right end, finite
/// └ `cfg`   - [`LocatorCfg`] (sub-intervals, near-tangent residual)
///
/// # Returns
/// A [`RootScan`] iterator of [`RootCandidate`]s in increasing abscissa.
///
/// # Errors
/// - [`LocatorError::InvalidBounds`] returned immediately
/// - the iterator yields `NonFiniteEvaluation` or `Cancelled` and stops
pub fn locate_roots<F>(
    func: F,
    lower: f64,
    upper: f64,
    cfg: LocatorCfg
) -> Result<RootScan<F>, LocatorError>
where F: FnMut(f64) -> f64 {
    RootScan::new(func, lower, upper, cfg)
}


/// Builder over [`locate_roots`] that accepts the function last.
///
/// Scanning a locator without a function fails with
/// [`LocatorError::MissingFunction`].
#[derive(Clone)]
pub struct RootLocator<F> {
    func:  Option<F>,
    lower: f64,
    upper: f64,
    cfg:   LocatorCfg,
}

impl<F> fmt::Debug for RootLocator<F> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        out.debug_struct("RootLocator")
            .field("bounds", &[self.lower, self.upper])
            .field("has_function", &self.func.is_some())
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}
impl<F> RootLocator<F>
where F: FnMut(f64) -> f64 {
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { func: None, lower, upper, cfg: LocatorCfg::new() }
    }
    #[must_use]
    pub fn with_function(mut self, func: F) -> Self {
        self.func = Some(func);
        self
    }
    #[must_use]
    pub fn with_cfg(mut self, cfg: LocatorCfg) -> Self {
        self.cfg = cfg;
        self
    }
    pub fn scan(self) -> Result<RootScan<F>, LocatorError> {
        let func = self.func.ok_or(LocatorError::MissingFunction)?;
        RootScan::new(func, self.lower, self.upper, self.cfg)
    }
}


impl<F: Evaluable> RootScan<F> {
    fn new(func: F, lower: f64, upper: f64, cfg: LocatorCfg) -> Result<Self, LocatorError> {
        if !(lower.is_finite() && upper.is_finite()) || lower >= upper {
            return Err(LocatorError::InvalidBounds { lower, upper });
        }
        if cfg.sub_intervals == 0 {
            return Err(LocatorError::InvalidSubIntervals { got: cfg.sub_intervals });
        }
        if !cfg.function_residual.is_finite() || cfg.function_residual <= 0.0 {
            return Err(ToleranceError::InvalidFunctionResidual { got: cfg.function_residual }.into());
        }

        let cells = cfg.sub_intervals;
        log::debug!("locate_roots: [{lower}, {upper}] in {cells} cells");

        Ok(Self {
            func,
            lower,
            upper,
            cells,
            thresh      : cfg.function_residual,
            cancel      : cfg.cancel,
            started     : false,
            boundary    : 0,
            prev        : f64::NAN,
            curr        : f64::NAN,
            ahead       : None,
            found       : 0,
            evaluations : 0,
            finished    : false,
        })
    }

    pub fn evaluations(&self) -> usize { self.evaluations }

    /// Grid point `i` as a convex combination of the bounds, so spans wider
    /// than `f64::MAX` stay finite. `i == cells` lands exactly on `upper`.
    #[inline]
    fn abscissa(&self, i: usize) -> f64 {
        let t = i as f64 / self.cells as f64;
        self.lower - t * self.lower + t * self.upper
    }

    fn sample(&mut self, i: usize) -> Result<f64, LocatorError> {
        let x = self.abscissa(i);
        self.evaluations += 1;
        let fx = self.func.eval(x);
        if !fx.is_finite() {
            return Err(RootFindingError::NonFiniteEvaluation { x, fx }.into());
        }
        Ok(fx)
    }

    /// Advances until the next candidate or the end of the grid.
    fn advance(&mut self) -> Result<Option<RootCandidate>, LocatorError> {
        if !self.started {
            self.started = true;
            self.curr = self.sample(0)?;
            if self.curr == 0.0 {
                let (x0, x1) = (self.abscissa(0), self.abscissa(1));
                return Ok(Some(self.candidate(x0, [x0, x1], CandidateKind::ExactZero)));
            }
        }

        while self.boundary < self.cells {
            if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                return Err(RootFindingError::Cancelled { iteration: self.boundary + 1 }.into());
            }

            let i = self.boundary + 1;
            self.prev = self.curr;
            self.curr = match self.ahead.take() {
                Some(fx) => fx,
                None     => self.sample(i)?,
            };
            self.boundary = i;

            let (x_prev, x_curr) = (self.abscissa(i - 1), self.abscissa(i));

            if strict_sign_change(self.prev, self.curr) {
                return Ok(Some(self.candidate(
                    0.5 * x_prev + 0.5 * x_curr, [x_prev, x_curr], CandidateKind::SignChange
                )));
            }
            if self.curr == 0.0 {
                let x_next = self.abscissa((i + 1).min(self.cells));
                return Ok(Some(self.candidate(
                    x_curr, [x_prev, x_next], CandidateKind::ExactZero
                )));
            }

            // near-tangent test needs the sample past an interior boundary
            if i < self.cells && self.curr.abs() < self.thresh {
                let next = self.sample(i + 1)?;
                self.ahead = Some(next);

                let back = self.curr - self.prev;
                let fore = next - self.curr;
                if opposite_sign(back, fore) {
                    return Ok(Some(self.candidate(
                        x_curr, [x_prev, self.abscissa(i + 1)], CandidateKind::NearTangent
                    )));
                }
            }
        }

        Ok(None)
    }

    fn candidate(&mut self, abscissa: f64, bracket: [f64; 2], kind: CandidateKind) -> RootCandidate {
        self.found += 1;
        log::trace!("locate_roots: candidate {} at {abscissa} ({kind:?})", self.found);
        RootCandidate { index: self.found, abscissa, bracket, kind }
    }
}

impl<F: Evaluable> Iterator for RootScan<F> {
    type Item = Result<RootCandidate, LocatorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Some(c)) => Some(Ok(c)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                log::debug!("locate_roots: stopped at boundary {}: {e}", self.boundary);
                Some(Err(e))
            }
        }
    }
}
impl<F: Evaluable> FusedIterator for RootScan<F> {}
