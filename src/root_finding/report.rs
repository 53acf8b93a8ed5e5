//! Defines the [`IterationResult`] items streamed by every search and
//! the [`RootFindingReport`] returned by `solve()`.

use super::algorithms::Algorithm;
use super::errors::RootFindingError;


/// One element of a search sequence: `(candidate, converged)`.
///
/// Emitted once per iteration; the last element of a successful
/// sequence carries `converged = true` and the accepted root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationResult {
    pub value:     f64,
    pub converged: bool,
}
impl IterationResult {
    #[inline]
    pub(crate) fn pending(value: f64) -> Self {
        Self { value, converged: false }
    }
    #[inline]
    pub(crate) fn converged(value: f64) -> Self {
        Self { value, converged: true }
    }
}
impl From<IterationResult> for (f64, bool) {
    fn from(r: IterationResult) -> Self {
        (r.value, r.converged)
    }
}


/// Which tolerance condition accepted the root.
/// - [`ToleranceSatisfied::ExactRoot`]        : an endpoint or iterate evaluated to exactly 0
/// - [`ToleranceSatisfied::FunctionResidual`] : `|f(x)| < function residual`
/// - [`ToleranceSatisfied::StepSize`]         : step error `< residual`
/// - [`ToleranceSatisfied::StepAndFunction`]  : both of the above
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceSatisfied {
    ExactRoot,
    FunctionResidual,
    StepSize,
    StepAndFunction,
}


/// Method-specific data returned by a solver.
/// Contains the last set of points used in the update formula.
/// - [`Stencil::Bracket`] : bracketing methods
///     - `bounds` of the final interval
/// - [`Stencil::Open`]    : open and interpolating methods
///     - `x` = last iterates used to compute the root
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Stencil {
    Bracket { bounds: [f64; 2] },
    Open    { x: [f64; 3], len: usize },
}
impl Stencil {
    pub fn stencil(&self) -> &[f64] {
        match self {
            Stencil::Bracket { bounds } => &bounds[..],
            Stencil::Open { x, len }    => &x[..*len],
        }
    }
    pub fn singleton(x: f64) -> Self {
        Stencil::Open { x: [x, 0.0, 0.0], len: 1 }
    }
    pub fn doubleton(x1: f64, x2: f64) -> Self {
        Stencil::Open { x: [x1, x2, 0.0], len: 2 }
    }
    pub fn tripleton(x1: f64, x2: f64, x3: f64) -> Self {
        Stencil::Open { x: [x1, x2, x3], len: 3 }
    }
}


/// Final report returned by `solve()` on every search.
///
/// [`RootFindingReport`]
/// - `root`                : accepted root estimate
/// - `iterations`          : total iterations
/// - `evaluations`         : total function (and derivative) evaluations
/// - `tolerance_satisfied` : which tolerance was met ([`ToleranceSatisfied`])
/// - `stencil`             : last set of points used in update formula
/// - `algorithm_name`      : algorithm name (e.g. `"bisection"`)
#[derive(Debug, Copy, Clone)]
pub struct RootFindingReport {
    pub root                : f64,
    pub iterations          : usize,
    pub evaluations         : usize,
    pub tolerance_satisfied : ToleranceSatisfied,
    pub stencil             : Stencil,
    pub algorithm_name      : &'static str,
}


/// Pulls `search` to completion and returns the accepted result.
///
/// # Errors
/// - the first error the search yields
/// - [`RootFindingError::Exhausted`] if the search had already finished
///   before this call
pub(crate) fn drain<I, E>(search: &mut I, algorithm: Algorithm) -> Result<IterationResult, E>
where
    I: Iterator<Item = Result<IterationResult, E>>,
    E: From<RootFindingError>,
{
    let mut last = None;
    for step in search {
        last = Some(step?);
    }
    last.filter(|r| r.converged)
        .ok_or_else(|| RootFindingError::Exhausted { algorithm }.into())
}
