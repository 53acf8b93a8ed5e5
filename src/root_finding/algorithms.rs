//! Root-finding algorithm definitions.
//!
//! Provides the [`Algorithm`] enum, which enumerates all supported methods,
//! along with the shared [`DEFAULT_MAX_ITER`] budget.

use super::controller::ErrorMode;


/// Iteration budget used by every method without a theoretical bound
/// when `max_iter` is unset in its config.
pub const DEFAULT_MAX_ITER: usize = 200;


/// Root-finding algorithm variants.
/// - [`Algorithm::Bracket`]       bracketing methods, need a sign change
/// - [`Algorithm::Open`]          open methods, need one or two seeds
/// - [`Algorithm::Interpolating`] higher-order fits through several seeds
/// - [`Algorithm::FixedPoint`]    fixed-point iteration `x = g(x)`, only classified
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Algorithm {
    Bracket(BracketFamily),
    Open(OpenFamily),
    Interpolating(InterpolatingFamily),
    FixedPoint,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BracketFamily {
    Bisection,
    RegulaFalsi,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OpenFamily {
    Secant,
    Newton
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InterpolatingFamily {
    Muller
}

impl Algorithm {
    /// Default iteration count if `max_iter` is unset in config.
    ///
    /// # Notes
    /// - Methods with a theoretical bound ([`BracketFamily::Bisection`])
    ///   return `None`, meaning "compute theoretical bound instead".
    pub const fn default_max_iter(self) -> Option<usize> {
        match self {
            Algorithm::Bracket(BracketFamily::Bisection) => None,
            _                                           => Some(DEFAULT_MAX_ITER),
        }
    }

    /// Error mode applied when the config leaves it unset.
    pub const fn default_error_mode(self) -> ErrorMode {
        match self {
            Algorithm::Interpolating(InterpolatingFamily::Muller)
            | Algorithm::FixedPoint                               => ErrorMode::Relative,
            _                                                     => ErrorMode::Absolute,
        }
    }

    /// Whether the method has a step-size criterion `mode` can normalize.
    ///
    /// Bisection accepts a midpoint on `|f(mid)|` alone, so only
    /// [`ErrorMode::Absolute`] is meaningful for it.
    pub const fn supports(self, mode: ErrorMode) -> bool {
        match (self, mode) {
            (Algorithm::Bracket(BracketFamily::Bisection), ErrorMode::Relative) => false,
            _                                                                  => true,
        }
    }

    pub const fn algorithm_name(self) -> &'static str {
        match self {
            Algorithm::Bracket(BracketFamily::Bisection)          => "bisection",
            Algorithm::Bracket(BracketFamily::RegulaFalsi)        => "regula_falsi",
            Algorithm::Open(OpenFamily::Secant)                   => "secant",
            Algorithm::Open(OpenFamily::Newton)                   => "newton",
            Algorithm::Interpolating(InterpolatingFamily::Muller) => "muller",
            Algorithm::FixedPoint                                 => "fixed_point",
        }
    }
}
impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.algorithm_name())
    }
}
