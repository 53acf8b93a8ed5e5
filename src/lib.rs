//! Iterative root-finding for scalar real functions.
//!
//! [`root_finding`] : bracketing, open and interpolating searches streamed
//!                    one iteration at a time, plus a fixed-point
//!                    convergence classifier and a coarse root locator.
//! [`interpolation`]: Newton divided-difference tables.

pub mod interpolation;
pub mod root_finding;
