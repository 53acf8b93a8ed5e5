//! Sign tests on function values.
//!
//! `opposite_sign`/`same_sign` read the sign bit, so `-0.0` counts as
//! negative and `0.0` as positive. Exact zeros at bracket ends are handled
//! separately by [`check_endpoints`]; [`strict_sign_change`] ignores zeros.

#[inline]
pub(crate) fn opposite_sign(x: f64, y: f64) -> bool {
    x.is_sign_negative() ^ y.is_sign_negative()
}

#[inline]
pub(crate) fn same_sign(x: f64, y: f64) -> bool {
    !opposite_sign(x, y)
}

/// One value strictly negative, the other strictly positive. Zeros of
/// either sign never count.
#[inline]
pub(crate) fn strict_sign_change(x: f64, y: f64) -> bool {
    (x < 0.0 && y > 0.0) || (x > 0.0 && y < 0.0)
}


/// What the end values of a candidate bracket say about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum EndpointCheck {
    /// an end evaluates to exactly zero; `a` wins a tie
    Root(f64),
    SignChange,
    NoSignChange,
}

pub(crate) fn check_endpoints((a, fa): (f64, f64), (b, fb): (f64, f64)) -> EndpointCheck {
    if fa == 0.0 {
        EndpointCheck::Root(a)
    } else if fb == 0.0 {
        EndpointCheck::Root(b)
    } else if opposite_sign(fa, fb) {
        EndpointCheck::SignChange
    } else {
        EndpointCheck::NoSignChange
    }
}
