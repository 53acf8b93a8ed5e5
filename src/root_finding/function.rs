//! Capability traits for the functions handed to a search.
//!
//! - [`Evaluable`]      : `x -> f(x)`, implemented for every `FnMut(f64) -> f64`
//! - [`Differentiable`] : adds `x -> f'(x)`, required by Newton-Raphson
//!
//! [`WithDerivative`] pairs two closures into a [`Differentiable`].

/// A real-valued scalar function.
pub trait Evaluable {
    fn eval(&mut self, x: f64) -> f64;
}

impl<F> Evaluable for F
where F: FnMut(f64) -> f64 {
    #[inline]
    fn eval(&mut self, x: f64) -> f64 {
        self(x)
    }
}

/// A real-valued scalar function with a known first derivative.
pub trait Differentiable: Evaluable {
    fn derivative(&mut self, x: f64) -> f64;
}

/// Function `f` together with its derivative `df`.
#[derive(Debug, Clone, Copy)]
pub struct WithDerivative<F, G> {
    f:  F,
    df: G,
}

impl<F, G> WithDerivative<F, G>
where
    F: FnMut(f64) -> f64,
    G: FnMut(f64) -> f64
{
    pub fn new(f: F, df: G) -> Self {
        Self { f, df }
    }
}

impl<F, G> Evaluable for WithDerivative<F, G>
where
    F: FnMut(f64) -> f64,
    G: FnMut(f64) -> f64
{
    #[inline]
    fn eval(&mut self, x: f64) -> f64 {
        (self.f)(x)
    }
}

impl<F, G> Differentiable for WithDerivative<F, G>
where
    F: FnMut(f64) -> f64,
    G: FnMut(f64) -> f64
{
    #[inline]
    fn derivative(&mut self, x: f64) -> f64 {
        (self.df)(x)
    }
}
