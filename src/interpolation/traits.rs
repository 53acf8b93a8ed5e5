use crate::interpolation::errors::InterpolationError;

/// An interpolant built over a fixed set of nodes.
pub trait Interpolator {
    /// Abscissas the interpolant was built from.
    fn nodes(&self) -> &[f64];

    /// Evaluates the interpolant at `x`.
    fn eval(&self, x: f64) -> Result<f64, InterpolationError>;

    /// Evaluates the interpolant at every point of `xs`, stopping at the
    /// first failure.
    #[inline]
    fn eval_many(&self, xs: &[f64]) -> Result<Vec<f64>, InterpolationError> {
        xs.iter().map(|&xq| self.eval(xq)).collect()
    }
}
