//! Newton (Divided-Difference) Interpolation
//!
//! Builds the triangular
//! [divided-difference](https://en.wikipedia.org/wiki/Divided_differences)
//! table over `(abscissas, ordinates)` and evaluates the resulting Newton
//! polynomial with Horner's scheme.
//!
//! ```text
//! table[i][0] = y_i
//! table[i][j] = (table[i+1][j-1] - table[i][j-1]) / (x_{i+j} - x_i)
//! ```
//!
//! Row `i` holds `n - i` entries; the top row is the coefficient vector of
//! `P(x) = c_0 + c_1 (x - x_0) + ... + c_{n-1} (x - x_0)...(x - x_{n-2})`.


use crate::interpolation::errors::InterpolationError;
use crate::interpolation::traits::Interpolator;


/// Divided-difference table over pairwise-distinct abscissas.
#[derive(Debug, Clone, PartialEq)]
pub struct DividedDifferenceTable {
    x:     Vec<f64>,
    table: Vec<Vec<f64>>,
    x_min: f64,
    x_max: f64,
}


fn non_finite_idx(xs: &[f64]) -> Option<usize> {
    xs.iter().position(|x| !x.is_finite())
}


impl DividedDifferenceTable {
    /// Tabulates the divided differences of `(x, y)`.
    ///
    /// Abscissas need not be sorted, only distinct.
    ///
    /// # Errors
    /// - [`InterpolationError::EmptyInput`]    : no points
    /// - [`InterpolationError::UnequalLength`] : `x.len() != y.len()`
    /// - [`InterpolationError::NonFiniteVec`]  : NaN/inf in `x` or `y`
    /// - [`InterpolationError::DuplicateX`]    : `x_{i+j} == x_i` for some pair
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self, InterpolationError> {
        if x.is_empty() || y.is_empty() {
            return Err(InterpolationError::EmptyInput);
        }
        if x.len() != y.len() {
            return Err(InterpolationError::UnequalLength { x_len: x.len(), y_len: y.len() });
        }
        if let Some(idx) = non_finite_idx(x).or_else(|| non_finite_idx(y)) {
            return Err(InterpolationError::NonFiniteVec { idx });
        }

        let n = x.len();
        let mut table: Vec<Vec<f64>> = y.iter().map(|&yi| {
            let mut row = Vec::with_capacity(n);
            row.push(yi);
            row
        }).collect();

        for j in 1..n {
            for i in 0..n - j {
                let dx = x[i + j] - x[i];
                if dx == 0.0 {
                    return Err(InterpolationError::DuplicateX { x1: x[i], x2: x[i + j] });
                }
                let d = (table[i + 1][j - 1] - table[i][j - 1]) / dx;
                table[i].push(d);
            }
        }

        let x_min = x.iter().copied().fold(f64::INFINITY, f64::min);
        let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self { x: x.to_vec(), table, x_min, x_max })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize { self.x.len() }

    pub fn is_empty(&self) -> bool { self.x.is_empty() }

    /// Degree of the interpolating polynomial.
    pub fn degree(&self) -> usize { self.x.len() - 1 }

    /// `f[x_i, ..., x_{i+j}]`, or `None` outside the triangle.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.table.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Rows of the triangle; row `i` has `len() - i` entries.
    pub fn table(&self) -> &[Vec<f64>] { &self.table }

    /// Newton-form coefficients `f[x_0], f[x_0, x_1], ...`.
    pub fn coefficients(&self) -> &[f64] { &self.table[0] }
}

impl Interpolator for DividedDifferenceTable {
    fn nodes(&self) -> &[f64] { &self.x }

    /// Horner evaluation of the Newton form:
    ///
    /// ```text
    /// P(xq) = c[0] + (xq - x[0]) * [ c[1] + (xq - x[1]) * [ ... c[n-1] ... ] ]
    /// ```
    ///
    /// # Errors
    /// - [`InterpolationError::OutOfBounds`] if `xq` lies outside the node range.
    fn eval(&self, xq: f64) -> Result<f64, InterpolationError> {
        if !(self.x_min..=self.x_max).contains(&xq) {
            return Err(InterpolationError::OutOfBounds {
                got: xq,
                x_min: self.x_min,
                x_max: self.x_max,
            });
        }

        let c = self.coefficients();
        let n = c.len();
        let mut p = c[n - 1];
        for j in (0..n - 1).rev() {
            p = c[j] + (xq - self.x[j]) * p;
        }
        Ok(p)
    }
}
