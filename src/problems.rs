//! Standard test objectives with analytic gradients and Hessians

use crate::error::MinimizerError;
use crate::minimize::{ObjFn, ObjGradFn, ObjHessFn};
use ndarray::prelude::*;

/// Rosenbrock's valley `f(x, y) = b(y - x²)² + (a - x)²`
///
/// Global minimum at `(a, a²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rosenbrock {
    pub a: f64,
    pub b: f64,
}

impl Rosenbrock {
    pub fn new(a: f64, b: f64) -> Self {
        Rosenbrock { a, b }
    }

    pub fn minimizer(&self) -> Array1<f64> {
        array![self.a, self.a * self.a]
    }
}

impl Default for Rosenbrock {
    fn default() -> Self {
        Rosenbrock { a: 1.0, b: 100.0 }
    }
}

impl ObjFn for Rosenbrock {
    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        self.b * (x[1] - x[0].powi(2)).powi(2) + (self.a - x[0]).powi(2)
    }
}

impl ObjGradFn for Rosenbrock {
    fn gradient(&self, x: &Array1<f64>) -> Array1<f64> {
        let r = x[1] - x[0].powi(2);
        array![
            -4.0 * self.b * x[0] * r - 2.0 * (self.a - x[0]),
            2.0 * self.b * r
        ]
    }
}

impl ObjHessFn for Rosenbrock {
    fn hessian(&self, x: &Array1<f64>) -> Array2<f64> {
        let off = -4.0 * self.b * x[0];
        array![
            [
                12.0 * self.b * x[0].powi(2) - 4.0 * self.b * x[1] + 2.0,
                off
            ],
            [off, 2.0 * self.b]
        ]
    }
}

/// `f(x) = Σ xᵢ⁴`, minimum at the origin where the Hessian vanishes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuarticSum;

impl ObjFn for QuarticSum {
    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        x.iter().map(|v| v.powi(4)).sum()
    }
}

impl ObjGradFn for QuarticSum {
    fn gradient(&self, x: &Array1<f64>) -> Array1<f64> {
        x.mapv(|v| 4.0 * v.powi(3))
    }
}

impl ObjHessFn for QuarticSum {
    fn hessian(&self, x: &Array1<f64>) -> Array2<f64> {
        Array2::from_diag(&x.mapv(|v| 12.0 * v * v))
    }
}

/// Quadratic form `f(x) = xᵀAx`
///
/// `A` need not be symmetric; the gradient is `(A + Aᵀ)x`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticForm {
    a: Array2<f64>,
}

impl QuadraticForm {
    pub fn new(a: Array2<f64>) -> Result<Self, MinimizerError> {
        let (rows, cols) = a.dim();
        if rows != cols {
            return Err(MinimizerError::InvalidParameters(format!(
                "quadratic form needs a square matrix, got ({}, {})",
                rows, cols
            )));
        }
        if rows == 0 {
            return Err(MinimizerError::InvalidDimension);
        }
        Ok(QuadraticForm { a })
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.a
    }

    fn symmetric_part(&self) -> Array2<f64> {
        &self.a + &self.a.t()
    }
}

impl ObjFn for QuadraticForm {
    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        x.dot(&self.a.dot(x))
    }
}

impl ObjGradFn for QuadraticForm {
    fn gradient(&self, x: &Array1<f64>) -> Array1<f64> {
        self.symmetric_part().dot(x)
    }
}

impl ObjHessFn for QuadraticForm {
    fn hessian(&self, _x: &Array1<f64>) -> Array2<f64> {
        self.symmetric_part()
    }
}
