use crate::error::MinimizerError;
use crate::linalg::distance;
use ndarray::prelude::*;
use tracing::{debug, info};

pub mod bracket;
pub mod line_search;
pub mod newton;
pub mod objective;
pub mod options;
pub mod quasi_newton;

pub use self::bracket::Bracket;
pub use self::line_search::{find_step_size, LineFn, LineSearchResult, SearchDirection};
pub use self::newton::Newton;
pub use self::objective::{
    MultiDimFn, MultiDimGradFn, MultiDimHessFn, MultiDimNumGradFn, ObjFn, ObjGradFn, ObjHessFn,
};
pub use self::options::{BracketStrategy, CurvaturePolicy, LineSearchOptions, Options};
pub use self::quasi_newton::{Bfgs, BfgsState, UpdateOutcome};

/// Result of a descent run
#[derive(Debug, Clone)]
pub struct OptimizeResult {
    pub x_min: Array1<f64>,
    pub f_min: f64,
    /// Every point visited, starting with `x0` and ending with `x_min`.
    pub trajectory: Vec<Array1<f64>>,
    pub iterations: usize,
    pub converged: bool,
    pub function_evaluations: usize,
    pub gradient_evaluations: usize,
    pub hessian_evaluations: usize,
    /// BFGS updates skipped or reset by the curvature check.
    pub skipped_updates: usize,
    pub final_inverse_hessian: Option<Array2<f64>>,
    pub method_used: String,
}

impl OptimizeResult {
    /// Stopped on the iteration cap rather than on the step-length test
    pub fn hit_iteration_limit(&self) -> bool {
        !self.converged
    }

    /// Objective value at each trajectory point
    pub fn objective_history(&self, f: &dyn ObjFn) -> Vec<f64> {
        self.trajectory.iter().map(|x| f.evaluate(x)).collect()
    }
}

pub trait Minimizer {
    /// Run the method from `x0`. No state is kept between calls.
    fn minimize(
        &self,
        x0: &Array1<f64>,
        options: &Options,
    ) -> Result<OptimizeResult, MinimizerError>;

    fn name(&self) -> &'static str;
}

/// Trajectory and stopping state of a descent loop
pub(crate) struct Progress {
    pub trajectory: Vec<Array1<f64>>,
    pub iterations: usize,
    pub converged: bool,
}

impl Progress {
    pub fn new(x0: &Array1<f64>) -> Self {
        Progress {
            trajectory: vec![x0.clone()],
            iterations: 0,
            converged: false,
        }
    }

    /// True while neither the step-length test nor the iteration cap has fired
    pub fn running(&self, max_iter: usize) -> bool {
        !self.converged && self.iterations < max_iter
    }

    /// Record an accepted step and apply the step-length test
    pub fn step(
        &mut self,
        method: &'static str,
        x_new: &Array1<f64>,
        alpha: f64,
        f: f64,
        eps: f64,
    ) {
        let x = &self.trajectory[self.trajectory.len() - 1];
        let step_length = distance(&x_new.view(), &x.view());
        self.iterations += 1;
        debug!(
            method,
            iteration = self.iterations,
            alpha,
            step_length,
            f,
            "descent step"
        );
        self.trajectory.push(x_new.clone());
        self.converged = step_length < eps;
    }

    pub fn finish(&self, max_iter: usize) {
        if !self.converged {
            info!(max_iter, "Max iter limit reached, returning last point");
        }
    }
}

/// Shared checks on the starting point and options
pub(crate) fn validate_start(x0: &Array1<f64>, options: &Options) -> Result<(), MinimizerError> {
    if x0.is_empty() {
        return Err(MinimizerError::InvalidDimension);
    }
    if x0.iter().any(|v| !v.is_finite()) {
        return Err(MinimizerError::InvalidParameters(
            "starting point must be finite".to_string(),
        ));
    }
    options.validate()
}

/// Evaluate the gradient and check its length
pub(crate) fn checked_gradient<F: ObjGradFn + ?Sized>(
    f: &F,
    x: &Array1<f64>,
) -> Result<Array1<f64>, MinimizerError> {
    let g = f.gradient(x);
    if g.len() != x.len() {
        return Err(MinimizerError::GradientEvaluationError(format!(
            "gradient has length {}, expected {}",
            g.len(),
            x.len()
        )));
    }
    if g.iter().any(|v| !v.is_finite()) {
        return Err(MinimizerError::GradientEvaluationError(
            "gradient is not finite".to_string(),
        ));
    }
    Ok(g)
}
