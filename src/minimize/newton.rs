use crate::error::MinimizerError;
use crate::linalg::matrix_inverse;
use crate::minimize::{
    find_step_size, validate_start, Minimizer, ObjHessFn, OptimizeResult, Options, Progress,
    SearchDirection,
};
use ndarray::prelude::*;

/// Newton's method with an inexact line search
///
/// Each iteration inverts the exact Hessian at the current point and
/// searches along `-H⁻¹·∇f(x)`. The step size may come out negative when
/// the Hessian is indefinite and the Newton direction points uphill.
#[derive(Clone)]
pub struct Newton {
    f: Box<dyn ObjHessFn>,
}

impl Newton {
    pub fn new<F>(f: F) -> Self
    where
        F: ObjHessFn + Clone + 'static,
    {
        Newton { f: Box::new(f) }
    }

    pub fn new_boxed(f: Box<dyn ObjHessFn>) -> Self {
        Newton { f }
    }

    /// Direction matrix `H⁻¹` at `x`
    pub fn direction_matrix(
        &self,
        x: &Array1<f64>,
        singular_tol: f64,
        iteration: usize,
    ) -> Result<Array2<f64>, MinimizerError> {
        let n = x.len();
        let hessian = self.f.hessian(x);
        if hessian.dim() != (n, n) {
            return Err(MinimizerError::HessianEvaluationError(format!(
                "Hessian is {:?}, expected ({}, {})",
                hessian.dim(),
                n,
                n
            )));
        }
        if hessian.iter().any(|v| !v.is_finite()) {
            return Err(MinimizerError::HessianEvaluationError(
                "Hessian is not finite".to_string(),
            ));
        }

        matrix_inverse(&hessian.view(), singular_tol)
            .map_err(|source| MinimizerError::SingularDirection { iteration, source })
    }
}

impl Minimizer for Newton {
    fn minimize(
        &self,
        x0: &Array1<f64>,
        options: &Options,
    ) -> Result<OptimizeResult, MinimizerError> {
        validate_start(x0, options)?;

        let mut x = x0.clone();
        let mut f_current = self.f.evaluate(&x);
        if !f_current.is_finite() {
            return Err(MinimizerError::FunctionEvaluationError);
        }

        let mut progress = Progress::new(&x);
        let mut function_evaluations = 1;
        let mut gradient_evaluations = 0;
        let mut hessian_evaluations = 0;

        while progress.running(options.max_iter) {
            let d = self.direction_matrix(&x, options.singular_tol, progress.iterations + 1)?;
            hessian_evaluations += 1;

            // The search forms -D·∇f(x) itself
            let line = find_step_size(
                &x,
                self.f.as_ref(),
                SearchDirection::Matrix(&d),
                &options.line_search,
            )?;
            gradient_evaluations += 1;
            function_evaluations += line.evaluations;

            x.scaled_add(line.alpha, &line.step);
            f_current = line.f_alpha;
            progress.step(self.name(), &x, line.alpha, line.f_alpha, options.eps);
        }
        progress.finish(options.max_iter);

        Ok(OptimizeResult {
            x_min: x,
            f_min: f_current,
            trajectory: progress.trajectory,
            iterations: progress.iterations,
            converged: progress.converged,
            function_evaluations,
            gradient_evaluations,
            hessian_evaluations,
            skipped_updates: 0,
            final_inverse_hessian: None,
            method_used: self.name().to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "Newton"
    }
}
