use crate::error::MinimizerError;
use crate::linalg::{norm, outer};
use crate::minimize::{
    checked_gradient, find_step_size, validate_start, CurvaturePolicy, Minimizer, ObjGradFn,
    OptimizeResult, Options, Progress, SearchDirection,
};
use ndarray::prelude::*;
use tracing::debug;

/// What happened to the inverse Hessian approximation after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    Skipped,
    Reset,
}

/// Iteration state of BFGS: current point, gradient there, and the
/// inverse Hessian approximation `D`
#[derive(Debug, Clone)]
pub struct BfgsState {
    pub x: Array1<f64>,
    pub g: Array1<f64>,
    pub h_inv: Array2<f64>,
}

impl BfgsState {
    /// Start with `D = I`
    pub fn new(x: Array1<f64>, g: Array1<f64>) -> Self {
        let n = x.len();
        BfgsState {
            x,
            g,
            h_inv: Array2::eye(n),
        }
    }

    /// Descent direction `-D·g`
    pub fn direction(&self) -> Array1<f64> {
        -self.h_inv.dot(&self.g)
    }

    /// Rank-two correction for displacement `p` and gradient change `q`
    ///
    /// With `r = qᵀDq` and `v = p/(pᵀq) - Dq/r`:
    ///
    /// `C = ppᵀ/(pᵀq) - Dq qᵀD/r + r·vvᵀ`
    ///
    /// `D + C` satisfies the secant equation `(D + C)·q = p`.
    pub fn correction(&self, p: &Array1<f64>, q: &Array1<f64>) -> Array2<f64> {
        let dq = self.h_inv.dot(q);
        let pq = p.dot(q);
        let r = q.dot(&dq);
        let v = p / pq - &dq / r;

        let mut c = outer(&p.view(), &p.view()) / pq;
        c -= &(outer(&dq.view(), &dq.view()) / r);
        c += &(outer(&v.view(), &v.view()) * r);
        c
    }

    /// Apply the correction when the curvature condition `pᵀq > 0` holds
    ///
    /// Otherwise the policy decides between keeping `D` and restarting from
    /// the identity.
    pub fn update(
        &mut self,
        p: &Array1<f64>,
        q: &Array1<f64>,
        policy: CurvaturePolicy,
    ) -> UpdateOutcome {
        let pq = p.dot(q);
        let r = q.dot(&self.h_inv.dot(q));
        let curvature_ok = pq > f64::EPSILON * norm(&p.view()) * norm(&q.view())
            && r > 0.0
            && pq.is_finite()
            && r.is_finite();

        if curvature_ok {
            let c = self.correction(p, q);
            self.h_inv += &c;
            return UpdateOutcome::Applied;
        }

        match policy {
            CurvaturePolicy::Skip => UpdateOutcome::Skipped,
            CurvaturePolicy::Reset => {
                self.h_inv = Array2::eye(self.x.len());
                UpdateOutcome::Reset
            }
        }
    }
}

/// BFGS quasi-Newton method with an inexact line search
///
/// The BFGS method builds up an approximation to the inverse Hessian matrix
/// using gradient information from successive iterations. Only the objective
/// and its gradient are needed.
#[derive(Clone)]
pub struct Bfgs {
    f: Box<dyn ObjGradFn>,
}

impl Bfgs {
    pub fn new<F>(f: F) -> Self
    where
        F: ObjGradFn + Clone + 'static,
    {
        Bfgs { f: Box::new(f) }
    }

    pub fn new_boxed(f: Box<dyn ObjGradFn>) -> Self {
        Bfgs { f }
    }
}

impl Minimizer for Bfgs {
    fn minimize(
        &self,
        x0: &Array1<f64>,
        options: &Options,
    ) -> Result<OptimizeResult, MinimizerError> {
        validate_start(x0, options)?;

        let mut f_current = self.f.evaluate(x0);
        if !f_current.is_finite() {
            return Err(MinimizerError::FunctionEvaluationError);
        }
        let g0 = checked_gradient(self.f.as_ref(), x0)?;
        let mut state = BfgsState::new(x0.clone(), g0);

        let mut progress = Progress::new(x0);
        let mut function_evaluations = 1;
        let mut gradient_evaluations = 1;
        let mut skipped_updates = 0;

        while progress.running(options.max_iter) {
            let direction = state.direction();
            let line = find_step_size(
                &state.x,
                self.f.as_ref(),
                SearchDirection::Vector(&direction),
                &options.line_search,
            )?;
            function_evaluations += line.evaluations;

            let p = &direction * line.alpha;
            let x_new = &state.x + &p;
            let g_new = checked_gradient(self.f.as_ref(), &x_new)?;
            gradient_evaluations += 1;
            let q = &g_new - &state.g;

            let outcome = state.update(&p, &q, options.curvature);
            if outcome != UpdateOutcome::Applied {
                skipped_updates += 1;
                debug!(
                    iteration = progress.iterations + 1,
                    ?outcome,
                    "curvature condition failed, BFGS update not applied"
                );
            }

            progress.step(self.name(), &x_new, line.alpha, line.f_alpha, options.eps);
            state.x = x_new;
            state.g = g_new;
            f_current = line.f_alpha;
        }
        progress.finish(options.max_iter);

        Ok(OptimizeResult {
            x_min: state.x,
            f_min: f_current,
            trajectory: progress.trajectory,
            iterations: progress.iterations,
            converged: progress.converged,
            function_evaluations,
            gradient_evaluations,
            hessian_evaluations: 0,
            skipped_updates,
            final_inverse_hessian: Some(state.h_inv),
            method_used: self.name().to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "BFGS"
    }
}
