use crate::error::MinimizerError;
use serde::{Deserialize, Serialize};

/// How the bracketing stage of the line search looks for a three-point bracket
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BracketStrategy {
    /// Probe around zero, then expand geometrically toward the lower side.
    #[default]
    Geometric,
    /// Draw a centre uniformly inside `(-s * width_step, s * width_step)` for
    /// `s = 1, 2, ...` until it lies below both endpoints. Seeded, so
    /// repeated runs agree.
    RandomProbe {
        seed: u64,
        width_step: f64,
        max_probes: usize,
    },
}

impl BracketStrategy {
    pub fn random_probe(seed: u64) -> Self {
        BracketStrategy::RandomProbe {
            seed,
            width_step: 1.0,
            max_probes: 1000,
        }
    }
}

/// What BFGS does with an update that would break positive definiteness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurvaturePolicy {
    /// Keep the current inverse Hessian approximation.
    #[default]
    Skip,
    /// Restart from the identity.
    Reset,
}

/// Options for the inexact line search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSearchOptions {
    /// Stop refining once consecutive vertex estimates are closer than this (x-space distance).
    pub tolerance: f64,
    /// Initial probe half-width.
    pub probe_delta: f64,
    /// Cap on geometric bracket expansions.
    pub max_expand: usize,
    /// Cap on quadratic interpolation rounds.
    pub max_refine: usize,
    pub strategy: BracketStrategy,
}

impl Default for LineSearchOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            probe_delta: 0.01,
            max_expand: 20,
            max_refine: 100,
            strategy: BracketStrategy::Geometric,
        }
    }
}

impl LineSearchOptions {
    pub fn validate(&self) -> Result<(), MinimizerError> {
        if !(self.tolerance > 0.0) || !self.tolerance.is_finite() {
            return Err(MinimizerError::InvalidParameters(format!(
                "line search tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.probe_delta > 0.0) || !self.probe_delta.is_finite() {
            return Err(MinimizerError::InvalidParameters(format!(
                "bracket probe delta must be positive, got {}",
                self.probe_delta
            )));
        }
        if self.max_expand == 0 || self.max_refine == 0 {
            return Err(MinimizerError::InvalidParameters(
                "line search iteration caps must be at least 1".to_string(),
            ));
        }
        if let BracketStrategy::RandomProbe {
            width_step,
            max_probes,
            ..
        } = self.strategy
        {
            if !(width_step > 0.0) || !width_step.is_finite() || max_probes == 0 {
                return Err(MinimizerError::InvalidParameters(
                    "random probe needs a positive width step and at least one probe".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Options shared by the descent methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Convergence threshold on the distance between consecutive points.
    pub eps: f64,
    /// Soft cap on outer iterations.
    pub max_iter: usize,
    /// Pivots at or below this magnitude make a Hessian singular.
    pub singular_tol: f64,
    pub curvature: CurvaturePolicy,
    pub line_search: LineSearchOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            eps: 1e-4,
            max_iter: 100,
            singular_tol: f64::EPSILON.sqrt(),
            curvature: CurvaturePolicy::Skip,
            line_search: LineSearchOptions::default(),
        }
    }
}

impl Options {
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_singular_tol(mut self, singular_tol: f64) -> Self {
        self.singular_tol = singular_tol;
        self
    }

    pub fn with_curvature(mut self, curvature: CurvaturePolicy) -> Self {
        self.curvature = curvature;
        self
    }

    pub fn with_line_search(mut self, line_search: LineSearchOptions) -> Self {
        self.line_search = line_search;
        self
    }

    pub fn with_strategy(mut self, strategy: BracketStrategy) -> Self {
        self.line_search.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<(), MinimizerError> {
        if !(self.eps > 0.0) || !self.eps.is_finite() {
            return Err(MinimizerError::InvalidParameters(format!(
                "eps must be positive, got {}",
                self.eps
            )));
        }
        if self.max_iter == 0 {
            return Err(MinimizerError::InvalidParameters(
                "max_iter must be at least 1".to_string(),
            ));
        }
        if self.singular_tol < 0.0 || !self.singular_tol.is_finite() {
            return Err(MinimizerError::InvalidParameters(format!(
                "singular_tol must be non-negative, got {}",
                self.singular_tol
            )));
        }
        self.line_search.validate()
    }
}
