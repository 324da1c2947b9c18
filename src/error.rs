use thiserror::Error;

/// Errors raised while inverting a matrix
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InversionError {
    #[error("Matrix is not square: {0}")]
    NotSquare(String),
    #[error("Matrix is singular or nearly singular at pivot {pivot}")]
    Singular { pivot: usize },
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
}

/// Error types for optimizers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MinimizerError {
    /// The Hessian could not be inverted at the current point.
    #[error("Singular descent direction at iteration {iteration}: {source}")]
    SingularDirection {
        iteration: usize,
        #[source]
        source: InversionError,
    },

    /// No three-point unimodal bracket within the expansion cap.
    #[error("No minimum bracket found after {expansions} expansions")]
    LineSearchBracket { expansions: usize },

    /// Quadratic interpolation through collinear samples.
    #[error("Degenerate quadratic interpolation on bracket ({a}, {c}, {b})")]
    LineSearchDegenerate { a: f64, c: f64, b: f64 },

    #[error("Function evaluation returned invalid value")]
    FunctionEvaluationError,

    #[error("Gradient evaluation error: {0}")]
    GradientEvaluationError(String),

    #[error("Hessian evaluation error: {0}")]
    HessianEvaluationError(String),

    #[error("Invalid dimension or empty vector")]
    InvalidDimension,

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

impl MinimizerError {
    /// True for failures raised by the one-dimensional step search.
    pub fn is_line_search_failure(&self) -> bool {
        matches!(
            self,
            MinimizerError::LineSearchBracket { .. } | MinimizerError::LineSearchDegenerate { .. }
        )
    }
}
