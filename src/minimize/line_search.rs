use crate::error::MinimizerError;
use crate::linalg::norm;
use crate::minimize::bracket::{self, Bracket};
use crate::minimize::checked_gradient;
use crate::minimize::objective::{ObjFn, ObjGradFn};
use crate::minimize::options::{BracketStrategy, LineSearchOptions};
use ndarray::prelude::*;
use tracing::{trace, warn};

/// Descent direction handed to the line search
#[derive(Debug, Clone, Copy)]
pub enum SearchDirection<'a> {
    /// Direction matrix `D`; the step vector is `-D·∇f(x)`.
    Matrix(&'a Array2<f64>),
    /// Step vector used as given.
    Vector(&'a Array1<f64>),
}

impl SearchDirection<'_> {
    /// Step vector `s` such that `φ(α) = f(x + α s)`
    pub fn resolve<F: ObjGradFn + ?Sized>(
        &self,
        x: &Array1<f64>,
        f: &F,
    ) -> Result<Array1<f64>, MinimizerError> {
        let n = x.len();
        match self {
            SearchDirection::Matrix(d) => {
                if d.dim() != (n, n) {
                    return Err(MinimizerError::InvalidParameters(format!(
                        "direction matrix is {:?}, expected ({}, {})",
                        d.dim(),
                        n,
                        n
                    )));
                }
                let g = checked_gradient(f, x)?;
                Ok(-d.dot(&g))
            }
            SearchDirection::Vector(v) => {
                if v.len() != n {
                    return Err(MinimizerError::InvalidParameters(format!(
                        "direction has length {}, expected {}",
                        v.len(),
                        n
                    )));
                }
                Ok((*v).clone())
            }
        }
    }
}

/// The objective restricted to the ray `x + α s`
pub struct LineFn<'a, F: ObjFn + ?Sized> {
    f: &'a F,
    x: &'a Array1<f64>,
    s: &'a Array1<f64>,
    evaluations: usize,
}

impl<'a, F: ObjFn + ?Sized> LineFn<'a, F> {
    pub fn new(f: &'a F, x: &'a Array1<f64>, s: &'a Array1<f64>) -> Self {
        LineFn {
            f,
            x,
            s,
            evaluations: 0,
        }
    }

    pub fn eval(&mut self, alpha: f64) -> Result<f64, MinimizerError> {
        let mut point = self.x.clone();
        point.scaled_add(alpha, self.s);
        let value = self.f.evaluate(&point);
        self.evaluations += 1;
        if !value.is_finite() {
            return Err(MinimizerError::FunctionEvaluationError);
        }
        Ok(value)
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }
}

/// Line search result
#[derive(Debug, Clone)]
pub struct LineSearchResult {
    pub alpha: f64,
    pub f_alpha: f64,
    /// Step vector the alpha applies to.
    pub step: Array1<f64>,
    /// Bracket found before refinement.
    pub bracket: Bracket,
    pub evaluations: usize,
    pub refinements: usize,
}

/// Find a step size approximately minimizing `f` along a descent direction
///
/// Brackets a minimum of `φ(α) = f(x + α s)` and then refines it by
/// successive quadratic interpolation.
///
/// # Errors
/// * `LineSearchBracket` if no bracket is found within the expansion cap
/// * `LineSearchDegenerate` if the interpolating parabola collapses
/// * `FunctionEvaluationError` if `φ` is not finite at a probe
pub fn find_step_size<F: ObjGradFn + ?Sized>(
    x: &Array1<f64>,
    f: &F,
    direction: SearchDirection<'_>,
    options: &LineSearchOptions,
) -> Result<LineSearchResult, MinimizerError> {
    let step = direction.resolve(x, f)?;
    let step_norm = norm(&step.view());
    if !step_norm.is_finite() {
        return Err(MinimizerError::GradientEvaluationError(
            "search direction is not finite".to_string(),
        ));
    }

    let mut phi = LineFn::new(f, x, &step);

    // Stationary point, or a step too short to move x at the smallest probe.
    let probe = 2.0 * options.probe_delta;
    if step_norm == 0.0 || x.iter().zip(step.iter()).all(|(xi, si)| xi + probe * si == *xi) {
        let f0 = phi.eval(0.0)?;
        let evaluations = phi.evaluations();
        return Ok(LineSearchResult {
            alpha: 0.0,
            f_alpha: f0,
            step,
            bracket: Bracket::new(0.0, 0.0, 0.0, f0, f0, f0),
            evaluations,
            refinements: 0,
        });
    }

    let found = match options.strategy {
        BracketStrategy::Geometric => {
            bracket::geometric(&mut phi, options.probe_delta, options.max_expand)?
        }
        BracketStrategy::RandomProbe {
            seed,
            width_step,
            max_probes,
        } => bracket::random_probe(&mut phi, seed, width_step, max_probes)?,
    };
    trace!(a = found.a, c = found.c, b = found.b, "bracket found");

    let (alpha, f_alpha, refinements) = quadratic_refine(
        &mut phi,
        &found,
        options.tolerance / step_norm,
        options.max_refine,
    )?;
    let evaluations = phi.evaluations();

    Ok(LineSearchResult {
        alpha,
        f_alpha,
        step,
        bracket: found,
        evaluations,
        refinements,
    })
}

/// Successive quadratic interpolation inside a bracket
///
/// Returns `(alpha, φ(alpha), rounds)`. The returned alpha is the bracket
/// centre after the last replacement, which always holds the lowest value
/// seen. `tol` is in units of alpha.
pub fn quadratic_refine<F: ObjFn + ?Sized>(
    phi: &mut LineFn<'_, F>,
    bracket: &Bracket,
    tol: f64,
    max_refine: usize,
) -> Result<(f64, f64, usize), MinimizerError> {
    let Bracket {
        mut a,
        mut c,
        mut b,
        mut fa,
        mut fc,
        mut fb,
    } = bracket.ascending();

    let mut previous = c;
    for round in 1..=max_refine {
        // Vertex of the parabola through (a, fa), (c, fc), (b, fb), written around c.
        let den = 2.0 * ((b - c) * (fa - fc) + (c - a) * (fb - fc));
        if !(den > 0.0) || !den.is_finite() {
            return Err(MinimizerError::LineSearchDegenerate { a, c, b });
        }
        let vertex = c + ((c - a).powi(2) * (fc - fb) - (b - c).powi(2) * (fc - fa)) / den;
        if !vertex.is_finite() {
            return Err(MinimizerError::LineSearchDegenerate { a, c, b });
        }
        if vertex == c {
            return Ok((c, fc, round));
        }

        let fv = phi.eval(vertex)?;
        if vertex > c {
            if fc < fv {
                b = vertex;
                fb = fv;
            } else {
                a = c;
                fa = fc;
                c = vertex;
                fc = fv;
            }
        } else if fv < fc {
            b = c;
            fb = fc;
            c = vertex;
            fc = fv;
        } else {
            a = vertex;
            fa = fv;
        }
        trace!(round, vertex, a, c, b, "quadratic refinement");

        if (vertex - previous).abs() <= tol {
            return Ok((c, fc, round));
        }
        previous = vertex;
    }

    warn!(max_refine, alpha = c, "quadratic refinement hit its round cap");
    Ok((c, fc, max_refine))
}

#[cfg(test)]
mod line_search_tests {
    use super::*;
    use crate::minimize::objective::{MultiDimFn, MultiDimGradFn};
    use float_cmp::{approx_eq, F64Margin};

    const MARGIN: F64Margin = F64Margin {
        epsilon: 1e-9,
        ulps: 10,
    };

    fn shifted_parabola() -> impl ObjGradFn {
        // f(x) = (x - 3)², minimum at x = 3
        MultiDimGradFn::new(
            |x: &Array1<f64>| (x[0] - 3.0).powi(2),
            |x: &Array1<f64>| array![2.0 * (x[0] - 3.0)],
        )
    }

    #[test]
    fn test_exact_on_parabola() {
        let obj = shifted_parabola();
        let x = array![0.0];
        let s = array![1.0];
        let result = find_step_size(
            &x,
            &obj,
            SearchDirection::Vector(&s),
            &LineSearchOptions::default(),
        )
        .unwrap();

        assert!(approx_eq!(f64, result.alpha, 3.0, MARGIN));
        assert!(result.f_alpha < 1e-12);
        assert!(result.bracket.is_valid());
    }

    #[test]
    fn test_matrix_direction_applies_to_gradient() {
        // -I·∇f(0) = 6, so alpha = 0.5 reaches the minimum
        let obj = shifted_parabola();
        let x = array![0.0];
        let d = Array2::eye(1);
        let result = find_step_size(
            &x,
            &obj,
            SearchDirection::Matrix(&d),
            &LineSearchOptions::default(),
        )
        .unwrap();

        assert_eq!(result.step, array![6.0]);
        assert!(approx_eq!(f64, result.alpha, 0.5, MARGIN));
    }

    #[test]
    fn test_uphill_direction_mirrors() {
        let obj = shifted_parabola();
        let x = array![0.0];
        let s = array![-1.0];
        let result = find_step_size(
            &x,
            &obj,
            SearchDirection::Vector(&s),
            &LineSearchOptions::default(),
        )
        .unwrap();

        assert!(result.bracket.a > result.bracket.c && result.bracket.c > result.bracket.b);
        assert!(result.bracket.is_valid());
        assert!(approx_eq!(f64, result.alpha, -3.0, MARGIN));
    }

    #[test]
    fn test_zero_direction() {
        let obj = shifted_parabola();
        let x = array![3.0];
        let s = array![0.0];
        let result = find_step_size(
            &x,
            &obj,
            SearchDirection::Vector(&s),
            &LineSearchOptions::default(),
        )
        .unwrap();

        assert_eq!(result.alpha, 0.0);
        assert_eq!(result.refinements, 0);
        assert_eq!(result.evaluations, 1);
    }

    #[test]
    fn test_step_below_resolution_is_stationary() {
        let obj = shifted_parabola();
        let x = array![3.0];
        let s = array![1e-17];
        let result = find_step_size(
            &x,
            &obj,
            SearchDirection::Vector(&s),
            &LineSearchOptions::default(),
        )
        .unwrap();

        assert_eq!(result.alpha, 0.0);
        assert_eq!(result.evaluations, 1);
    }

    #[test]
    fn test_never_worse_than_start() {
        // Steep quartic valley where a parabola fits poorly
        let obj = MultiDimGradFn::new(
            |x: &Array1<f64>| (x[0] - 0.3).powi(4) + 0.1 * x[0],
            |x: &Array1<f64>| array![4.0 * (x[0] - 0.3).powi(3) + 0.1],
        );
        let x = array![2.0];
        let s = -obj.gradient(&x);
        let result = find_step_size(
            &x,
            &obj,
            SearchDirection::Vector(&s),
            &LineSearchOptions::default(),
        )
        .unwrap();

        assert!(result.f_alpha <= obj.evaluate(&x));
        assert!(result.bracket.is_valid());
    }

    #[test]
    fn test_unbounded_below_fails_to_bracket() {
        let obj = MultiDimGradFn::new(|x: &Array1<f64>| -x[0], |_: &Array1<f64>| array![-1.0]);
        let x = array![0.0];
        let s = array![1.0];
        let result = find_step_size(
            &x,
            &obj,
            SearchDirection::Vector(&s),
            &LineSearchOptions::default(),
        );

        assert_eq!(result.unwrap_err(), MinimizerError::LineSearchBracket { expansions: 20 });
    }

    #[test]
    fn test_flat_direction_is_degenerate() {
        // Moving along y does not change f
        let obj = MultiDimGradFn::new(
            |x: &Array1<f64>| x[0].powi(2),
            |x: &Array1<f64>| array![2.0 * x[0], 0.0],
        );
        let x = array![1.0, 0.0];
        let s = array![0.0, 1.0];
        let result = find_step_size(
            &x,
            &obj,
            SearchDirection::Vector(&s),
            &LineSearchOptions::default(),
        );

        assert!(matches!(
            result,
            Err(MinimizerError::LineSearchDegenerate { .. })
        ));
    }

    #[test]
    fn test_non_finite_objective() {
        let obj = MultiDimGradFn::new(
            |x: &Array1<f64>| if x[0] > 0.01 { f64::NAN } else { -x[0] },
            |_: &Array1<f64>| array![-1.0],
        );
        let x = array![0.0];
        let s = array![1.0];
        let result = find_step_size(
            &x,
            &obj,
            SearchDirection::Vector(&s),
            &LineSearchOptions::default(),
        );

        assert_eq!(result.unwrap_err(), MinimizerError::FunctionEvaluationError);
    }

    #[test]
    fn test_dimension_mismatch() {
        let obj = shifted_parabola();
        let x = array![0.0];
        let s = array![1.0, 0.0];
        let result = find_step_size(
            &x,
            &obj,
            SearchDirection::Vector(&s),
            &LineSearchOptions::default(),
        );

        assert!(matches!(result, Err(MinimizerError::InvalidParameters(_))));
    }

    #[test]
    fn test_matrix_direction_rejects_bad_gradient() {
        let x = array![0.5];
        let d = Array2::eye(1);
        let nan_grad = MultiDimGradFn::new(
            |x: &Array1<f64>| x[0].powi(2),
            |_: &Array1<f64>| array![f64::NAN],
        );
        let short_grad = MultiDimGradFn::new(
            |x: &Array1<f64>| x[0].powi(2),
            |_: &Array1<f64>| Array1::zeros(0),
        );

        let opts = LineSearchOptions::default();

        for result in [
            find_step_size(&x, &nan_grad, SearchDirection::Matrix(&d), &opts),
            find_step_size(&x, &short_grad, SearchDirection::Matrix(&d), &opts),
        ] {
            assert!(matches!(
                result,
                Err(MinimizerError::GradientEvaluationError(_))
            ));
        }
    }

    #[test]
    fn test_refine_round_cap_returns_centre() {
        // First vertex lands left of c and is worse, so only a moves
        let f = MultiDimFn::new(|x: &Array1<f64>| (x[0] - 1.0).powi(4));
        let x = array![0.0];
        let s = array![1.0];
        let mut phi = LineFn::new(&f, &x, &s);
        let start = Bracket::new(0.0, 0.9, 3.0, 1.0, 1e-4, 16.0);

        let (alpha, value, rounds) = quadratic_refine(&mut phi, &start, 1e-12, 1).unwrap();

        assert_eq!((alpha, value, rounds), (0.9, 1e-4, 1));
        assert_eq!(phi.evaluations(), 1);
    }

    #[test]
    fn test_refine_stops_on_tolerance() {
        let f = MultiDimFn::new(|x: &Array1<f64>| (x[0] - 1.0).powi(4));
        let x = array![0.0];
        let s = array![1.0];
        let mut phi = LineFn::new(&f, &x, &s);
        let start = Bracket::new(0.0, 0.9, 3.0, 1.0, 1e-4, 16.0);

        let (alpha, value, rounds) = quadratic_refine(&mut phi, &start, 1e-3, 100).unwrap();

        // One endpoint stays put, so progress past the start is slow
        assert!(alpha > 0.9 && alpha < 1.1);
        assert!(value <= 1e-4);
        assert!(rounds < 100);
        assert_eq!(phi.evaluations(), rounds);
    }
}
