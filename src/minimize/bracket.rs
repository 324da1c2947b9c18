use crate::error::MinimizerError;
use crate::minimize::line_search::LineFn;
use crate::minimize::objective::ObjFn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// Three step sizes `(a, c, b)` with `c` between `a` and `b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub a: f64,  // Outer point on the start side
    pub c: f64,  // Centre, lowest value
    pub b: f64,  // Outer point on the far side
    pub fa: f64, // φ(a)
    pub fc: f64, // φ(c)
    pub fb: f64, // φ(b)
}

impl Bracket {
    pub fn new(a: f64, c: f64, b: f64, fa: f64, fc: f64, fb: f64) -> Self {
        Bracket {
            a,
            c,
            b,
            fa,
            fc,
            fb,
        }
    }

    /// Check the ordering (either direction) and that the centre is lowest
    pub fn is_valid(&self) -> bool {
        let ordered = (self.a < self.c && self.c < self.b) || (self.a > self.c && self.c > self.b);
        ordered && self.fc <= self.fa && self.fc <= self.fb
    }

    /// True when the bracket runs toward negative step sizes
    pub fn is_mirrored(&self) -> bool {
        self.a > self.b
    }

    /// Same bracket with `a < b`
    pub fn ascending(&self) -> Self {
        if self.is_mirrored() {
            Bracket::new(self.b, self.c, self.a, self.fb, self.fc, self.fa)
        } else {
            *self
        }
    }

    pub fn width(&self) -> f64 {
        (self.b - self.a).abs()
    }
}

/// Bracket a minimum of `φ` by geometric expansion from zero
///
/// Probes `-2δ, 0, 2δ`. If the centre is already lowest that triple is the
/// bracket. Otherwise steps of `2^(i-1)·δ` are taken toward the lower
/// neighbour until a value rises, and the last three probes are returned.
pub fn geometric<F: ObjFn + ?Sized>(
    phi: &mut LineFn<'_, F>,
    delta: f64,
    max_expand: usize,
) -> Result<Bracket, MinimizerError> {
    let mut lambdas = [-2.0 * delta, 0.0, 2.0 * delta];
    let mut values = [
        phi.eval(lambdas[0])?,
        phi.eval(lambdas[1])?,
        phi.eval(lambdas[2])?,
    ];

    if values[1] <= values[0] && values[1] <= values[2] {
        return Ok(Bracket::new(
            lambdas[0], lambdas[1], lambdas[2], values[0], values[1], values[2],
        ));
    }

    // Expand toward the lower neighbour; negative steps when the left one wins.
    let sign = if values[0] < values[2] {
        lambdas.reverse();
        values.reverse();
        -1.0
    } else {
        1.0
    };

    for i in 1..=max_expand {
        let lambda = lambdas[2] + sign * 2f64.powi(i as i32 - 1) * delta;
        let value = phi.eval(lambda)?;
        trace!(expansion = i, lambda, value, "bracket expansion");

        lambdas = [lambdas[1], lambdas[2], lambda];
        values = [values[1], values[2], value];

        if values[2] > values[1] {
            let bracket = Bracket::new(
                lambdas[0], lambdas[1], lambdas[2], values[0], values[1], values[2],
            );
            if !bracket.is_valid() {
                return Err(MinimizerError::LineSearchBracket { expansions: i });
            }
            return Ok(bracket);
        }
    }

    Err(MinimizerError::LineSearchBracket {
        expansions: max_expand,
    })
}

/// Bracket a minimum of `φ` by random probing inside a widening interval
///
/// For `s = 1, 2, ...` draws `c` uniformly in `(-s·w, s·w)` and accepts it
/// when `φ(c)` is strictly below both endpoints.
pub fn random_probe<F: ObjFn + ?Sized>(
    phi: &mut LineFn<'_, F>,
    seed: u64,
    width_step: f64,
    max_probes: usize,
) -> Result<Bracket, MinimizerError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    for s in 1..=max_probes {
        let b = s as f64 * width_step;
        let a = -b;
        let c = rng.random_range(a..b);

        let fa = phi.eval(a)?;
        let fb = phi.eval(b)?;
        let fc = phi.eval(c)?;
        if fc < fa && fc < fb {
            return Ok(Bracket::new(a, c, b, fa, fc, fb));
        }
    }

    Err(MinimizerError::LineSearchBracket {
        expansions: max_probes,
    })
}
