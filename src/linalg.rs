use crate::error::InversionError;
use ndarray::prelude::*;

/// Compute the inverse of a square matrix using Gauss-Jordan elimination with partial pivoting
///
/// A pivot is treated as zero when its magnitude does not exceed
/// `max(n * EPSILON * max|a_ij|, singular_tol)`.
///
/// # Arguments
/// * `matrix` - A square matrix to invert
/// * `singular_tol` - Absolute floor below which a pivot counts as zero
///
/// # Returns
/// * `Ok(Array2<f64>)` - The inverted matrix
/// * `Err(InversionError)` - If the matrix is not square or is singular
///
/// # Examples
/// ```rust
/// use gradkit::linalg::matrix_inverse;
/// use ndarray::array;
///
/// let m = array![[4.0, 7.0], [2.0, 6.0]];
/// let inv = matrix_inverse(&m.view(), 1e-12).unwrap();
/// assert!((inv[[0, 0]] - 0.6).abs() < 1e-12);
/// ```
pub fn matrix_inverse(
    matrix: &ArrayView2<f64>,
    singular_tol: f64,
) -> Result<Array2<f64>, InversionError> {
    let (rows, cols) = matrix.dim();

    if rows != cols {
        return Err(InversionError::NotSquare(format!(
            "Matrix dimensions are {}x{}, expected square matrix",
            rows, cols
        )));
    }
    if rows == 0 {
        return Err(InversionError::DimensionMismatch(
            "Cannot invert an empty matrix".to_string(),
        ));
    }

    let n = rows;
    let scale = matrix.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let threshold = (n as f64 * f64::EPSILON * scale).max(singular_tol);

    // Augmented [A | I]
    let mut augmented = Array2::<f64>::zeros((n, 2 * n));
    augmented.slice_mut(s![.., ..n]).assign(matrix);
    for i in 0..n {
        augmented[[i, i + n]] = 1.0;
    }

    for i in 0..n {
        let mut pivot_row = i;
        let mut max_abs = augmented[[i, i]].abs();
        for k in (i + 1)..n {
            let abs_val = augmented[[k, i]].abs();
            if abs_val > max_abs {
                max_abs = abs_val;
                pivot_row = k;
            }
        }

        if !(max_abs > threshold) {
            return Err(InversionError::Singular { pivot: i });
        }

        if pivot_row != i {
            for j in 0..(2 * n) {
                augmented.swap([i, j], [pivot_row, j]);
            }
        }

        let pivot = augmented[[i, i]];
        augmented.row_mut(i).mapv_inplace(|v| v / pivot);

        let pivot_values = augmented.row(i).to_owned();
        for k in 0..n {
            if k != i {
                let factor = augmented[[k, i]];
                if factor != 0.0 {
                    augmented
                        .row_mut(k)
                        .scaled_add(-factor, &pivot_values);
                }
            }
        }
    }

    Ok(augmented.slice(s![.., n..]).to_owned())
}

/// Outer product `a bᵀ`
pub fn outer(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> Array2<f64> {
    Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i] * b[j])
}

/// Euclidean norm
pub fn norm(v: &ArrayView1<f64>) -> f64 {
    v.dot(v).sqrt()
}

/// Euclidean distance between two points of equal length
pub fn distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Check `|m_ij - m_ji| <= tol * max(1, |m_ij|)` for all entries
pub fn is_symmetric(m: &ArrayView2<f64>, tol: f64) -> bool {
    let (rows, cols) = m.dim();
    if rows != cols {
        return false;
    }
    for i in 0..rows {
        for j in (i + 1)..cols {
            let scale = m[[i, j]].abs().max(1.0);
            if (m[[i, j]] - m[[j, i]]).abs() > tol * scale {
                return false;
            }
        }
    }
    true
}
