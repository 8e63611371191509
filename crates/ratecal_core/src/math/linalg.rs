//! Dense linear algebra for small systems.
//!
//! The solvers in this crate only ever factor matrices of the size of the
//! parameter vector (3 or 4) or a KKT system a few rows larger, so plain
//! row-major `Vec<Vec<f64>>` storage is used throughout.
//!
//! Solves return `None` when the matrix is singular to working precision;
//! callers turn that into [`SolverError::SingularMatrix`](crate::types::SolverError)
//! with their own context.

/// Pivot magnitude below which a matrix is treated as singular.
const PIVOT_EPSILON: f64 = 1e-14;

/// Euclidean norm.
#[inline]
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Dot product of two equally sized vectors.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Matrix-vector product `A v`.
pub fn mat_vec(a: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    a.iter().map(|row| dot(row, v)).collect()
}

/// `Jᵀ J` for a Jacobian stored as `n_residuals × n_params`.
pub fn jtj(jacobian: &[Vec<f64>], n_params: usize) -> Vec<Vec<f64>> {
    let mut out = vec![vec![0.0; n_params]; n_params];
    for row in jacobian {
        for i in 0..n_params {
            for j in 0..n_params {
                out[i][j] += row[i] * row[j];
            }
        }
    }
    out
}

/// `Jᵀ r` for a Jacobian stored as `n_residuals × n_params`.
pub fn jtr(jacobian: &[Vec<f64>], residuals: &[f64], n_params: usize) -> Vec<f64> {
    let mut out = vec![0.0; n_params];
    for (row, r) in jacobian.iter().zip(residuals) {
        for i in 0..n_params {
            out[i] += row[i] * r;
        }
    }
    out
}

/// Add `shift` to every diagonal element.
pub fn add_diagonal(a: &mut [Vec<f64>], shift: f64) {
    for (i, row) in a.iter_mut().enumerate() {
        row[i] += shift;
    }
}

/// Identity matrix of size `n`.
pub fn identity(n: usize) -> Vec<Vec<f64>> {
    let mut out = vec![vec![0.0; n]; n];
    add_diagonal(&mut out, 1.0);
    out
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
///
/// Works for any non-singular square matrix, including the indefinite
/// KKT systems of the SQP solver.
///
/// # Example
///
/// ```
/// use ratecal_core::math::linalg::solve_linear;
///
/// // KKT-like indefinite system
/// let a = vec![vec![1.0, 1.0], vec![1.0, 0.0]];
/// let x = solve_linear(&a, &[3.0, 1.0]).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// ```
pub fn solve_linear(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n || a.iter().any(|row| row.len() != n) {
        return None;
    }

    // Augmented copy
    let mut m: Vec<Vec<f64>> = a
        .iter()
        .zip(b)
        .map(|(row, &bi)| {
            let mut r = row.clone();
            r.push(bi);
            r
        })
        .collect();

    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, x| acc.max(x.abs()))
        .max(1.0);

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&i, &j| {
            m[i][col]
                .abs()
                .partial_cmp(&m[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

        let pivot = m[pivot_row][col];
        if !pivot.is_finite() || pivot.abs() < PIVOT_EPSILON * scale {
            return None;
        }
        m.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = m[row][col] / m[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..=n {
                m[row][k] -= factor * m[col][k];
            }
        }
    }

    // Back substitution
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = m[i][n];
        for j in (i + 1)..n {
            sum -= m[i][j] * x[j];
        }
        x[i] = sum / m[i][i];
    }

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}

/// Solve `A x = b` using Cholesky decomposition.
///
/// `A` must be symmetric positive definite; returns `None` otherwise.
pub fn solve_cholesky(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // Cholesky decomposition: A = L L^T
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Solve L y = b (forward substitution)
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Solve L^T x = y (backward substitution)
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // ========================================
    // Vector Helper Tests
    // ========================================

    #[test]
    fn test_norm_and_dot() {
        assert_abs_diff_eq!(norm(&[3.0, 4.0]), 5.0, epsilon = 1e-15);
        assert_abs_diff_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0, epsilon = 1e-15);
    }

    #[test]
    fn test_normal_equation_products() {
        // J = [[1, 2], [3, 4]], r = [1, 1]
        let j = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let a = jtj(&j, 2);
        assert_eq!(a, vec![vec![10.0, 14.0], vec![14.0, 20.0]]);
        assert_eq!(jtr(&j, &[1.0, 1.0], 2), vec![4.0, 6.0]);
    }

    #[test]
    fn test_identity_and_mat_vec() {
        let i3 = identity(3);
        assert_eq!(mat_vec(&i3, &[1.0, -2.0, 3.0]), vec![1.0, -2.0, 3.0]);
    }

    // ========================================
    // Gaussian Elimination Tests
    // ========================================

    #[test]
    fn test_solve_linear_needs_pivoting() {
        // Zero in the leading position
        let a = vec![vec![0.0, 2.0], vec![3.0, 1.0]];
        let x = solve_linear(&a, &[4.0, 5.0]).unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_linear_singular() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(solve_linear(&a, &[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_solve_linear_dimension_mismatch() {
        let a = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert!(solve_linear(&a, &[1.0]).is_none());
    }

    // ========================================
    // Cholesky Solver Tests
    // ========================================

    #[test]
    fn test_cholesky_simple() {
        // 4*x0 + 2*x1 = 8, 2*x0 + 2*x1 = 5
        let a = vec![vec![4.0, 2.0], vec![2.0, 2.0]];
        let x = solve_cholesky(&a, &[8.0, 5.0]).unwrap();
        assert_abs_diff_eq!(x[0], 1.5, epsilon = 1e-10);
        assert_abs_diff_eq!(x[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_cholesky_non_positive_definite() {
        let a = vec![vec![-1.0, 0.0], vec![0.0, 1.0]];
        assert!(solve_cholesky(&a, &[1.0, 1.0]).is_none());
    }

    #[test]
    fn test_cholesky_agrees_with_elimination() {
        let a = vec![
            vec![4.0, 1.0, 0.5],
            vec![1.0, 3.0, 0.2],
            vec![0.5, 0.2, 2.0],
        ];
        let b = [1.0, 2.0, 3.0];
        let x1 = solve_cholesky(&a, &b).unwrap();
        let x2 = solve_linear(&a, &b).unwrap();
        for (u, v) in x1.iter().zip(&x2) {
            assert_abs_diff_eq!(*u, *v, epsilon = 1e-12);
        }
    }
}
