//! Symmetric eigen-decomposition and the pseudo-inverse built on it.

use crate::error::{ModelError, Result};
use ndarray::{Array1, Array2};

/// Result of eigenvalue decomposition
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    /// Eigenvalues (sorted in descending order)
    pub eigenvalues: Array1<f64>,
    /// Eigenvectors (columns are eigenvectors)
    pub eigenvectors: Array2<f64>,
}

/// Cyclic Jacobi eigenvalue decomposition for symmetric matrices
///
/// Sweeps over every off-diagonal pair until the off-diagonal Frobenius norm
/// falls below `tolerance` relative to the matrix norm, or `max_sweeps` is
/// reached.
pub fn jacobi_eigendecomp(
    matrix: &Array2<f64>,
    max_sweeps: usize,
    tolerance: f64,
) -> Result<EigenDecomposition> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(ModelError::DimensionMismatch {
            expected: n,
            actual: matrix.ncols(),
        });
    }

    let mut a = matrix.clone();
    let mut v = Array2::<f64>::eye(n);
    let scale = a.iter().map(|x| x * x).sum::<f64>().sqrt();

    for _sweep in 0..max_sweeps {
        if off_diagonal_norm(&a) <= tolerance * scale {
            break;
        }
        for p in 0..n {
            for q in (p + 1)..n {
                if a[[p, q]] == 0.0 {
                    continue;
                }
                let (cos_theta, sin_theta) = compute_rotation(a[[p, p]], a[[q, q]], a[[p, q]]);
                apply_jacobi_rotation(&mut a, &mut v, p, q, cos_theta, sin_theta);
            }
        }
    }

    let eigenvalues: Vec<f64> = (0..n).map(|i| a[[i, i]]).collect();

    // Sort eigenvalues and eigenvectors in descending order
    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by(|&i, &j| {
        eigenvalues[j]
            .partial_cmp(&eigenvalues[i])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let sorted_eigenvalues = indices.iter().map(|&i| eigenvalues[i]).collect();
    let mut sorted_eigenvectors = Array2::<f64>::zeros((n, n));
    for (new_idx, &old_idx) in indices.iter().enumerate() {
        sorted_eigenvectors
            .column_mut(new_idx)
            .assign(&v.column(old_idx));
    }

    Ok(EigenDecomposition {
        eigenvalues: sorted_eigenvalues,
        eigenvectors: sorted_eigenvectors,
    })
}

fn off_diagonal_norm(matrix: &Array2<f64>) -> f64 {
    let n = matrix.nrows();
    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum += matrix[[i, j]] * matrix[[i, j]];
            }
        }
    }
    sum.sqrt()
}

/// Compute the rotation (cos, sin) annihilating the (p, q) element
fn compute_rotation(app: f64, aqq: f64, apq: f64) -> (f64, f64) {
    if apq.abs() < f64::MIN_POSITIVE {
        return (1.0, 0.0);
    }

    let tau = (aqq - app) / (2.0 * apq);
    let t = if tau >= 0.0 {
        1.0 / (tau + (1.0 + tau * tau).sqrt())
    } else {
        -1.0 / (-tau + (1.0 + tau * tau).sqrt())
    };

    let cos_theta = 1.0 / (1.0 + t * t).sqrt();
    (cos_theta, t * cos_theta)
}

/// Apply a Jacobi rotation to matrix A and eigenvector matrix V
fn apply_jacobi_rotation(
    a: &mut Array2<f64>,
    v: &mut Array2<f64>,
    p: usize,
    q: usize,
    cos_theta: f64,
    sin_theta: f64,
) {
    let n = a.nrows();
    let app = a[[p, p]];
    let aqq = a[[q, q]];
    let apq = a[[p, q]];

    a[[p, p]] = cos_theta * cos_theta * app - 2.0 * cos_theta * sin_theta * apq
        + sin_theta * sin_theta * aqq;
    a[[q, q]] = sin_theta * sin_theta * app
        + 2.0 * cos_theta * sin_theta * apq
        + cos_theta * cos_theta * aqq;
    a[[p, q]] = 0.0;
    a[[q, p]] = 0.0;

    for i in 0..n {
        if i != p && i != q {
            let aip = a[[i, p]];
            let aiq = a[[i, q]];

            a[[i, p]] = cos_theta * aip - sin_theta * aiq;
            a[[p, i]] = a[[i, p]];

            a[[i, q]] = sin_theta * aip + cos_theta * aiq;
            a[[q, i]] = a[[i, q]];
        }
    }

    for i in 0..n {
        let vip = v[[i, p]];
        let viq = v[[i, q]];

        v[[i, p]] = cos_theta * vip - sin_theta * viq;
        v[[i, q]] = sin_theta * vip + cos_theta * viq;
    }
}

/// Moore-Penrose pseudo-inverse of a symmetric positive semi-definite matrix.
#[derive(Debug, Clone)]
pub struct PseudoInverse {
    /// The pseudo-inverse
    pub inverse: Array2<f64>,
    /// Number of eigenvalues above the cutoff
    pub rank: usize,
}

/// Pseudo-inverse of a symmetric matrix.
///
/// Eigenvalues at or below `largest * n * f64::EPSILON` are treated as zero
/// and excluded from both the inverse and the rank.
pub fn symmetric_pinv(matrix: &Array2<f64>) -> Result<PseudoInverse> {
    let n = matrix.nrows();
    let decomp = jacobi_eigendecomp(matrix, 100, f64::EPSILON)?;
    let largest = decomp
        .eigenvalues
        .iter()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let cutoff = largest * n.max(1) as f64 * f64::EPSILON;

    let mut inverse = Array2::<f64>::zeros((n, n));
    let mut rank = 0;
    for (k, &lambda) in decomp.eigenvalues.iter().enumerate() {
        if lambda <= cutoff {
            continue;
        }
        rank += 1;
        let vector = decomp.eigenvectors.column(k);
        for i in 0..n {
            for j in 0..n {
                inverse[[i, j]] += vector[i] * vector[j] / lambda;
            }
        }
    }
    Ok(PseudoInverse { inverse, rank })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_jacobi_eigendecomp_diagonal() {
        let matrix = array![[1.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 2.0]];
        let decomp = jacobi_eigendecomp(&matrix, 100, 1e-14).unwrap();
        assert_abs_diff_eq!(decomp.eigenvalues[0], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(decomp.eigenvalues[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(decomp.eigenvalues[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_jacobi_eigendecomp_reconstructs() {
        let matrix = array![[2.0, 1.0, 1.0], [1.0, 2.0, 1.0], [1.0, 1.0, 2.0]];
        let decomp = jacobi_eigendecomp(&matrix, 100, 1e-14).unwrap();
        let v = &decomp.eigenvectors;
        let lambda = Array2::from_diag(&decomp.eigenvalues);
        let rebuilt = v.dot(&lambda).dot(&v.t());
        for (a, b) in matrix.iter().zip(rebuilt.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-10);
        }
        assert_abs_diff_eq!(decomp.eigenvalues[0], 4.0, epsilon = 1e-10);
    }

    #[test]
    fn test_non_square_rejected() {
        let matrix = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            jacobi_eigendecomp(&matrix, 10, 1e-12),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_pinv_of_full_rank_is_inverse() {
        let matrix = array![[4.0, 1.0], [1.0, 3.0]];
        let pinv = symmetric_pinv(&matrix).unwrap();
        assert_eq!(pinv.rank, 2);
        let product = matrix.dot(&pinv.inverse);
        assert_abs_diff_eq!(product[[0, 0]], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(product[[0, 1]], 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(product[[1, 1]], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_pinv_of_singular_matrix() {
        // [[1, 1], [1, 1]] has eigenvalues 2 and 0
        let matrix = array![[1.0, 1.0], [1.0, 1.0]];
        let pinv = symmetric_pinv(&matrix).unwrap();
        assert_eq!(pinv.rank, 1);
        for value in pinv.inverse.iter() {
            assert_abs_diff_eq!(*value, 0.25, epsilon = 1e-10);
        }
    }
}
