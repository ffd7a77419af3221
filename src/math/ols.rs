//! Least squares solver and the degree-1 slope built on it.
//!
//! The feature extractor fits `y = a + b·x` for every series. The design matrix
//! is `[1, x_i]` and we solve with SVD rather than the normal equations, so a
//! degenerate axis (every `x_i` equal) yields the minimum-norm solution
//! instead of a division by zero.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Slope of the least-squares line through `(x_i, y_i)`.
///
/// Returns `Some(0.0)` for fewer than two points (no fit is attempted) and
/// `None` when the inputs have different lengths or the solve fails.
pub fn linear_slope(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    if y.len() < 2 {
        return Some(0.0);
    }

    let n = y.len();
    let design = DMatrix::from_fn(n, 2, |row, col| if col == 0 { 1.0 } else { x[row] });
    let target = DVector::from_column_slice(y);

    solve_least_squares(&design, &target).map(|beta| beta[1])
}
