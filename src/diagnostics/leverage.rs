//! Leverage (hat matrix diagonal) calculations.

use crate::inference::quadratic_form;
use faer::{Col, Mat};

/// Leverage of row `i`: h_ii = x_iᵀ(X'X)⁻¹x_i, clamped to [0, 1].
pub fn leverage_at(design: &Mat<f64>, xtx_inv: &Mat<f64>, i: usize) -> f64 {
    let row = Col::from_fn(design.ncols(), |j| design[(i, j)]);
    quadratic_form(&row, xtx_inv).clamp(0.0, 1.0)
}

/// Compute leverage values (diagonal of hat matrix H = X(X'X)^(-1)X').
///
/// Leverage measures the influence of each observation on its own fitted value.
/// High leverage points have unusual predictor values.
///
/// # Properties
/// - h_ii ∈ [0, 1]
/// - Σ h_ii = p (number of parameters)
/// - Points with h_ii > 2p/n are considered high leverage
pub fn compute_leverage(design: &Mat<f64>, xtx_inv: &Mat<f64>) -> Col<f64> {
    Col::from_fn(design.nrows(), |i| leverage_at(design, xtx_inv, i))
}

/// Identify high leverage points.
///
/// Returns indices of observations with leverage > threshold.
/// Default threshold is 2p/n where p is number of parameters.
pub fn high_leverage_points(
    leverage: &Col<f64>,
    n_params: usize,
    threshold: Option<f64>,
) -> Vec<usize> {
    let n = leverage.nrows();
    let cutoff = threshold.unwrap_or(2.0 * n_params as f64 / n as f64);

    leverage
        .iter()
        .enumerate()
        .filter(|(_, &h)| h > cutoff)
        .map(|(i, _)| i)
        .collect()
}
