//! Prediction intervals and the (X'X)⁻¹ computations they rely on.

use super::coefficient::t_critical;
use crate::core::{IntervalType, PredictionResult};
use crate::utils::column_norm;
use faer::{Col, Mat};

/// Computes interval bounds for new design rows.
///
/// # Arguments
/// * `x_new` - Encoded design rows (n_new × p), including the intercept column if any
/// * `xtx_inv` - (X'X)⁻¹ from the fit
/// * `predictions` - Point predictions for `x_new`
/// * `mse` - Residual variance σ̂²
/// * `df` - Residual degrees of freedom
/// * `confidence_level` - Confidence level (e.g., 0.95)
/// * `interval_type` - Confidence or Prediction interval
///
/// Rows whose prediction is NaN (missing covariates) get NaN bounds.
pub fn compute_prediction_intervals(
    x_new: &Mat<f64>,
    xtx_inv: &Mat<f64>,
    predictions: &Col<f64>,
    mse: f64,
    df: f64,
    confidence_level: f64,
    interval_type: IntervalType,
) -> PredictionResult {
    let n_new = x_new.nrows();
    let t_crit = if mse >= 0.0 {
        t_critical(df, confidence_level)
    } else {
        f64::NAN
    };

    let mut se = Col::zeros(n_new);
    let mut lower = Col::zeros(n_new);
    let mut upper = Col::zeros(n_new);

    for i in 0..n_new {
        let x0 = Col::from_fn(x_new.ncols(), |j| x_new[(i, j)]);

        // h = x₀'(X'X)⁻¹x₀
        let h = quadratic_form(&x0, xtx_inv);

        let var = match interval_type {
            IntervalType::Confidence => mse * h,
            IntervalType::Prediction => mse * (1.0 + h),
        };

        se[i] = if var >= 0.0 { var.sqrt() } else { f64::NAN };

        let margin = t_crit * se[i];
        lower[i] = predictions[i] - margin;
        upper[i] = predictions[i] + margin;
    }

    PredictionResult::with_intervals(
        predictions.clone(),
        lower,
        upper,
        se,
        interval_type,
        confidence_level,
    )
}

/// x'Ax for a single vector.
pub(crate) fn quadratic_form(x: &Col<f64>, a: &Mat<f64>) -> f64 {
    let p = x.nrows();
    let mut total = 0.0;
    for j in 0..p {
        let mut row = 0.0;
        for k in 0..p {
            row += a[(j, k)] * x[k];
        }
        total += x[j] * row;
    }
    total
}

/// Compute (X'X)⁻¹ = R⁻¹R⁻ᵀ from the QR decomposition of X.
///
/// Avoids forming X'X explicitly. Fails when `|R_jj| <= tolerance * ||x_j||`
/// for some column, the same test the OLS solver applies.
pub fn compute_xtx_inverse(x: &Mat<f64>, tolerance: f64) -> Result<Mat<f64>, &'static str> {
    let p = x.ncols();
    let qr = x.qr();
    let r = qr.R();

    if r.nrows() < p {
        return Err("design matrix has fewer rows than columns");
    }

    if (0..p).any(|j| r[(j, j)].abs() <= tolerance * column_norm(x, j)) {
        return Err("Matrix is singular");
    }

    // Invert the upper triangle column by column: R * R_inv = I
    let mut r_inv = Mat::zeros(p, p);
    for col in 0..p {
        for i in (0..=col).rev() {
            let mut sum = if i == col { 1.0 } else { 0.0 };
            for j in (i + 1)..=col {
                sum -= r[(i, j)] * r_inv[(j, col)];
            }
            r_inv[(i, col)] = sum / r[(i, i)];
        }
    }

    Ok(Mat::from_fn(p, p, |i, j| {
        let start = i.max(j);
        (start..p).map(|k| r_inv[(i, k)] * r_inv[(j, k)]).sum()
    }))
}

/// General square matrix inverse using QR decomposition.
pub fn compute_matrix_inverse(matrix: &Mat<f64>) -> Result<Mat<f64>, &'static str> {
    let n = matrix.nrows();

    let qr = matrix.qr();
    let q = qr.compute_Q();
    let r = qr.R();

    for i in 0..n {
        if r[(i, i)].abs() < 1e-10 {
            return Err("Matrix is singular");
        }
    }

    // Solve R * X = Q' for each column of identity to get inverse
    let mut inv = Mat::zeros(n, n);
    let qt = q.transpose();

    for col in 0..n {
        for i in (0..n).rev() {
            let mut sum = qt[(i, col)];
            for j in (i + 1)..n {
                sum -= r[(i, j)] * inv[(j, col)];
            }
            inv[(i, col)] = sum / r[(i, i)];
        }
    }

    Ok(inv)
}
