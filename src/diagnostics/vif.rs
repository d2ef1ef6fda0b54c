//! Variance Inflation Factor (VIF) for multicollinearity detection.

use crate::inference::compute_matrix_inverse;
use crate::utils::{center_columns, detect_constant_columns};
use faer::{Col, Mat};

/// Compute the Variance Inflation Factor for each non-intercept design column.
///
/// VIF measures how much the variance of a coefficient estimate is inflated
/// due to multicollinearity. For column j:
///
/// VIF_j = 1 / (1 - R²_j)
///
/// where R²_j is the R² from regressing x_j on all other columns. It is read
/// off the diagonal of the inverse correlation matrix of the columns.
///
/// # Interpretation
/// - VIF = 1: No correlation with other predictors
/// - VIF > 5: Moderate multicollinearity (some sources say > 10)
/// - VIF > 10: High multicollinearity
///
/// # Returns
/// One value per design column, skipping the leading intercept column when
/// `has_intercept` is set. Constant columns get NaN.
pub fn variance_inflation_factor(design: &Mat<f64>, has_intercept: bool) -> Col<f64> {
    let n = design.nrows();
    let skip = usize::from(has_intercept);
    let p = design.ncols().saturating_sub(skip);

    if p == 0 {
        return Col::zeros(0);
    }
    if p == 1 {
        return Col::from_fn(1, |_| 1.0);
    }

    let x = Mat::from_fn(n, p, |i, j| design[(i, j + skip)]);
    let constant = detect_constant_columns(&x, 1e-12);

    let (centered, _) = center_columns(&x);
    let scale: Vec<f64> = (0..p)
        .map(|j| (0..n).map(|i| centered[(i, j)].powi(2)).sum::<f64>().sqrt())
        .collect();

    let varying: Vec<usize> = (0..p).filter(|&j| !constant[j]).collect();
    let k = varying.len();

    let corr = Mat::from_fn(k, k, |a, b| {
        let (ja, jb) = (varying[a], varying[b]);
        let dot: f64 = (0..n).map(|i| centered[(i, ja)] * centered[(i, jb)]).sum();
        dot / (scale[ja] * scale[jb])
    });

    let mut vif = Col::from_fn(p, |_| f64::NAN);
    match compute_matrix_inverse(&corr) {
        Ok(inv) => {
            for (a, &j) in varying.iter().enumerate() {
                vif[j] = inv[(a, a)].max(1.0);
            }
        }
        Err(_) => {
            for &j in &varying {
                vif[j] = f64::INFINITY;
            }
        }
    }

    vif
}

/// Identify predictors with high multicollinearity.
///
/// Returns indices of predictors with VIF > threshold.
/// Common threshold: 5 or 10.
pub fn high_vif_predictors(vif: &Col<f64>, threshold: f64) -> Vec<usize> {
    vif.iter()
        .enumerate()
        .filter(|(_, &v)| v > threshold)
        .map(|(i, _)| i)
        .collect()
}
