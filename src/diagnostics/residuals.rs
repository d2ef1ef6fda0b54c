//! Standardized and studentized residuals.

use faer::Col;

/// e / σ̂ for one observation.
pub fn standardized(residual: f64, sigma: f64) -> f64 {
    if sigma > 0.0 && sigma.is_finite() {
        residual / sigma
    } else if residual == 0.0 {
        0.0
    } else {
        f64::NAN
    }
}

/// e / (σ̂ √(1 - h)) for one observation.
///
/// NaN when h = 1 (the fit passes through the point) or σ̂ = 0.
pub fn studentized(residual: f64, leverage: f64, sigma: f64) -> f64 {
    let one_minus_h = 1.0 - leverage;
    if !(sigma > 0.0 && sigma.is_finite()) || one_minus_h <= 0.0 {
        return f64::NAN;
    }
    residual / (sigma * one_minus_h.sqrt())
}

/// Externally studentized (deleted) residual for one observation.
///
/// Uses the leave-one-out variance s²_(i) = (RSS - e²/(1 - h)) / (df - 1),
/// which avoids refitting.
pub fn externally_studentized(residual: f64, leverage: f64, rss: f64, df_resid: usize) -> f64 {
    let one_minus_h = 1.0 - leverage;
    if df_resid <= 1 || one_minus_h <= 0.0 {
        return f64::NAN;
    }

    let rss_loo = rss - residual * residual / one_minus_h;
    let mse_loo = rss_loo / (df_resid - 1) as f64;
    if mse_loo <= 0.0 {
        return f64::NAN;
    }

    residual / (mse_loo.sqrt() * one_minus_h.sqrt())
}

/// Compute standardized residuals: e_i / σ̂.
pub fn standardized_residuals(residuals: &Col<f64>, sigma: f64) -> Col<f64> {
    Col::from_fn(residuals.nrows(), |i| standardized(residuals[i], sigma))
}

/// Compute internally studentized residuals: e_i / (σ̂ * sqrt(1 - h_ii)).
///
/// These account for the varying variance of residuals due to leverage.
pub fn studentized_residuals(residuals: &Col<f64>, leverage: &Col<f64>, sigma: f64) -> Col<f64> {
    Col::from_fn(residuals.nrows(), |i| {
        studentized(residuals[i], leverage[i], sigma)
    })
}

/// Compute externally studentized residuals.
///
/// These follow a t-distribution with n-p-1 degrees of freedom under the model.
pub fn externally_studentized_residuals(
    residuals: &Col<f64>,
    leverage: &Col<f64>,
    n_params: usize,
) -> Col<f64> {
    let n = residuals.nrows();
    let df_resid = n.saturating_sub(n_params);
    let rss: f64 = residuals.iter().map(|r| r * r).sum();

    Col::from_fn(n, |i| {
        externally_studentized(residuals[i], leverage[i], rss, df_resid)
    })
}

/// Identify outliers based on studentized residuals.
///
/// Returns indices of observations with |r_i| > threshold.
/// Common threshold is 2 or 3.
pub fn residual_outliers(studentized: &Col<f64>, threshold: f64) -> Vec<usize> {
    studentized
        .iter()
        .enumerate()
        .filter(|(_, &r)| r.abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}
