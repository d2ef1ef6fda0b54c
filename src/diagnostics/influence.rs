//! Influence measures: Cook's distance.

use faer::Col;

/// Cook's distance for one observation from its internally studentized
/// residual `r` and leverage `h`: D = (r² / p) · h / (1 - h).
pub fn cooks(studentized: f64, leverage: f64, n_params: usize) -> f64 {
    let one_minus_h = 1.0 - leverage;
    if n_params == 0 || one_minus_h <= 0.0 || !studentized.is_finite() {
        return f64::NAN;
    }
    (studentized * studentized / n_params as f64) * (leverage / one_minus_h)
}

/// Compute Cook's distance for each observation.
///
/// Cook's distance measures the influence of each observation on the fitted values.
/// Observations with D_i > 4/n or D_i > 1 are typically considered influential.
pub fn cooks_distance(studentized: &Col<f64>, leverage: &Col<f64>, n_params: usize) -> Col<f64> {
    Col::from_fn(studentized.nrows(), |i| {
        cooks(studentized[i], leverage[i], n_params)
    })
}

/// Identify influential observations based on Cook's distance.
///
/// Returns indices of observations with D_i > threshold.
/// Common thresholds: 4/n or 1.
pub fn influential_cooks(cooks_d: &Col<f64>, threshold: Option<f64>) -> Vec<usize> {
    let n = cooks_d.nrows();
    let cutoff = threshold.unwrap_or(4.0 / n as f64);

    cooks_d
        .iter()
        .enumerate()
        .filter(|(_, &d)| d.is_finite() && d > cutoff)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooks_distance_non_negative() {
        let studentized = Col::from_fn(20, |i| (i as f64 - 9.5) / 5.0);
        let leverage = Col::from_fn(20, |i| 0.1 + 0.02 * i as f64);

        let cooks = cooks_distance(&studentized, &leverage, 3);

        for &d in cooks.iter() {
            assert!(d >= 0.0, "Cook's distance {d} should be >= 0");
        }
    }

    #[test]
    fn test_matches_residual_form() {
        // D = e² / (p σ²) · h / (1 - h)²
        let (e, h, sigma, p) = (1.5_f64, 0.3_f64, 0.8_f64, 2usize);
        let r = e / (sigma * (1.0 - h).sqrt());
        let expected = e * e / (p as f64 * sigma * sigma) * h / (1.0 - h).powi(2);
        assert!((cooks(r, h, p) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_cooks_influential_detection() {
        let mut studentized = Col::from_fn(20, |_| 0.1);
        let mut leverage = Col::from_fn(20, |_| 0.1);

        studentized[10] = 3.0;
        leverage[10] = 0.9;

        let cooks = cooks_distance(&studentized, &leverage, 2);
        let influential = influential_cooks(&cooks, Some(0.5));

        assert_eq!(influential, vec![10]);
    }
}
