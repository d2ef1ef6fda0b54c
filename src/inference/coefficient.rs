//! Coefficient inference calculations.

use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Standard Student t distribution with `df` degrees of freedom.
pub(crate) fn students_t(df: f64) -> Option<StudentsT> {
    if df > 0.0 {
        StudentsT::new(0.0, 1.0, df).ok()
    } else {
        None
    }
}

/// Two-sided critical value t_{1-α/2, df}; NaN when `df <= 0`.
pub fn t_critical(df: f64, confidence_level: f64) -> f64 {
    let alpha = 1.0 - confidence_level;
    students_t(df).map_or(f64::NAN, |d| d.inverse_cdf(1.0 - alpha / 2.0))
}

/// Computes inference statistics for regression coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Standard errors from the unscaled covariance matrix.
    ///
    /// SE(β_j) = sqrt(σ² * (X'X)^(-1)_{jj})
    pub fn standard_errors(xtx_inv: &Mat<f64>, mse: f64) -> Col<f64> {
        Col::from_fn(xtx_inv.nrows(), |j| {
            let var = mse * xtx_inv[(j, j)];
            if var >= 0.0 {
                var.sqrt()
            } else {
                f64::NAN
            }
        })
    }

    /// Coefficient covariance matrix σ²(X'X)⁻¹.
    pub fn covariance(xtx_inv: &Mat<f64>, mse: f64) -> Mat<f64> {
        Mat::from_fn(xtx_inv.nrows(), xtx_inv.ncols(), |i, j| mse * xtx_inv[(i, j)])
    }

    /// Compute t-statistics for coefficients.
    ///
    /// t_j = β_j / SE(β_j)
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        Col::from_fn(coefficients.nrows(), |j| {
            if std_errors[j].is_nan() || std_errors[j] == 0.0 {
                f64::NAN
            } else {
                coefficients[j] / std_errors[j]
            }
        })
    }

    /// Compute p-values from t-statistics.
    ///
    /// p_j = 2 * P(T > |t_j|) where T ~ t(df)
    pub fn p_values(t_statistics: &Col<f64>, df: f64) -> Col<f64> {
        let t_dist = students_t(df);

        Col::from_fn(t_statistics.nrows(), |j| match &t_dist {
            Some(dist) if !t_statistics[j].is_nan() => 2.0 * dist.sf(t_statistics[j].abs()),
            _ => f64::NAN,
        })
    }

    /// Compute confidence intervals for coefficients.
    ///
    /// CI_j = β_j ± t_{α/2, df} * SE(β_j)
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        df: f64,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let t_crit = t_critical(df, confidence_level);
        let n = coefficients.nrows();

        let lower = Col::from_fn(n, |j| coefficients[j] - t_crit * std_errors[j]);
        let upper = Col::from_fn(n, |j| coefficients[j] + t_crit * std_errors[j]);

        (lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_statistics() {
        let coefficients = Col::from_fn(3, |i| (i + 1) as f64);
        let std_errors = Col::from_fn(3, |_| 0.5);

        let t_stats = CoefficientInference::t_statistics(&coefficients, &std_errors);

        assert!((t_stats[0] - 2.0).abs() < 1e-10);
        assert!((t_stats[1] - 4.0).abs() < 1e-10);
        assert!((t_stats[2] - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_standard_error_gives_nan() {
        let coefficients = Col::from_fn(1, |_| 1.0);
        let std_errors = Col::zeros(1);
        let t_stats = CoefficientInference::t_statistics(&coefficients, &std_errors);
        assert!(t_stats[0].is_nan());
    }

    #[test]
    fn test_p_values_bounds() {
        let t_stats = Col::from_fn(3, |i| (i + 1) as f64);
        let p_vals = CoefficientInference::p_values(&t_stats, 10.0);

        for p in p_vals.iter() {
            assert!(*p >= 0.0 && *p <= 1.0);
        }
        assert!(p_vals[0] > p_vals[1] && p_vals[1] > p_vals[2]);
    }

    #[test]
    fn test_p_value_reference() {
        // qt(0.975, 10) = 2.228139
        let t_stats = Col::from_fn(1, |_| 2.228138851986);
        let p_vals = CoefficientInference::p_values(&t_stats, 10.0);
        assert!((p_vals[0] - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_t_critical_reference() {
        assert!((t_critical(10.0, 0.95) - 2.228138851986).abs() < 1e-6);
        assert!(t_critical(0.0, 0.95).is_nan());
    }

    #[test]
    fn test_interval_width_grows_with_level() {
        let coefficients = Col::from_fn(1, |_| 1.0);
        let std_errors = Col::from_fn(1, |_| 0.3);

        let mut last = 0.0;
        for level in [0.5, 0.8, 0.9, 0.95, 0.97, 0.99] {
            let (lo, hi) =
                CoefficientInference::confidence_intervals(&coefficients, &std_errors, 12.0, level);
            let width = hi[0] - lo[0];
            assert!(width > last);
            last = width;
        }
    }

    #[test]
    fn test_standard_errors_from_inverse() {
        let xtx_inv = Mat::from_fn(2, 2, |i, j| if i == j { 0.25 * (i + 1) as f64 } else { 0.1 });
        let se = CoefficientInference::standard_errors(&xtx_inv, 4.0);
        assert!((se[0] - 1.0).abs() < 1e-12);
        assert!((se[1] - 2.0_f64.sqrt()).abs() < 1e-12);
    }
}
