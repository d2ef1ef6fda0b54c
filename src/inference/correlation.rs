//! Pearson correlation with the classical t-test and Fisher-z interval.

use super::coefficient::students_t;
use crate::core::{validate_level, OptionsError};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;
use thiserror::Error;

/// Errors raised by the correlation test.
#[derive(Debug, Error, PartialEq)]
pub enum CorrelationError {
    #[error("x has {x_len} values but y has {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("need at least 3 complete pairs, got {0}")]
    TooFewPairs(usize),

    #[error("a variable has zero variance")]
    ZeroVariance,

    #[error(transparent)]
    InvalidLevel(#[from] OptionsError),
}

/// Result of `cor.test(x, y, method = "pearson")`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationTest {
    /// Sample correlation coefficient r.
    pub estimate: f64,
    /// t = r * sqrt(df / (1 - r²)).
    pub t_statistic: f64,
    /// Degrees of freedom n - 2.
    pub df: f64,
    /// Two-sided p-value for H0: ρ = 0.
    pub p_value: f64,
    /// Confidence interval for ρ.
    pub conf_interval: (f64, f64),
    pub confidence_level: f64,
    /// Number of complete pairs used.
    pub n: usize,
}

/// Pearson correlation test on the complete pairs of `x` and `y`.
///
/// Pairs where either value is missing (`NaN`) are skipped.
pub fn pearson(x: &[f64], y: &[f64], confidence_level: f64) -> Result<CorrelationTest, CorrelationError> {
    validate_level(confidence_level)?;
    if x.len() != y.len() {
        return Err(CorrelationError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }

    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();
    let n = pairs.len();
    if n < 3 {
        return Err(CorrelationError::TooFewPairs(n));
    }

    let nf = n as f64;
    let x_mean = pairs.iter().map(|p| p.0).sum::<f64>() / nf;
    let y_mean = pairs.iter().map(|p| p.1).sum::<f64>() / nf;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(a, b) in &pairs {
        sxy += (a - x_mean) * (b - y_mean);
        sxx += (a - x_mean).powi(2);
        syy += (b - y_mean).powi(2);
    }
    if sxx == 0.0 || syy == 0.0 {
        return Err(CorrelationError::ZeroVariance);
    }

    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    let df = nf - 2.0;

    let t_statistic = r * (df / (1.0 - r * r)).sqrt();
    let p_value = if t_statistic.is_finite() {
        students_t(df).map_or(f64::NAN, |d| 2.0 * d.sf(t_statistic.abs()))
    } else {
        0.0
    };

    let conf_interval = if n > 3 {
        let z = r.atanh();
        let se = 1.0 / (nf - 3.0).sqrt();
        let q = Normal::new(0.0, 1.0)
            .map(|d| d.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0))
            .unwrap_or(f64::NAN);
        ((z - q * se).tanh(), (z + q * se).tanh())
    } else {
        (f64::NAN, f64::NAN)
    };

    Ok(CorrelationTest {
        estimate: r,
        t_statistic,
        df,
        p_value,
        conf_interval,
        confidence_level,
        n,
    })
}

impl fmt::Display for CorrelationTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pearson's product-moment correlation")?;
        writeln!(f)?;
        writeln!(
            f,
            "t = {:.4}, df = {}, p-value = {}",
            self.t_statistic,
            self.df,
            crate::report::format_p_value(self.p_value)
        )?;
        writeln!(f, "alternative hypothesis: true correlation is not equal to 0")?;
        writeln!(f, "{} percent confidence interval:", self.confidence_level * 100.0)?;
        writeln!(f, " {:.6} {:.6}", self.conf_interval.0, self.conf_interval.1)?;
        writeln!(f, "sample estimates:")?;
        write!(f, "      cor\n{:.7}", self.estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_correlation() {
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 - 2.0 * v).collect();

        let test = pearson(&x, &y, 0.95).expect("valid input");
        assert_relative_eq!(test.estimate, -1.0, epsilon = 1e-12);
        assert_eq!(test.p_value, 0.0);
    }

    #[test]
    fn test_reference_values() {
        // cor.test(c(1,2,3,4,5), c(2,1,4,3,5))
        // r = 0.8, t = 2.3094, df = 3, p-value = 0.1041
        // 95 percent CI: -0.2796 0.9868
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];

        let test = pearson(&x, &y, 0.95).expect("valid input");
        assert_relative_eq!(test.estimate, 0.8, epsilon = 1e-12);
        assert_relative_eq!(test.t_statistic, 2.309401, epsilon = 1e-5);
        assert_relative_eq!(test.p_value, 0.1040880, epsilon = 1e-4);
        assert_relative_eq!(test.conf_interval.0, -0.2796283, epsilon = 1e-4);
        assert_relative_eq!(test.conf_interval.1, 0.9868266, epsilon = 1e-4);
    }

    #[test]
    fn test_skips_missing_pairs() {
        let x = [1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0];
        let y = [2.0, 4.0, 1.0, 8.0, f64::NAN, 12.0];
        let test = pearson(&x, &y, 0.9).expect("valid input");
        assert_eq!(test.n, 4);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            pearson(&[1.0, 2.0], &[1.0], 0.95).unwrap_err(),
            CorrelationError::LengthMismatch { x_len: 2, y_len: 1 }
        );
        assert_eq!(
            pearson(&[1.0, 2.0], &[1.0, 3.0], 0.95).unwrap_err(),
            CorrelationError::TooFewPairs(2)
        );
        assert_eq!(
            pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0], 0.95).unwrap_err(),
            CorrelationError::ZeroVariance
        );
        assert!(matches!(
            pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0], 1.0),
            Err(CorrelationError::InvalidLevel(_))
        ));
    }
}
