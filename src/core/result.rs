//! Regression result structures.

use super::na_action::NaInfo;
use faer::Col;

/// Complete result from a linear model fit.
///
/// Coefficients are stored in design-matrix order, so the intercept (when
/// present) is the first entry and is named `(Intercept)`.
#[derive(Debug, Clone)]
pub struct RegressionResult {
    // ========== Core Results ==========
    /// Name of the response variable.
    pub response: String,

    /// Term names, one per design column.
    pub term_names: Vec<String>,

    /// Estimated coefficients.
    pub coefficients: Col<f64>,

    /// Whether the first coefficient is an intercept.
    pub has_intercept: bool,

    /// Residuals (y - fitted_values).
    pub residuals: Col<f64>,

    /// Fitted values (predictions on training data).
    pub fitted_values: Col<f64>,

    /// Number of parameters p (design columns, including intercept).
    pub n_parameters: usize,

    /// Number of observations used in the fit.
    pub n_observations: usize,

    // ========== Fit Statistics ==========
    /// Coefficient of determination (R²).
    pub r_squared: f64,

    /// Adjusted R².
    pub adj_r_squared: f64,

    /// Residual variance estimate σ̂² = RSS / (n - p).
    pub mse: f64,

    /// Residual standard error σ̂.
    pub sigma: f64,

    /// F-statistic for overall model significance.
    pub f_statistic: f64,

    /// P-value for F-statistic.
    pub f_pvalue: f64,

    // ========== Information Criteria ==========
    /// Akaike Information Criterion.
    pub aic: f64,

    /// Bayesian Information Criterion.
    pub bic: f64,

    /// Gaussian log-likelihood.
    pub log_likelihood: f64,

    // ========== Inference Statistics ==========
    /// Standard errors of coefficients.
    pub std_errors: Col<f64>,

    /// t-statistics for coefficients.
    pub t_statistics: Col<f64>,

    /// Two-sided p-values for coefficient significance tests.
    pub p_values: Col<f64>,

    /// Lower bounds of confidence intervals at `confidence_level`.
    pub conf_interval_lower: Col<f64>,

    /// Upper bounds of confidence intervals at `confidence_level`.
    pub conf_interval_upper: Col<f64>,

    /// Confidence level used for the stored intervals.
    pub confidence_level: f64,

    // ========== NA Handling Information ==========
    /// Rows removed before fitting, if any.
    pub na_info: NaInfo,
}

/// One row of the coefficient table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientRow<'a> {
    pub term: &'a str,
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
}

/// One row of a coefficient confidence-interval table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval<'a> {
    pub term: &'a str,
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

impl RegressionResult {
    /// Residual degrees of freedom (n - p).
    pub fn residual_df(&self) -> usize {
        self.n_observations.saturating_sub(self.n_parameters)
    }

    /// Model degrees of freedom (p - 1 if intercept, else p).
    pub fn model_df(&self) -> usize {
        if self.has_intercept {
            self.n_parameters.saturating_sub(1)
        } else {
            self.n_parameters
        }
    }

    /// The intercept estimate, if the model has one.
    pub fn intercept(&self) -> Option<f64> {
        self.has_intercept.then(|| self.coefficients[0])
    }

    /// Position of a term in the coefficient vector.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.term_names.iter().position(|name| name == term)
    }

    /// Coefficient estimate for a named term.
    pub fn coefficient(&self, term: &str) -> Option<f64> {
        self.term_index(term).map(|j| self.coefficients[j])
    }

    /// Full coefficient table row for a named term.
    pub fn coefficient_row(&self, term: &str) -> Option<CoefficientRow<'_>> {
        self.term_index(term).map(|j| self.row(j))
    }

    /// Iterate over the coefficient table in design order.
    pub fn coefficient_table(&self) -> impl Iterator<Item = CoefficientRow<'_>> + '_ {
        (0..self.term_names.len()).map(move |j| self.row(j))
    }

    fn row(&self, j: usize) -> CoefficientRow<'_> {
        CoefficientRow {
            term: &self.term_names[j],
            estimate: self.coefficients[j],
            std_error: self.std_errors[j],
            t_value: self.t_statistics[j],
            p_value: self.p_values[j],
        }
    }

    /// Total sum of squares, centred when the model has an intercept.
    pub fn tss(&self) -> f64 {
        let ys: Vec<f64> = self
            .residuals
            .iter()
            .zip(self.fitted_values.iter())
            .map(|(&r, &f)| f + r)
            .collect();

        if self.has_intercept {
            let y_mean = ys.iter().sum::<f64>() / ys.len() as f64;
            ys.iter().map(|y| (y - y_mean).powi(2)).sum()
        } else {
            ys.iter().map(|y| y * y).sum()
        }
    }

    /// Residual sum of squares (RSS).
    pub fn rss(&self) -> f64 {
        self.residuals.iter().map(|&r| r.powi(2)).sum()
    }

    /// Explained sum of squares (ESS = TSS - RSS).
    pub fn ess(&self) -> f64 {
        self.tss() - self.rss()
    }

    /// Residuals padded to the input length (for `NaAction::Exclude`).
    pub fn residuals_expanded(&self) -> Col<f64> {
        self.na_info.expand(&self.residuals)
    }

    /// Fitted values padded to the input length (for `NaAction::Exclude`).
    pub fn fitted_expanded(&self) -> Col<f64> {
        self.na_info.expand(&self.fitted_values)
    }

    /// Number of rows removed due to missing values.
    pub fn n_na_removed(&self) -> usize {
        self.na_info.n_removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NaAction;

    fn result(n: usize, p: usize, has_intercept: bool) -> RegressionResult {
        RegressionResult {
            response: "y".to_string(),
            term_names: (0..p).map(|j| format!("x{j}")).collect(),
            coefficients: Col::from_fn(p, |j| (j + 1) as f64),
            has_intercept,
            residuals: Col::zeros(n),
            fitted_values: Col::zeros(n),
            n_parameters: p,
            n_observations: n,
            r_squared: 0.0,
            adj_r_squared: 0.0,
            mse: 0.0,
            sigma: 0.0,
            f_statistic: 0.0,
            f_pvalue: 1.0,
            aic: 0.0,
            bic: 0.0,
            log_likelihood: 0.0,
            std_errors: Col::zeros(p),
            t_statistics: Col::zeros(p),
            p_values: Col::zeros(p),
            conf_interval_lower: Col::zeros(p),
            conf_interval_upper: Col::zeros(p),
            confidence_level: 0.95,
            na_info: NaInfo::no_na(n, NaAction::Omit),
        }
    }

    #[test]
    fn test_degrees_of_freedom() {
        let r = result(100, 4, true);
        assert_eq!(r.residual_df(), 96);
        assert_eq!(r.model_df(), 3);

        let r = result(100, 3, false);
        assert_eq!(r.model_df(), 3);
    }

    #[test]
    fn test_named_lookup() {
        let r = result(10, 3, true);
        assert_eq!(r.intercept(), Some(1.0));
        assert_eq!(r.coefficient("x2"), Some(3.0));
        assert_eq!(r.coefficient("missing"), None);
        assert_eq!(r.coefficient_table().count(), 3);
    }

    #[test]
    fn test_no_intercept() {
        let r = result(10, 2, false);
        assert_eq!(r.intercept(), None);
    }

    #[test]
    fn test_tss_rss_ess() {
        let mut r = result(5, 2, true);
        // y = [1, 2, 3, 4, 5]
        r.fitted_values = Col::from_fn(5, |i| [1.1, 2.0, 2.9, 4.0, 5.1][i]);
        r.residuals = Col::from_fn(5, |i| [-0.1, 0.0, 0.1, 0.0, -0.1][i]);

        assert!((r.rss() - 0.03).abs() < 1e-10);
        assert!((r.tss() - 10.0).abs() < 1e-10);
        assert!((r.ess() - (r.tss() - r.rss())).abs() < 1e-10);
    }
}
