//! Ordinary Least Squares regression solver.

use crate::core::{
    validate_level, ConfidenceInterval, IntervalType, NaAction, PredictionResult,
    RegressionOptions, RegressionOptionsBuilder, RegressionResult,
};
use crate::data::Dataset;
use crate::design::{DesignLayout, ModelFrame, ModelSpec};
use crate::diagnostics::Diagnostics;
use crate::inference::{
    compute_prediction_intervals, compute_xtx_inverse, t_critical, CoefficientInference,
};
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{aliased_columns, column_norm};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use tracing::{debug, warn};

/// Ordinary Least Squares regression estimator.
///
/// Solves `Rβ = Qᵀy` from the Householder QR decomposition of the design
/// matrix. Rank-deficient designs are rejected with the names of the aliased
/// terms rather than silently dropping columns.
///
/// # Example
///
/// ```rust,ignore
/// use lm_workbook::prelude::*;
///
/// let data = Dataset::from_csv_path("data/exercise.csv", &CsvOptions::default())?;
/// let spec: ModelSpec = "score ~ hours + section".parse()?;
///
/// let fitted = OlsRegressor::builder()
///     .confidence_level(0.97)
///     .build()
///     .fit(&data, &spec)?;
///
/// println!("R² = {}", fitted.r_squared());
/// for ci in fitted.conf_int(0.97)? {
///     println!("{}: [{}, {}]", ci.term, ci.lower, ci.upper);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    /// Create a new OLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }

    /// Options this regressor fits with.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, data: &Dataset, spec: &ModelSpec) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;

        let frame = ModelFrame::build(spec, data, self.options.na_action)?;
        let x = &frame.x;
        let y = &frame.y;
        let n_samples = x.nrows();
        let n_params = x.ncols();

        debug!(
            formula = %spec,
            n = n_samples,
            p = n_params,
            "fitting OLS"
        );

        if n_samples <= n_params {
            return Err(RegressionError::InsufficientObservations {
                n_parameters: n_params,
                got: n_samples,
            });
        }

        let coefficients = self.solve_with_qr(x, y, frame.layout.column_names())?;

        let fitted_values = x * &coefficients;
        let residuals = Col::from_fn(n_samples, |i| y[i] - fitted_values[i]);

        let xtx_inverse = compute_xtx_inverse(x, self.options.rank_tolerance)
            .map_err(|_| self.rank_deficiency(x, frame.layout.column_names()))?;

        let result = self.compute_statistics(
            &frame,
            spec,
            coefficients,
            residuals,
            fitted_values,
            &xtx_inverse,
        );

        if result.mse == 0.0 {
            warn!(
                formula = %spec,
                "essentially perfect fit: standard errors are zero and t statistics undefined"
            );
        }

        Ok(FittedOls {
            options: self.options.clone(),
            spec: spec.clone(),
            layout: frame.layout,
            design: frame.x,
            xtx_inverse,
            result,
        })
    }
}

impl OlsRegressor {
    /// Solve the least squares problem using an unpivoted QR decomposition.
    ///
    /// Column `j` is rank deficient when `|R_jj| <= tol * ||x_j||`; the
    /// offending terms are then identified left to right.
    fn solve_with_qr(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        names: &[String],
    ) -> Result<Col<f64>, RegressionError> {
        let n_params = x.ncols();
        let tol = self.options.rank_tolerance;

        let qr = x.qr();
        let q = qr.compute_Q();
        let r = qr.R();

        if (0..n_params).any(|j| r[(j, j)].abs() <= tol * column_norm(x, j)) {
            return Err(self.rank_deficiency(x, names));
        }

        let qty = q.transpose() * y;

        // Back-substitution for upper triangular system
        let mut beta = Col::zeros(n_params);
        for i in (0..n_params).rev() {
            let mut sum = qty[i];
            for j in (i + 1)..n_params {
                sum -= r[(i, j)] * beta[j];
            }
            beta[i] = sum / r[(i, i)];
        }

        Ok(beta)
    }

    /// Build the error for a rank-deficient design, naming the aliased terms.
    ///
    /// Terms are found left to right; if that search flags nothing, every
    /// column failing `|R_jj| <= tol * ||x_j||` is named instead.
    fn rank_deficiency(&self, x: &Mat<f64>, names: &[String]) -> RegressionError {
        let tol = self.options.rank_tolerance;
        let mut aliased: Vec<String> = aliased_columns(x, tol)
            .iter()
            .zip(names)
            .filter(|(&is_aliased, _)| is_aliased)
            .map(|(_, name)| name.clone())
            .collect();

        if aliased.is_empty() {
            let qr = x.qr();
            let r = qr.R();
            aliased = (0..x.ncols().min(r.nrows()))
                .filter(|&j| r[(j, j)].abs() <= tol * column_norm(x, j))
                .map(|j| names[j].clone())
                .collect();
        }

        warn!(aliased = ?aliased, "design matrix is rank deficient");
        RegressionError::RankDeficient { aliased }
    }

    /// Compute fit and inference statistics.
    fn compute_statistics(
        &self,
        frame: &ModelFrame,
        spec: &ModelSpec,
        coefficients: Col<f64>,
        residuals: Col<f64>,
        fitted_values: Col<f64>,
        xtx_inverse: &Mat<f64>,
    ) -> RegressionResult {
        let y = &frame.y;
        let n = y.nrows();
        let n_params = frame.x.ncols();
        let has_intercept = frame.layout.has_intercept();

        // TSS is centred only when the model has an intercept
        let tss: f64 = if has_intercept {
            let y_mean = y.iter().sum::<f64>() / n as f64;
            y.iter().map(|&yi| (yi - y_mean).powi(2)).sum()
        } else {
            y.iter().map(|&yi| yi * yi).sum()
        };
        let rss: f64 = residuals.iter().map(|&r| r.powi(2)).sum();

        let r_squared = if tss > 0.0 {
            1.0 - rss / tss
        } else if rss == 0.0 {
            1.0
        } else {
            0.0
        };

        let df_resid = (n - n_params) as f64;
        let (df_model, df_total) = if has_intercept {
            ((n_params - 1) as f64, (n - 1) as f64)
        } else {
            (n_params as f64, n as f64)
        };

        let adj_r_squared = 1.0 - (1.0 - r_squared) * df_total / df_resid;

        let mse = rss / df_resid;
        let sigma = mse.sqrt();

        // F-statistic
        let f_statistic = if df_model > 0.0 && mse > 0.0 {
            ((tss - rss) / df_model) / mse
        } else {
            f64::NAN
        };
        let f_pvalue = if f_statistic.is_finite() {
            FisherSnedecor::new(df_model, df_resid)
                .map_or(f64::NAN, |d| d.sf(f_statistic))
        } else {
            f64::NAN
        };

        // Gaussian log-likelihood at the ML variance RSS / n; σ counts as a parameter
        let nf = n as f64;
        let log_likelihood = -0.5 * nf * ((2.0 * std::f64::consts::PI).ln() + 1.0 + (rss / nf).ln());
        let k = (n_params + 1) as f64;
        let aic = 2.0 * k - 2.0 * log_likelihood;
        let bic = k * nf.ln() - 2.0 * log_likelihood;

        // Inference
        let std_errors = CoefficientInference::standard_errors(xtx_inverse, mse);
        let t_statistics = CoefficientInference::t_statistics(&coefficients, &std_errors);
        let p_values = CoefficientInference::p_values(&t_statistics, df_resid);
        let (conf_interval_lower, conf_interval_upper) = CoefficientInference::confidence_intervals(
            &coefficients,
            &std_errors,
            df_resid,
            self.options.confidence_level,
        );

        RegressionResult {
            response: spec.response().to_string(),
            term_names: frame.layout.column_names().to_vec(),
            coefficients,
            has_intercept,
            residuals,
            fitted_values,
            n_parameters: n_params,
            n_observations: n,
            r_squared,
            adj_r_squared,
            mse,
            sigma,
            f_statistic,
            f_pvalue,
            aic,
            bic,
            log_likelihood,
            std_errors,
            t_statistics,
            p_values,
            conf_interval_lower,
            conf_interval_upper,
            confidence_level: self.options.confidence_level,
            na_info: frame.na_info.clone(),
        }
    }
}

/// A fitted OLS regression model.
///
/// Immutable once built; every query borrows it.
#[derive(Debug, Clone)]
pub struct FittedOls {
    options: RegressionOptions,
    spec: ModelSpec,
    layout: DesignLayout,
    /// Design matrix of the rows used in the fit.
    design: Mat<f64>,
    /// (X'X)⁻¹ = R⁻¹R⁻ᵀ
    xtx_inverse: Mat<f64>,
    result: RegressionResult,
}

impl FittedOls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// The model specification this fit was built from.
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    /// Mapping from dataset columns to design columns, including the
    /// categorical lookup tables.
    pub fn layout(&self) -> &DesignLayout {
        &self.layout
    }

    /// Design matrix of the rows used in the fit.
    pub fn design(&self) -> &Mat<f64> {
        &self.design
    }

    /// Unscaled covariance (X'X)⁻¹.
    pub fn xtx_inverse(&self) -> &Mat<f64> {
        &self.xtx_inverse
    }

    /// Coefficient covariance matrix σ̂²(X'X)⁻¹.
    pub fn covariance(&self) -> Mat<f64> {
        CoefficientInference::covariance(&self.xtx_inverse, self.result.mse)
    }

    /// Coefficient confidence intervals at `level`, like R's `confint`.
    pub fn conf_int(&self, level: f64) -> Result<Vec<ConfidenceInterval<'_>>, RegressionError> {
        validate_level(level)?;
        let r = &self.result;
        let t_crit = t_critical(r.residual_df() as f64, level);

        Ok(r.term_names
            .iter()
            .enumerate()
            .map(|(j, term)| {
                let margin = t_crit * r.std_errors[j];
                ConfidenceInterval {
                    term,
                    estimate: r.coefficients[j],
                    lower: r.coefficients[j] - margin,
                    upper: r.coefficients[j] + margin,
                }
            })
            .collect())
    }

    /// Per-observation diagnostics over the rows used in the fit.
    ///
    /// Nothing is computed until the sequence is iterated.
    pub fn diagnostics(&self) -> Diagnostics<'_> {
        Diagnostics::new(&self.design, &self.xtx_inverse, &self.result)
    }

    fn predict_design(&self, x: &Mat<f64>, na_mask: &[bool]) -> Col<f64> {
        let beta = &self.result.coefficients;
        Col::from_fn(x.nrows(), |i| {
            if na_mask[i] {
                return f64::NAN;
            }
            (0..x.ncols()).map(|j| x[(i, j)] * beta[j]).sum()
        })
    }
}

impl FittedRegressor for FittedOls {
    fn predict(&self, new_data: &Dataset) -> Result<Col<f64>, RegressionError> {
        let (x, na_mask) = self.layout.encode(new_data)?;
        Ok(self.predict_design(&x, &na_mask))
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }

    fn predict_with_interval(
        &self,
        new_data: &Dataset,
        interval: Option<IntervalType>,
        level: f64,
    ) -> Result<PredictionResult, RegressionError> {
        let (x, na_mask) = self.layout.encode(new_data)?;
        let predictions = self.predict_design(&x, &na_mask);

        match interval {
            None => Ok(PredictionResult::point_only(predictions)),
            Some(interval_type) => {
                validate_level(level)?;
                let df = self.result.residual_df() as f64;

                Ok(compute_prediction_intervals(
                    &x,
                    &self.xtx_inverse,
                    &predictions,
                    self.result.mse,
                    df,
                    level,
                    interval_type,
                ))
            }
        }
    }
}

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence level for the stored coefficient intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    /// Set the relative rank tolerance.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.rank_tolerance(tol);
        self
    }

    /// Set the missing-value policy.
    pub fn na_action(mut self, action: NaAction) -> Self {
        self.builder = self.builder.na_action(action);
        self
    }

    /// Build the OLS regressor.
    ///
    /// Options are validated when the model is fit.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor::new(self.builder.build_unchecked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Dataset {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 + 3.0 * v).collect();
        Dataset::new()
            .with_numeric("x", x)
            .and_then(|d| d.with_numeric("y", y))
            .expect("valid dataset")
    }

    #[test]
    fn test_simple_fit() {
        let spec: ModelSpec = "y ~ x".parse().expect("valid formula");
        let fitted = OlsRegressor::default()
            .fit(&line(5), &spec)
            .expect("model should fit");

        assert!((fitted.coefficients()[1] - 3.0).abs() < 1e-10);
        assert!((fitted.intercept().expect("intercept exists") - 2.0).abs() < 1e-10);
        assert_eq!(fitted.result().term_names, vec!["(Intercept)", "x"]);
    }

    #[test]
    fn test_predict() {
        let spec: ModelSpec = "y ~ x".parse().expect("valid formula");
        let fitted = OlsRegressor::default()
            .fit(&line(5), &spec)
            .expect("model should fit");

        let new_data = Dataset::new()
            .with_numeric("x", vec![10.0, 11.0])
            .expect("valid dataset");
        let preds = fitted.predict(&new_data).expect("prediction succeeds");

        assert!((preds[0] - (2.0 + 3.0 * 10.0)).abs() < 1e-10);
        assert!((preds[1] - (2.0 + 3.0 * 11.0)).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_options_rejected_at_fit() {
        let spec: ModelSpec = "y ~ x".parse().expect("valid formula");
        let err = OlsRegressor::builder()
            .confidence_level(1.5)
            .build()
            .fit(&line(5), &spec)
            .unwrap_err();
        assert!(matches!(err, RegressionError::InvalidOptions(_)));
    }

    #[test]
    fn test_exact_fit_needs_residual_df() {
        let spec: ModelSpec = "y ~ x".parse().expect("valid formula");
        let err = OlsRegressor::default().fit(&line(2), &spec).unwrap_err();
        assert!(matches!(
            err,
            RegressionError::InsufficientObservations {
                n_parameters: 2,
                got: 2
            }
        ));
    }

    #[test]
    fn test_rank_deficiency_names_aliased_term() {
        let data = line(6)
            .with_numeric("twice", (0..6).map(|i| 2.0 * i as f64).collect())
            .expect("valid dataset");
        let spec: ModelSpec = "y ~ x + twice".parse().expect("valid formula");
        let err = OlsRegressor::default().fit(&data, &spec).unwrap_err();

        match err {
            RegressionError::RankDeficient { aliased } => assert_eq!(aliased, vec!["twice"]),
            other => panic!("expected rank deficiency, got {other:?}"),
        }
    }

    #[test]
    fn test_rank_tolerance_is_applied_and_names_terms() {
        let near: Vec<f64> = (0..10)
            .map(|i| i as f64 + if i % 2 == 1 { 1e-4 } else { 0.0 })
            .collect();
        let data = line(10).with_numeric("near", near).expect("valid dataset");
        let spec: ModelSpec = "y ~ x + near".parse().expect("valid formula");

        assert!(OlsRegressor::default().fit(&data, &spec).is_ok());

        let err = OlsRegressor::builder()
            .rank_tolerance(1e-3)
            .build()
            .fit(&data, &spec)
            .unwrap_err();
        match err {
            RegressionError::RankDeficient { aliased } => assert_eq!(aliased, vec!["near"]),
            other => panic!("expected rank deficiency, got {other:?}"),
        }
    }

    #[test]
    fn test_conf_int_rejects_bad_level() {
        let spec: ModelSpec = "y ~ x".parse().expect("valid formula");
        let fitted = OlsRegressor::default()
            .fit(&line(5), &spec)
            .expect("model should fit");
        assert!(fitted.conf_int(0.0).is_err());
        assert_eq!(fitted.conf_int(0.9).expect("valid level").len(), 2);
    }
}
