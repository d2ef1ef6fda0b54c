//! Core traits for regression estimators.

use crate::core::{IntervalType, NaError, OptionsError, PredictionResult, RegressionResult};
use crate::data::{DataError, Dataset};
use crate::design::ModelSpec;
use faer::Col;
use thiserror::Error;

/// Errors that can occur while fitting or querying a model.
#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("invalid model specification: {0}")]
    InvalidSpecification(String),

    #[error("column '{0}' must be numeric")]
    NotNumeric(String),

    #[error("insufficient observations: need more than {n_parameters}, got {got}")]
    InsufficientObservations { n_parameters: usize, got: usize },

    #[error("design matrix is rank deficient; aliased terms: {}", aliased.join(", "))]
    RankDeficient { aliased: Vec<String> },

    #[error("level '{level}' of '{variable}' was not seen during fitting")]
    UnseenCategory { variable: String, level: String },

    #[error(transparent)]
    MissingValues(#[from] NaError),

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// A regression estimator that can be fit to a dataset.
///
/// Fitting returns a separate fitted model, which is immutable and answers
/// every later query (summary, intervals, prediction, diagnostics).
pub trait Regressor {
    /// The type of the fitted model.
    type Fitted: FittedRegressor;

    /// Fit the model described by `spec` to `data`.
    fn fit(&self, data: &Dataset, spec: &ModelSpec) -> Result<Self::Fitted, RegressionError>;
}

/// A fitted regression model that can make predictions.
pub trait FittedRegressor {
    /// Point predictions for the rows of `new_data`.
    ///
    /// `new_data` must contain every predictor used by the model; categorical
    /// labels must be levels seen during fitting.
    fn predict(&self, new_data: &Dataset) -> Result<Col<f64>, RegressionError>;

    /// Access the regression results (coefficients, statistics, etc.).
    fn result(&self) -> &RegressionResult;

    /// Get the coefficients (convenience method).
    fn coefficients(&self) -> &Col<f64> {
        &self.result().coefficients
    }

    /// Get the intercept (convenience method).
    fn intercept(&self) -> Option<f64> {
        self.result().intercept()
    }

    /// Get R² (convenience method).
    fn r_squared(&self) -> f64 {
        self.result().r_squared
    }

    /// Calculate the score (R²) on new data that includes the response column.
    fn score(&self, data: &Dataset) -> Result<f64, RegressionError> {
        let predictions = self.predict(data)?;
        let y = data.numeric(&self.result().response)?;

        let pairs: Vec<(f64, f64)> = y
            .iter()
            .zip(predictions.iter())
            .filter(|(yi, pi)| yi.is_finite() && pi.is_finite())
            .map(|(&yi, &pi)| (yi, pi))
            .collect();
        let n = pairs.len();

        let y_mean: f64 = pairs.iter().map(|(yi, _)| yi).sum::<f64>() / n as f64;
        let tss: f64 = pairs.iter().map(|(yi, _)| (yi - y_mean).powi(2)).sum();
        let rss: f64 = pairs.iter().map(|(yi, pi)| (yi - pi).powi(2)).sum();

        Ok(if tss == 0.0 {
            if rss == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - rss / tss
        })
    }

    /// Make predictions with confidence or prediction intervals.
    ///
    /// This follows R's `predict(..., interval = "confidence" | "prediction")`.
    ///
    /// # Arguments
    /// * `new_data` - New covariate rows
    /// * `interval` - `None` for point predictions only,
    ///   `Some(IntervalType::Confidence)` for intervals on the mean response,
    ///   `Some(IntervalType::Prediction)` for intervals on new observations
    /// * `level` - Confidence level (e.g., 0.95 for 95% intervals)
    fn predict_with_interval(
        &self,
        new_data: &Dataset,
        interval: Option<IntervalType>,
        level: f64,
    ) -> Result<PredictionResult, RegressionError>;
}
