//! Prediction types for interval estimation.

use faer::Col;
use std::fmt;

/// Type of interval to compute for predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntervalType {
    /// Confidence interval for the mean response E[Y|X=x₀].
    /// Narrower - only accounts for uncertainty in coefficient estimates.
    Confidence,

    /// Prediction interval for a new observation Y|X=x₀.
    /// Wider - also accounts for residual variance (irreducible error).
    #[default]
    Prediction,
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalType::Confidence => write!(f, "confidence"),
            IntervalType::Prediction => write!(f, "prediction"),
        }
    }
}

/// Result of prediction with optional intervals.
#[derive(Debug, Clone)]
pub struct PredictionResult {
    /// Point predictions.
    pub fit: Col<f64>,
    /// Lower bounds of the interval (equal to `fit` when no interval was requested).
    pub lower: Col<f64>,
    /// Upper bounds of the interval (equal to `fit` when no interval was requested).
    pub upper: Col<f64>,
    /// Standard error used for the interval half-width.
    pub se: Col<f64>,
    /// Interval type, if one was requested.
    pub interval: Option<IntervalType>,
    /// Confidence level of the interval.
    pub level: f64,
}

/// One row of a prediction table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRow {
    pub fit: f64,
    pub lower: f64,
    pub upper: f64,
    pub se: f64,
}

impl PredictionResult {
    /// Point predictions only (no intervals).
    pub fn point_only(fit: Col<f64>) -> Self {
        let n = fit.nrows();
        Self {
            lower: fit.clone(),
            upper: fit.clone(),
            fit,
            se: Col::zeros(n),
            interval: None,
            level: f64::NAN,
        }
    }

    /// Predictions with interval bounds.
    pub fn with_intervals(
        fit: Col<f64>,
        lower: Col<f64>,
        upper: Col<f64>,
        se: Col<f64>,
        interval: IntervalType,
        level: f64,
    ) -> Self {
        Self {
            fit,
            lower,
            upper,
            se,
            interval: Some(interval),
            level,
        }
    }

    /// Number of predictions.
    pub fn len(&self) -> usize {
        self.fit.nrows()
    }

    /// Returns true if there are no predictions.
    pub fn is_empty(&self) -> bool {
        self.fit.nrows() == 0
    }

    /// Width of each interval.
    pub fn widths(&self) -> Col<f64> {
        Col::from_fn(self.len(), |i| self.upper[i] - self.lower[i])
    }

    /// Iterate over prediction rows.
    pub fn rows(&self) -> impl Iterator<Item = PredictionRow> + '_ {
        (0..self.len()).map(move |i| PredictionRow {
            fit: self.fit[i],
            lower: self.lower[i],
            upper: self.upper[i],
            se: self.se[i],
        })
    }
}
