//! Linear regression workbook.
//!
//! Fits ordinary least squares models to tabular data with numeric and
//! categorical predictors, with the statistical inference of R's `lm`:
//! standard errors, t-statistics, p-values, confidence and prediction
//! intervals, and per-observation diagnostics.
//!
//! # Example
//!
//! ```rust,ignore
//! use lm_workbook::prelude::*;
//!
//! let data = Dataset::from_csv_path("data/exercise.csv", &CsvOptions::default())?;
//! let spec: ModelSpec = "score ~ hours + section".parse()?;
//!
//! let fitted = OlsRegressor::builder()
//!     .confidence_level(0.95)
//!     .build()
//!     .fit(&data, &spec)?;
//!
//! println!("{}", ModelSummary::new(&fitted));
//!
//! // Intervals at new rows
//! let new_rows = Dataset::new()
//!     .with_numeric("hours", vec![6.0])?
//!     .with_categorical("section", ["B"])?;
//! let pi = fitted.predict_with_interval(&new_rows, Some(IntervalType::Prediction), 0.95)?;
//!
//! // Diagnostics, computed lazily
//! for obs in &fitted.diagnostics() {
//!     println!("{} {:.3}", obs.row, obs.cooks_distance);
//! }
//! ```

pub mod core;
pub mod data;
pub mod design;
pub mod diagnostics;
pub mod inference;
pub mod report;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        ConfidenceInterval, IntervalType, NaAction, PredictionResult, RegressionOptions,
        RegressionResult,
    };
    pub use crate::data::{Column, CsvOptions, Dataset};
    pub use crate::design::ModelSpec;
    pub use crate::diagnostics::{Diagnostics, ObservationDiagnostics};
    pub use crate::inference::{pearson, CorrelationTest};
    pub use crate::report::{ConfintTable, DiagnosticPlots, ModelSummary, PredictionTable};
    pub use crate::solvers::{
        FittedOls, FittedRegressor, OlsRegressor, RegressionError, Regressor,
    };
}

pub use crate::core::{IntervalType, NaAction, PredictionResult, RegressionResult};
pub use crate::data::Dataset;
pub use crate::design::ModelSpec;
pub use crate::solvers::{FittedOls, FittedRegressor, OlsRegressor, RegressionError, Regressor};
