//! Core types for linear model analysis.

mod na_action;
mod options;
mod prediction;
mod result;

pub use na_action::{NaAction, NaError, NaHandler, NaInfo, NaResult};
pub use options::{validate_level, OptionsError, RegressionOptions, RegressionOptionsBuilder};
pub use prediction::{IntervalType, PredictionResult};
pub use result::{CoefficientRow, ConfidenceInterval, RegressionResult};
