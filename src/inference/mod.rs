//! Statistical inference (standard errors, p-values, intervals, correlation).

mod coefficient;
mod correlation;
mod prediction;

pub use coefficient::{t_critical, CoefficientInference};
pub(crate) use coefficient::students_t;
pub use correlation::{pearson, CorrelationError, CorrelationTest};
pub use prediction::{compute_matrix_inverse, compute_prediction_intervals, compute_xtx_inverse};
pub(crate) use prediction::quadratic_form;
