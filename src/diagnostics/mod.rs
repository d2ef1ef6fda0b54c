//! Regression diagnostics (leverage, residuals, Cook's distance, VIF).
//!
//! - **Leverage**: Identifies observations with unusual predictor values
//! - **Residuals**: Standardized and studentized residuals for outlier detection
//! - **Influence**: Cook's distance for influential point detection
//! - **VIF**: Variance Inflation Factor for multicollinearity detection
//!
//! [`Diagnostics`] ties these to a fitted model as a lazy sequence of
//! per-observation records.
//!
//! # Example
//!
//! ```rust,ignore
//! let diagnostics = fitted.diagnostics();
//!
//! for obs in &diagnostics {
//!     println!("{} h={:.3} D={:.3}", obs.row, obs.leverage, obs.cooks_distance);
//! }
//!
//! let influential = diagnostics.influential();
//! let collinear = diagnostics.vif();
//! ```

mod influence;
mod leverage;
mod observations;
mod residuals;
mod vif;

pub use influence::{cooks, cooks_distance, influential_cooks};
pub use leverage::{compute_leverage, high_leverage_points, leverage_at};
pub use observations::{Diagnostics, DiagnosticsIter, ObservationDiagnostics};
pub use residuals::{
    externally_studentized, externally_studentized_residuals, residual_outliers, standardized,
    standardized_residuals, studentized, studentized_residuals,
};
pub use vif::{high_vif_predictors, variance_inflation_factor};
