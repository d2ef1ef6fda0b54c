//! Lazy per-observation diagnostics over a fitted model.

use super::influence::{cooks, cooks_distance, influential_cooks};
use super::leverage::{compute_leverage, high_leverage_points, leverage_at};
use super::residuals::{
    externally_studentized, externally_studentized_residuals, residual_outliers, standardized,
    standardized_residuals, studentized, studentized_residuals,
};
use super::vif::variance_inflation_factor;
use crate::core::RegressionResult;
use faer::{Col, Mat};
use std::iter::FusedIterator;

/// Diagnostic record for one observation used in the fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationDiagnostics {
    /// Position among the rows used in the fit.
    pub index: usize,
    /// Row in the input dataset (differs from `index` when rows were dropped).
    pub row: usize,
    pub fitted: f64,
    pub residual: f64,
    /// e / σ̂
    pub standardized_residual: f64,
    /// e / (σ̂ √(1 - h))
    pub studentized_residual: f64,
    /// Studentized with the leave-one-out σ̂.
    pub externally_studentized_residual: f64,
    pub leverage: f64,
    pub cooks_distance: f64,
}

/// Read-only view of a fitted model's diagnostics.
///
/// Cheap to copy. Every record is computed when it is requested, and the view
/// can be iterated any number of times with identical results.
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics<'a> {
    design: &'a Mat<f64>,
    xtx_inv: &'a Mat<f64>,
    result: &'a RegressionResult,
}

impl<'a> Diagnostics<'a> {
    pub fn new(design: &'a Mat<f64>, xtx_inv: &'a Mat<f64>, result: &'a RegressionResult) -> Self {
        Self {
            design,
            xtx_inv,
            result,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.result.n_observations
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Diagnostics for observation `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<ObservationDiagnostics> {
        if index >= self.len() {
            return None;
        }

        let r = self.result;
        let residual = r.residuals[index];
        let h = leverage_at(self.design, self.xtx_inv, index);
        let stud = studentized(residual, h, r.sigma);

        Some(ObservationDiagnostics {
            index,
            row: r.na_info.kept_indices.get(index).copied().unwrap_or(index),
            fitted: r.fitted_values[index],
            residual,
            standardized_residual: standardized(residual, r.sigma),
            studentized_residual: stud,
            externally_studentized_residual: externally_studentized(
                residual,
                h,
                r.mse * r.residual_df() as f64,
                r.residual_df(),
            ),
            leverage: h,
            cooks_distance: cooks(stud, h, r.n_parameters),
        })
    }

    /// Iterate over every observation in fit order.
    pub fn iter(&self) -> DiagnosticsIter<'a> {
        DiagnosticsIter {
            diagnostics: *self,
            front: 0,
            back: self.len(),
        }
    }

    pub fn residuals(&self) -> &'a Col<f64> {
        &self.result.residuals
    }

    pub fn fitted_values(&self) -> &'a Col<f64> {
        &self.result.fitted_values
    }

    /// Hat values for all observations.
    pub fn leverage(&self) -> Col<f64> {
        compute_leverage(self.design, self.xtx_inv)
    }

    pub fn standardized_residuals(&self) -> Col<f64> {
        standardized_residuals(&self.result.residuals, self.result.sigma)
    }

    pub fn studentized_residuals(&self) -> Col<f64> {
        studentized_residuals(&self.result.residuals, &self.leverage(), self.result.sigma)
    }

    pub fn externally_studentized_residuals(&self) -> Col<f64> {
        externally_studentized_residuals(
            &self.result.residuals,
            &self.leverage(),
            self.result.n_parameters,
        )
    }

    pub fn cooks_distance(&self) -> Col<f64> {
        let leverage = self.leverage();
        let stud = studentized_residuals(&self.result.residuals, &leverage, self.result.sigma);
        cooks_distance(&stud, &leverage, self.result.n_parameters)
    }

    /// Observations with leverage above 2p/n.
    pub fn high_leverage(&self) -> Vec<usize> {
        high_leverage_points(&self.leverage(), self.result.n_parameters, None)
    }

    /// Observations with Cook's distance above 4/n.
    pub fn influential(&self) -> Vec<usize> {
        influential_cooks(&self.cooks_distance(), None)
    }

    /// Observations whose externally studentized residual exceeds `threshold`
    /// in absolute value.
    pub fn outliers(&self, threshold: f64) -> Vec<usize> {
        residual_outliers(&self.externally_studentized_residuals(), threshold)
    }

    /// Variance inflation factor per non-intercept design column.
    pub fn vif(&self) -> Vec<(&'a str, f64)> {
        let vif = variance_inflation_factor(self.design, self.result.has_intercept);
        let skip = usize::from(self.result.has_intercept);

        self.result.term_names[skip..]
            .iter()
            .zip(vif.iter())
            .map(|(name, &v)| (name.as_str(), v))
            .collect()
    }
}

impl<'a> IntoIterator for Diagnostics<'a> {
    type Item = ObservationDiagnostics;
    type IntoIter = DiagnosticsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Diagnostics<'a> {
    type Item = ObservationDiagnostics;
    type IntoIter = DiagnosticsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`ObservationDiagnostics`].
#[derive(Debug, Clone)]
pub struct DiagnosticsIter<'a> {
    diagnostics: Diagnostics<'a>,
    front: usize,
    back: usize,
}

impl Iterator for DiagnosticsIter<'_> {
    type Item = ObservationDiagnostics;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.diagnostics.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for DiagnosticsIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.diagnostics.get(self.back)
    }
}

impl ExactSizeIterator for DiagnosticsIter<'_> {}

impl FusedIterator for DiagnosticsIter<'_> {}
