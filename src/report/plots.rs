//! Point series for the standard `plot(lm)` diagnostic panels.

use super::ReportError;
use crate::design::Term;
use crate::solvers::{FittedOls, FittedRegressor};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Plotting positions `(i - a) / (n + 1 - 2a)` with `a = 3/8` for n ≤ 10,
/// else `1/2`.
pub fn ppoints(n: usize) -> Vec<f64> {
    let a = if n <= 10 { 3.0 / 8.0 } else { 0.5 };
    let denom = n as f64 + 1.0 - 2.0 * a;
    (1..=n).map(|i| (i as f64 - a) / denom).collect()
}

/// A named table of numeric columns, one row per plotted point.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl PlotSeries {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<f64>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let j = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[j]).collect())
    }

    /// Write the series as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|v| v.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// The diagnostic plot series of a fitted model.
///
/// - `scatter`: observed and fitted values against the predictor, sorted by
///   the predictor (single numeric predictor only)
/// - `residuals_vs_fitted`
/// - `normal_qq`: sorted studentized residuals against normal quantiles
/// - `scale_location`: `sqrt(|studentized residual|)` against fitted
/// - `residuals_vs_leverage`: studentized residuals and Cook's distance
///   against leverage
#[derive(Debug, Clone)]
pub struct DiagnosticPlots {
    series: Vec<PlotSeries>,
}

impl DiagnosticPlots {
    pub fn from_fit(fitted: &FittedOls) -> Self {
        let result = fitted.result();
        let observations: Vec<_> = fitted.diagnostics().iter().collect();
        let mut series = Vec::with_capacity(5);

        if let Some(column) = single_numeric_predictor(fitted) {
            let design = fitted.design();
            let mut scatter = PlotSeries::new("scatter", &["row", "x", "y", "fitted"]);
            let mut points: Vec<_> = observations
                .iter()
                .map(|obs| {
                    (
                        obs.row as f64,
                        design[(obs.index, column)],
                        obs.fitted + obs.residual,
                        obs.fitted,
                    )
                })
                .collect();
            points.sort_by(|a, b| a.1.total_cmp(&b.1));
            for (row, x, y, fit) in points {
                scatter.push(vec![row, x, y, fit]);
            }
            series.push(scatter);
        }

        let mut resid_fitted = PlotSeries::new("residuals_vs_fitted", &["row", "fitted", "residual"]);
        for obs in &observations {
            resid_fitted.push(vec![obs.row as f64, obs.fitted, obs.residual]);
        }
        series.push(resid_fitted);

        let mut qq = PlotSeries::new("normal_qq", &["row", "theoretical", "studentized_residual"]);
        let mut sorted: Vec<_> = observations
            .iter()
            .map(|obs| (obs.row as f64, obs.studentized_residual))
            .collect();
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1));
        let positions = ppoints(sorted.len());
        let normal = Normal::new(0.0, 1.0).ok();
        for ((row, r), p) in sorted.into_iter().zip(positions) {
            let theoretical = normal.as_ref().map_or(f64::NAN, |d| d.inverse_cdf(p));
            qq.push(vec![row, theoretical, r]);
        }
        series.push(qq);

        let mut scale = PlotSeries::new(
            "scale_location",
            &["row", "fitted", "sqrt_abs_studentized_residual"],
        );
        for obs in &observations {
            scale.push(vec![
                obs.row as f64,
                obs.fitted,
                obs.studentized_residual.abs().sqrt(),
            ]);
        }
        series.push(scale);

        let mut leverage = PlotSeries::new(
            "residuals_vs_leverage",
            &["row", "leverage", "studentized_residual", "cooks_distance"],
        );
        for obs in &observations {
            leverage.push(vec![
                obs.row as f64,
                obs.leverage,
                obs.studentized_residual,
                obs.cooks_distance,
            ]);
        }
        series.push(leverage);

        debug!(
            response = %result.response,
            series = series.len(),
            "built diagnostic plot series"
        );
        Self { series }
    }

    pub fn series(&self) -> &[PlotSeries] {
        &self.series
    }

    /// Look up a series by name.
    pub fn get(&self, name: &str) -> Option<&PlotSeries> {
        self.series.iter().find(|s| s.name == name)
    }

    /// Write every series to `<dir>/<name>.csv`, creating `dir` if needed.
    pub fn write_csv(&self, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
        fs::create_dir_all(dir).map_err(|source| ReportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(self.series.len());
        for series in &self.series {
            let path = dir.join(format!("{}.csv", series.name));
            let file = fs::File::create(&path).map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
            series.write_csv(file)?;
            debug!(path = %path.display(), rows = series.len(), "wrote plot series");
            written.push(path);
        }
        Ok(written)
    }
}

/// Design column of the only predictor, when the model is `y ~ x`.
fn single_numeric_predictor(fitted: &FittedOls) -> Option<usize> {
    let terms = fitted.layout().terms();
    let predictors: Vec<(usize, &Term)> = terms
        .iter()
        .enumerate()
        .filter(|(_, term)| !matches!(term, Term::Intercept))
        .collect();

    match predictors.as_slice() {
        [(column, Term::Numeric(_))] => Some(*column),
        _ => None,
    }
}
