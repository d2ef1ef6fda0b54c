//! `summary(lm)`-style text tables.

use super::{format_p_value, format_significant, significance_stars};
use crate::core::{ConfidenceInterval, PredictionResult};
use crate::solvers::{FittedOls, FittedRegressor, RegressionError};
use std::fmt;

/// Min, first quartile, median, third quartile and max of the finite values.
///
/// Quartiles use linear interpolation between order statistics (R's default
/// `quantile` type 7). Returns `None` when there is no finite value.
pub fn five_number_summary(values: &[f64]) -> Option<[f64; 5]> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let quantile = |prob: f64| {
        let h = (sorted.len() - 1) as f64 * prob;
        let lo = h.floor() as usize;
        let hi = h.ceil() as usize;
        sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
    };

    Some([
        sorted[0],
        quantile(0.25),
        quantile(0.5),
        quantile(0.75),
        sorted[sorted.len() - 1],
    ])
}

/// Right-aligned text table with a left-aligned label column.
fn write_table(
    f: &mut fmt::Formatter<'_>,
    header: &[&str],
    rows: &[(String, Vec<String>)],
) -> fmt::Result {
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(j, h)| {
            rows.iter()
                .filter_map(|(_, cells)| cells.get(j))
                .map(|cell| cell.len())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    write!(f, "{:label_width$}", "")?;
    for (h, &w) in header.iter().zip(&widths) {
        write!(f, " {h:>w$}")?;
    }
    writeln!(f)?;

    for (label, cells) in rows {
        write!(f, "{label:<label_width$}")?;
        for (cell, &w) in cells.iter().zip(&widths) {
            write!(f, " {cell:>w$}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}

/// The `summary(lm)` printout of a fitted model.
#[derive(Debug, Clone, Copy)]
pub struct ModelSummary<'a> {
    fitted: &'a FittedOls,
}

impl<'a> ModelSummary<'a> {
    pub fn new(fitted: &'a FittedOls) -> Self {
        Self { fitted }
    }
}

impl fmt::Display for ModelSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.fitted.result();

        writeln!(f, "Call:")?;
        writeln!(f, "lm(formula = {})", self.fitted.spec())?;
        writeln!(f)?;

        writeln!(f, "Residuals:")?;
        let residuals: Vec<f64> = r.residuals.iter().copied().collect();
        if let Some(five) = five_number_summary(&residuals) {
            let cells: Vec<String> = five.iter().map(|&v| format_significant(v, 4)).collect();
            write_table(
                f,
                &["Min", "1Q", "Median", "3Q", "Max"],
                &[(String::new(), cells)],
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Coefficients:")?;
        let rows: Vec<(String, Vec<String>)> = r
            .coefficient_table()
            .map(|row| {
                (
                    row.term.to_string(),
                    vec![
                        format_significant(row.estimate, 5),
                        format_significant(row.std_error, 5),
                        format!("{:.3}", row.t_value),
                        format_p_value(row.p_value),
                        significance_stars(row.p_value).to_string(),
                    ],
                )
            })
            .collect();
        write_table(
            f,
            &["Estimate", "Std. Error", "t value", "Pr(>|t|)", ""],
            &rows,
        )?;
        writeln!(f, "---")?;
        writeln!(
            f,
            "Signif. codes:  0 '***' 0.001 '**' 0.01 '*' 0.05 '.' 0.1 ' ' 1"
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "Residual standard error: {} on {} degrees of freedom",
            format_significant(r.sigma, 4),
            r.residual_df()
        )?;
        if r.n_na_removed() > 0 {
            writeln!(
                f,
                "  ({} observation{} deleted due to missingness)",
                r.n_na_removed(),
                if r.n_na_removed() == 1 { "" } else { "s" }
            )?;
        }
        writeln!(
            f,
            "Multiple R-squared:  {},\tAdjusted R-squared:  {}",
            format_significant(r.r_squared, 4),
            format_significant(r.adj_r_squared, 4)
        )?;
        if r.f_statistic.is_finite() {
            let p = if r.f_pvalue < 2.2e-16 {
                "< 2.2e-16".to_string()
            } else {
                format_p_value(r.f_pvalue)
            };
            writeln!(
                f,
                "F-statistic: {} on {} and {} DF,  p-value: {}",
                format_significant(r.f_statistic, 4),
                r.model_df(),
                r.residual_df(),
                p
            )?;
        }
        Ok(())
    }
}

/// Coefficient confidence intervals, printed like `confint(model, level = L)`.
#[derive(Debug, Clone)]
pub struct ConfintTable<'a> {
    rows: Vec<ConfidenceInterval<'a>>,
    level: f64,
}

impl<'a> ConfintTable<'a> {
    pub fn new(fitted: &'a FittedOls, level: f64) -> Result<Self, RegressionError> {
        Ok(Self {
            rows: fitted.conf_int(level)?,
            level,
        })
    }

    pub fn rows(&self) -> &[ConfidenceInterval<'a>] {
        &self.rows
    }

    pub fn level(&self) -> f64 {
        self.level
    }
}

fn percent_label(p: f64) -> String {
    format!("{} %", (p * 1000.0).round() / 10.0)
}

impl fmt::Display for ConfintTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alpha = 1.0 - self.level;
        let lower = percent_label(alpha / 2.0);
        let upper = percent_label(1.0 - alpha / 2.0);

        let rows: Vec<(String, Vec<String>)> = self
            .rows
            .iter()
            .map(|ci| {
                (
                    ci.term.to_string(),
                    vec![format_significant(ci.lower, 6), format_significant(ci.upper, 6)],
                )
            })
            .collect();
        write_table(f, &[lower.as_str(), upper.as_str()], &rows)
    }
}

/// Point predictions and interval bounds, one row per request row.
#[derive(Debug, Clone, Copy)]
pub struct PredictionTable<'a> {
    prediction: &'a PredictionResult,
}

impl<'a> PredictionTable<'a> {
    pub fn new(prediction: &'a PredictionResult) -> Self {
        Self { prediction }
    }
}

impl fmt::Display for PredictionTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let with_bounds = self.prediction.interval.is_some();
        let rows: Vec<(String, Vec<String>)> = self
            .prediction
            .rows()
            .enumerate()
            .map(|(i, row)| {
                let mut cells = vec![format_significant(row.fit, 6)];
                if with_bounds {
                    cells.push(format_significant(row.lower, 6));
                    cells.push(format_significant(row.upper, 6));
                }
                ((i + 1).to_string(), cells)
            })
            .collect();

        if with_bounds {
            write_table(f, &["fit", "lwr", "upr"], &rows)
        } else {
            write_table(f, &["fit"], &rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_number_summary() {
        // quantile(1:10) = 1, 3.25, 5.5, 7.75, 10
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let five = five_number_summary(&values).expect("non-empty");
        assert_eq!(five, [1.0, 3.25, 5.5, 7.75, 10.0]);
    }

    #[test]
    fn test_five_number_summary_skips_nan() {
        let five = five_number_summary(&[f64::NAN, 2.0, 1.0]).expect("non-empty");
        assert_eq!(five, [1.0, 1.25, 1.5, 1.75, 2.0]);
        assert!(five_number_summary(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(percent_label(0.015), "1.5 %");
        assert_eq!(percent_label(0.985), "98.5 %");
        assert_eq!(percent_label(0.025), "2.5 %");
    }
}
