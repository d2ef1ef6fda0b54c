//! Text and CSV reports for fitted models.
//!
//! - [`ModelSummary`]: the familiar `summary(lm)` printout
//! - [`ConfintTable`]: coefficient intervals like `confint(model, level = L)`
//! - [`DiagnosticPlots`]: point series for the standard diagnostic plots

mod plots;
mod summary;

pub use plots::{ppoints, DiagnosticPlots, PlotSeries};
pub use summary::{five_number_summary, ConfintTable, ModelSummary, PredictionTable};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Format a p-value the way R prints it in model summaries.
pub fn format_p_value(p: f64) -> String {
    if p.is_nan() {
        "NA".to_string()
    } else if p < 2.2e-16 {
        "< 2e-16".to_string()
    } else if p < 1e-4 {
        format_scientific(p, 2)
    } else {
        format_significant(p, 4)
    }
}

/// Significance code for a p-value.
pub fn significance_stars(p: f64) -> &'static str {
    match p {
        p if p.is_nan() => "",
        p if p < 0.001 => "***",
        p if p < 0.01 => "**",
        p if p < 0.05 => "*",
        p if p < 0.1 => ".",
        _ => " ",
    }
}

/// Round to `digits` significant digits.
pub fn format_significant(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NA".to_string()
        } else if value > 0.0 {
            "Inf".to_string()
        } else {
            "-Inf".to_string()
        };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    if magnitude < -4 || magnitude >= 15 {
        return format_scientific(value, digits.saturating_sub(1));
    }
    let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
    format!("{value:.decimals$}")
}

/// Scientific notation with a two-digit exponent, e.g. `1.23e-05`.
fn format_scientific(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(rest) => ('-', rest),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_p_value() {
        assert_eq!(format_p_value(1e-20), "< 2e-16");
        assert_eq!(format_p_value(1.234e-5), "1.23e-05");
        assert_eq!(format_p_value(0.04567), "0.04567");
        assert_eq!(format_p_value(0.5), "0.5000");
        assert_eq!(format_p_value(f64::NAN), "NA");
    }

    #[test]
    fn test_significance_stars() {
        assert_eq!(significance_stars(0.0001), "***");
        assert_eq!(significance_stars(0.005), "**");
        assert_eq!(significance_stars(0.03), "*");
        assert_eq!(significance_stars(0.07), ".");
        assert_eq!(significance_stars(0.5), " ");
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(123.456, 4), "123.5");
        assert_eq!(format_significant(-0.0012345, 3), "-0.00123");
        assert_eq!(format_significant(0.0, 4), "0");
        assert_eq!(format_significant(2.0e20, 3), "2.00e+20");
    }
}
