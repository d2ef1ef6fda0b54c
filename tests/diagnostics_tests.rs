//! Diagnostics integration tests.
//!
//! Reference values were produced with R:
//! ```r
//! m <- lm(y ~ x)  # x <- 1:10, see ols_tests.rs
//! hatvalues(m); rstandard(m); rstudent(m); cooks.distance(m)
//! ```

mod common;

use approx::assert_relative_eq;
use lm_workbook::diagnostics::variance_inflation_factor;
use lm_workbook::prelude::*;

fn fit(data: &Dataset, formula: &str) -> FittedOls {
    let spec: ModelSpec = formula.parse().expect("valid formula");
    OlsRegressor::default()
        .fit(data, &spec)
        .expect("fit should succeed")
}

// ============================================================================
// Per-Observation Records
// ============================================================================

#[test]
fn test_records_match_r() {
    let fitted = fit(&common::small_linear_data(), "y ~ x");
    let diagnostics = fitted.diagnostics();
    assert_eq!(diagnostics.len(), 10);

    let first = diagnostics.get(0).expect("observation 0");
    assert_relative_eq!(first.leverage, 0.3454545455, epsilon = 1e-9);
    assert_relative_eq!(first.residual, 0.0872727273, epsilon = 1e-9);
    assert_relative_eq!(first.studentized_residual, 0.6674396138, epsilon = 1e-8);
    assert_relative_eq!(first.externally_studentized_residual, 0.6424767800, epsilon = 1e-8);
    assert_relative_eq!(first.cooks_distance, 0.1175560712, epsilon = 1e-8);

    let seventh = diagnostics.get(7).expect("observation 7");
    assert_relative_eq!(seventh.leverage, 0.1757575758, epsilon = 1e-9);
    assert_relative_eq!(seventh.studentized_residual, 1.3052057950, epsilon = 1e-8);
    assert_relative_eq!(seventh.externally_studentized_residual, 1.3761968311, epsilon = 1e-8);
    assert_relative_eq!(seventh.cooks_distance, 0.1816297899, epsilon = 1e-8);

    let sigma = fitted.result().sigma;
    assert_relative_eq!(seventh.standardized_residual, seventh.residual / sigma, epsilon = 1e-12);

    assert!(diagnostics.get(10).is_none());
}

#[test]
fn test_leverage_bounds_and_trace() {
    let fitted = fit(&common::grouped_data(8), "y ~ x + group");
    let leverage = fitted.diagnostics().leverage();

    for &h in leverage.iter() {
        assert!(h > 0.0 && h < 1.0, "leverage {h} out of range");
    }
    // trace(H) = p
    let trace: f64 = leverage.iter().sum();
    assert_relative_eq!(trace, fitted.result().n_parameters as f64, epsilon = 1e-10);
}

#[test]
fn test_records_agree_with_vector_accessors() {
    let fitted = fit(&common::noisy_line(25, 1.0, 2.0, 1.0, 5), "y ~ x");
    let diagnostics = fitted.diagnostics();

    let leverage = diagnostics.leverage();
    let standardized = diagnostics.standardized_residuals();
    let studentized = diagnostics.studentized_residuals();
    let external = diagnostics.externally_studentized_residuals();
    let cooks = diagnostics.cooks_distance();

    for obs in &diagnostics {
        let i = obs.index;
        assert_relative_eq!(obs.leverage, leverage[i], epsilon = 1e-12);
        assert_relative_eq!(obs.standardized_residual, standardized[i], epsilon = 1e-12);
        assert_relative_eq!(obs.studentized_residual, studentized[i], epsilon = 1e-12);
        assert_relative_eq!(obs.externally_studentized_residual, external[i], epsilon = 1e-10);
        assert_relative_eq!(obs.cooks_distance, cooks[i], epsilon = 1e-12);
        assert_relative_eq!(obs.fitted, diagnostics.fitted_values()[i], epsilon = 1e-15);
        assert_relative_eq!(obs.residual, diagnostics.residuals()[i], epsilon = 1e-15);
    }
}

// ============================================================================
// Lazy Sequence
// ============================================================================

#[test]
fn test_sequence_is_restartable() {
    let fitted = fit(&common::small_linear_data(), "y ~ x");
    let diagnostics = fitted.diagnostics();

    let first: Vec<ObservationDiagnostics> = diagnostics.iter().collect();
    let second: Vec<ObservationDiagnostics> = diagnostics.iter().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 10);

    // A copy of the view yields the same records
    let copy = diagnostics;
    let third: Vec<ObservationDiagnostics> = copy.into_iter().collect();
    assert_eq!(first, third);
}

#[test]
fn test_partial_iteration_does_not_disturb_view() {
    let fitted = fit(&common::small_linear_data(), "y ~ x");
    let diagnostics = fitted.diagnostics();

    let mut iter = diagnostics.iter();
    assert_eq!(iter.len(), 10);
    let head: Vec<_> = iter.by_ref().take(3).collect();
    assert_eq!(head.len(), 3);
    assert_eq!(iter.len(), 7);

    let last = iter.next_back().expect("observation 9");
    assert_eq!(last.index, 9);
    assert_eq!(iter.len(), 6);

    // A fresh pass starts over
    assert_eq!(diagnostics.iter().next().map(|obs| obs.index), Some(0));
    assert_eq!(diagnostics.iter().count(), 10);
}

#[test]
fn test_exhausted_iterator_stays_empty() {
    let fitted = fit(&common::small_linear_data(), "y ~ x");
    let mut iter = fitted.diagnostics().iter();
    for _ in iter.by_ref() {}
    assert!(iter.next().is_none());
    assert!(iter.next_back().is_none());
}

#[test]
fn test_rows_refer_to_input_after_na_omit() {
    let data = Dataset::from_csv_path(common::exercise_csv(), &CsvOptions::default())
        .expect("exercise data loads");
    let fitted = fit(&data, "score ~ hours + section");
    let diagnostics = fitted.diagnostics();

    assert_eq!(diagnostics.len(), 29);
    let rows: Vec<usize> = diagnostics.iter().map(|obs| obs.row).collect();
    assert!(!rows.contains(&17));
    assert_eq!(rows[16], 16);
    assert_eq!(rows[17], 18);
    assert_eq!(rows[28], 29);
}

// ============================================================================
// Flagged Observations
// ============================================================================

#[test]
fn test_exercise_influence_matches_r() {
    let data = Dataset::from_csv_path(common::exercise_csv(), &CsvOptions::default())
        .expect("exercise data loads");
    let fitted = fit(&data, "score ~ hours + section");
    let diagnostics = fitted.diagnostics();

    let worst = diagnostics
        .iter()
        .max_by(|a, b| a.cooks_distance.total_cmp(&b.cooks_distance))
        .expect("non-empty");
    assert_eq!(worst.index, 27);
    assert_eq!(worst.row, 28);
    assert_relative_eq!(worst.cooks_distance, 0.2634911230, epsilon = 1e-8);
    assert_relative_eq!(worst.leverage, 0.1964203929, epsilon = 1e-8);
    assert_relative_eq!(worst.externally_studentized_residual, -2.2365542381, epsilon = 1e-7);

    // D > 4/n flags only that observation; no hat value exceeds 2p/n
    assert_eq!(diagnostics.influential(), vec![27]);
    assert!(diagnostics.high_leverage().is_empty());
    assert!(diagnostics.outliers(3.0).is_empty());
}

#[test]
fn test_injected_outlier_is_flagged() {
    let fitted = fit(&common::line_with_outlier(30, 12, 8.0), "y ~ x");
    let diagnostics = fitted.diagnostics();

    let worst = diagnostics
        .iter()
        .max_by(|a, b| a.cooks_distance.total_cmp(&b.cooks_distance))
        .expect("non-empty");
    assert_eq!(worst.index, 12);

    assert!(diagnostics.outliers(3.0).contains(&12));
    assert!(diagnostics.influential().contains(&12));
}

#[test]
fn test_high_leverage_point_is_flagged() {
    let mut x: Vec<f64> = (0..20).map(f64::from).collect();
    x[19] = 100.0;
    let y: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let noise = if i % 2 == 0 { 0.2 } else { -0.2 };
            1.0 + 0.5 * v + noise
        })
        .collect();
    let data = Dataset::new()
        .with_numeric("x", x)
        .and_then(|d| d.with_numeric("y", y))
        .expect("valid dataset");

    let fitted = fit(&data, "y ~ x");
    assert_eq!(fitted.diagnostics().high_leverage(), vec![19]);
}

// ============================================================================
// Variance Inflation Factors
// ============================================================================

#[test]
fn test_vif_two_predictors() {
    let data = Dataset::from_csv_path(common::exercise_csv(), &CsvOptions::default())
        .expect("exercise data loads");
    let fitted = fit(&data, "score ~ hours + attendance");
    let vif = fitted.diagnostics().vif();

    // With two predictors both VIFs equal 1 / (1 - r²)
    assert_eq!(vif.len(), 2);
    assert_eq!(vif[0].0, "hours");
    assert_eq!(vif[1].0, "attendance");
    assert_relative_eq!(vif[0].1, 1.0602127974, epsilon = 1e-8);
    assert_relative_eq!(vif[1].1, 1.0602127974, epsilon = 1e-8);
}

#[test]
fn test_vif_single_predictor_is_one() {
    let fitted = fit(&common::small_linear_data(), "y ~ x");
    let vif = fitted.diagnostics().vif();
    assert_eq!(vif, vec![("x", 1.0)]);
}

#[test]
fn test_vif_grows_with_collinearity() {
    let x1: Vec<f64> = (0..30).map(|i| i as f64).collect();
    let x2: Vec<f64> = x1
        .iter()
        .enumerate()
        .map(|(i, v)| v + if i % 3 == 0 { 0.5 } else { -0.25 })
        .collect();
    let x3: Vec<f64> = (0..30).map(|i| ((i * 7) % 11) as f64).collect();
    let y: Vec<f64> = (0..30)
        .map(|i| x1[i] + x2[i] + x3[i] + if i % 2 == 0 { 0.1 } else { -0.1 })
        .collect();
    let data = Dataset::new()
        .with_numeric("x1", x1)
        .and_then(|d| d.with_numeric("x2", x2))
        .and_then(|d| d.with_numeric("x3", x3))
        .and_then(|d| d.with_numeric("y", y))
        .expect("valid dataset");

    let fitted = fit(&data, "y ~ x1 + x2 + x3");
    let vif = variance_inflation_factor(fitted.design(), true);

    assert!(vif[0] > 10.0, "x1 VIF {}", vif[0]);
    assert!(vif[1] > 10.0, "x2 VIF {}", vif[1]);
    assert!(vif[2] < 2.0, "x3 VIF {}", vif[2]);
}

// ============================================================================
// Plot Series
// ============================================================================

#[test]
fn test_plot_series_for_simple_model() {
    let fitted = fit(&common::small_linear_data(), "y ~ x");
    let plots = DiagnosticPlots::from_fit(&fitted);

    let names: Vec<&str> = plots.series().iter().map(|s| s.name()).collect();
    assert_eq!(
        names,
        vec![
            "scatter",
            "residuals_vs_fitted",
            "normal_qq",
            "scale_location",
            "residuals_vs_leverage"
        ]
    );
    for series in plots.series() {
        assert_eq!(series.len(), 10);
    }

    let scatter = plots.get("scatter").expect("scatter series");
    let x = scatter.column("x").expect("x column");
    assert!(x.windows(2).all(|w| w[0] <= w[1]));

    let qq = plots.get("normal_qq").expect("qq series");
    let theoretical = qq.column("theoretical").expect("theoretical column");
    let sample = qq.column("studentized_residual").expect("sample column");
    assert!(theoretical.windows(2).all(|w| w[0] < w[1]));
    assert!(sample.windows(2).all(|w| w[0] <= w[1]));
    assert_relative_eq!(theoretical[0], -theoretical[9], epsilon = 1e-10);
}

#[test]
fn test_no_scatter_for_multiple_predictors() {
    let fitted = fit(&common::grouped_data(5), "y ~ x + group");
    let plots = DiagnosticPlots::from_fit(&fitted);
    assert!(plots.get("scatter").is_none());
    assert_eq!(plots.series().len(), 4);
}

#[test]
fn test_plot_series_written_as_csv() {
    let fitted = fit(&common::small_linear_data(), "y ~ x");
    let dir = common::scratch_dir("plots");

    let written = DiagnosticPlots::from_fit(&fitted)
        .write_csv(&dir)
        .expect("plot series written");
    assert_eq!(written.len(), 5);

    let text = std::fs::read_to_string(dir.join("residuals_vs_leverage.csv")).expect("file exists");
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("row,leverage,studentized_residual,cooks_distance")
    );
    assert_eq!(lines.count(), 10);

    let _ = std::fs::remove_dir_all(&dir);
}
