//! Matrix utility functions.

use faer::{Col, Mat};

/// Detect columns that are constant (zero variance).
pub fn detect_constant_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    let n_cols = x.ncols();
    let n_rows = x.nrows();

    if n_rows == 0 {
        return vec![true; n_cols];
    }

    let mut constant = vec![false; n_cols];

    for j in 0..n_cols {
        let first = x[(0, j)];
        let all_same = (1..n_rows).all(|i| (x[(i, j)] - first).abs() < tolerance);
        constant[j] = all_same;
    }

    constant
}

/// Euclidean norm of column `j`.
pub fn column_norm(x: &Mat<f64>, j: usize) -> f64 {
    (0..x.nrows()).map(|i| x[(i, j)].powi(2)).sum::<f64>().sqrt()
}

/// Flag columns that are (numerically) linear combinations of earlier columns.
///
/// Columns are visited left to right. Column `j` is aliased when the norm of
/// its component orthogonal to the span of the non-aliased columns before it
/// is at most `tolerance * ||x_j||`. This matches the order in which R's `lm`
/// reports aliased coefficients.
pub fn aliased_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    let n = x.nrows();
    let p = x.ncols();
    let mut aliased = vec![false; p];
    let mut kept: Vec<usize> = Vec::with_capacity(p);

    for j in 0..p {
        let norm = column_norm(x, j);
        let k = kept.len();
        if norm == 0.0 || k >= n {
            aliased[j] = true;
            continue;
        }

        let candidate = Mat::from_fn(n, k + 1, |i, c| {
            if c < k {
                x[(i, kept[c])]
            } else {
                x[(i, j)]
            }
        });
        let qr = candidate.qr();
        let r = qr.R();

        if r[(k, k)].abs() <= tolerance * norm {
            aliased[j] = true;
        } else {
            kept.push(j);
        }
    }

    aliased
}

/// Center a matrix by subtracting column means.
pub fn center_columns(x: &Mat<f64>) -> (Mat<f64>, Col<f64>) {
    let n_rows = x.nrows();
    let n_cols = x.ncols();

    let mut means = Col::zeros(n_cols);
    let mut centered = Mat::zeros(n_rows, n_cols);

    for j in 0..n_cols {
        let sum: f64 = (0..n_rows).map(|i| x[(i, j)]).sum();
        means[j] = sum / n_rows as f64;

        for i in 0..n_rows {
            centered[(i, j)] = x[(i, j)] - means[j];
        }
    }

    (centered, means)
}
