//! NA (missing value) handling for model frames.
//!
//! Three policies are supported, mirroring R's `na.action`:
//! - `Omit`: drop incomplete rows; residuals and fitted values are shorter than the input
//! - `Exclude`: drop incomplete rows, but pad residuals and fitted values back to the
//!   input length with `NaN`
//! - `Fail`: reject the data if any row is incomplete
//!
//! A row is incomplete when the response or any predictor used by the model
//! is missing. Columns not named in the model never cause a row to be dropped.

use faer::{Col, Mat};
use thiserror::Error;

/// Action to take when missing values are encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NaAction {
    /// Remove rows containing missing values.
    ///
    /// Equivalent to R's `na.omit`.
    #[default]
    Omit,

    /// Remove rows containing missing values, but pad output vectors with NaN
    /// at the original positions so they match the input length.
    ///
    /// Equivalent to R's `na.exclude`.
    Exclude,

    /// Return an error if any missing values are present.
    ///
    /// Equivalent to R's `na.fail`.
    Fail,
}

/// Error raised while applying an `NaAction`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NaError {
    #[error("missing values found in data (na.fail): {n_na} rows contain missing values")]
    NaValuesPresent { n_na: usize },

    #[error("all observations contain missing values")]
    AllNa,
}

/// Information about NA handling applied to a model frame.
#[derive(Debug, Clone)]
pub struct NaInfo {
    /// Number of rows before NA removal.
    pub n_original: usize,

    /// Number of rows after NA removal.
    pub n_clean: usize,

    /// Mask of rows that had missing values (true = dropped).
    pub na_mask: Vec<bool>,

    /// Indices of the rows that were kept.
    pub kept_indices: Vec<usize>,

    /// Number of rows removed.
    pub n_removed: usize,

    /// The NA action that was applied.
    pub action: NaAction,
}

impl NaInfo {
    /// Info for data without any missing values.
    pub fn no_na(n_observations: usize, action: NaAction) -> Self {
        Self {
            n_original: n_observations,
            n_clean: n_observations,
            na_mask: vec![false; n_observations],
            kept_indices: (0..n_observations).collect(),
            n_removed: 0,
            action,
        }
    }

    /// Check if any rows were removed.
    pub fn has_removed(&self) -> bool {
        self.n_removed > 0
    }

    /// Check if outputs should be padded back to the original length.
    pub fn needs_expansion(&self) -> bool {
        self.action == NaAction::Exclude && self.n_removed > 0
    }

    /// Expand a vector to original length, inserting NaN at removed positions.
    pub fn expand(&self, clean_values: &Col<f64>) -> Col<f64> {
        if !self.needs_expansion() {
            return clean_values.clone();
        }

        let mut expanded = Col::zeros(self.n_original);
        let mut clean_idx = 0;

        for (orig_idx, &had_na) in self.na_mask.iter().enumerate() {
            if had_na {
                expanded[orig_idx] = f64::NAN;
            } else {
                expanded[orig_idx] = clean_values[clean_idx];
                clean_idx += 1;
            }
        }

        expanded
    }
}

/// Cleaned design matrix and response.
#[derive(Debug, Clone)]
pub struct NaResult {
    /// Design matrix with incomplete rows removed.
    pub x_clean: Mat<f64>,

    /// Response with incomplete rows removed.
    pub y_clean: Col<f64>,

    /// Information about the NA handling applied.
    pub na_info: NaInfo,
}

/// Applies an `NaAction` to a design matrix and response.
pub struct NaHandler;

impl NaHandler {
    /// Drop (or reject) the rows flagged in `na_mask`.
    ///
    /// # Errors
    ///
    /// - `NaError::NaValuesPresent` if `action` is `Fail` and any row is flagged
    /// - `NaError::AllNa` if every row is flagged
    pub fn apply(
        x: &Mat<f64>,
        y: &Col<f64>,
        na_mask: Vec<bool>,
        action: NaAction,
    ) -> Result<NaResult, NaError> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        let n_na = na_mask.iter().filter(|&&v| v).count();

        if n_na == 0 {
            return Ok(NaResult {
                x_clean: x.clone(),
                y_clean: y.clone(),
                na_info: NaInfo::no_na(n_samples, action),
            });
        }

        if action == NaAction::Fail {
            return Err(NaError::NaValuesPresent { n_na });
        }

        if n_na == n_samples {
            return Err(NaError::AllNa);
        }

        let kept_indices: Vec<usize> = na_mask
            .iter()
            .enumerate()
            .filter_map(|(i, &had_na)| if !had_na { Some(i) } else { None })
            .collect();

        let n_clean = kept_indices.len();
        let x_clean = Mat::from_fn(n_clean, n_features, |i, j| x[(kept_indices[i], j)]);
        let y_clean = Col::from_fn(n_clean, |i| y[kept_indices[i]]);

        Ok(NaResult {
            x_clean,
            y_clean,
            na_info: NaInfo {
                n_original: n_samples,
                n_clean,
                na_mask,
                kept_indices,
                n_removed: n_na,
                action,
            },
        })
    }
}
