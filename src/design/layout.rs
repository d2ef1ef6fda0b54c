//! Design matrix construction.

use super::encoding::CategoricalEncoding;
use super::spec::ModelSpec;
use crate::core::{NaAction, NaHandler, NaInfo};
use crate::data::{Column, Dataset};
use crate::solvers::RegressionError;
use faer::{Col, Mat};
use tracing::{debug, warn};

/// One model term and the design columns it produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// A column of ones.
    Intercept,
    /// A numeric predictor, copied as-is.
    Numeric(String),
    /// A categorical predictor, expanded to indicator columns.
    Categorical(CategoricalEncoding),
}

impl Term {
    fn width(&self) -> usize {
        match self {
            Term::Intercept | Term::Numeric(_) => 1,
            Term::Categorical(enc) => enc.n_columns(),
        }
    }
}

/// The mapping from dataset columns to design matrix columns, fixed at fit time.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignLayout {
    terms: Vec<Term>,
    column_names: Vec<String>,
}

/// Design matrix and response after missing-value handling.
#[derive(Debug, Clone)]
pub struct ModelFrame {
    pub x: Mat<f64>,
    pub y: Col<f64>,
    pub layout: DesignLayout,
    pub na_info: NaInfo,
}

fn lookup<'a>(data: &'a Dataset, name: &str) -> Result<&'a Column, RegressionError> {
    data.column(name)
        .ok_or_else(|| RegressionError::UnknownColumn(name.to_string()))
}

impl ModelFrame {
    /// Build the design matrix and response for `spec` from `data`.
    ///
    /// Rows with a missing response or predictor are handled by `na_action`.
    /// Categorical levels are learned from the complete rows only.
    pub fn build(spec: &ModelSpec, data: &Dataset, na_action: NaAction) -> Result<Self, RegressionError> {
        spec.validate()?;

        let response = match lookup(data, spec.response())? {
            Column::Numeric(values) => values,
            Column::Categorical(_) => {
                return Err(RegressionError::NotNumeric(spec.response().to_string()))
            }
        };

        let mut used: Vec<&str> = vec![spec.response()];
        for name in spec.predictors() {
            lookup(data, name)?;
            used.push(name);
        }
        let na_mask = data.missing_mask(&used)?;

        let mut terms = Vec::with_capacity(spec.predictors().len() + 1);
        if spec.has_intercept() {
            terms.push(Term::Intercept);
        }
        for name in spec.predictors() {
            let term = match lookup(data, name)? {
                Column::Numeric(_) if spec.reference_for(name).is_none() => Term::Numeric(name.clone()),
                column => {
                    let labels: Vec<String> = (0..data.n_rows())
                        .filter(|&i| !na_mask[i])
                        .filter_map(|i| column.label(i))
                        .collect();
                    let encoding = CategoricalEncoding::fit(
                        name,
                        labels.iter().map(String::as_str),
                        spec.reference_for(name),
                    )?;
                    // A single level leaves no indicator columns
                    if encoding.n_columns() == 0 {
                        warn!(
                            variable = %name,
                            level = encoding.reference_level(),
                            "categorical predictor has a single level"
                        );
                        return Err(RegressionError::RankDeficient {
                            aliased: vec![name.clone()],
                        });
                    }
                    debug!(
                        variable = %name,
                        levels = ?encoding.levels(),
                        reference = encoding.reference_level(),
                        "encoded categorical predictor"
                    );
                    Term::Categorical(encoding)
                }
            };
            terms.push(term);
        }

        let layout = DesignLayout::new(terms);
        let (x, _) = layout.encode_rows(data, &na_mask)?;
        let y = Col::from_fn(data.n_rows(), |i| response[i]);

        let cleaned = NaHandler::apply(&x, &y, na_mask, na_action)?;
        if cleaned.na_info.has_removed() {
            debug!(removed = cleaned.na_info.n_removed, "dropped rows with missing values");
        }

        Ok(Self {
            x: cleaned.x_clean,
            y: cleaned.y_clean,
            layout,
            na_info: cleaned.na_info,
        })
    }
}

impl DesignLayout {
    fn new(terms: Vec<Term>) -> Self {
        let mut column_names = Vec::new();
        for term in &terms {
            match term {
                Term::Intercept => column_names.push("(Intercept)".to_string()),
                Term::Numeric(name) => column_names.push(name.clone()),
                Term::Categorical(enc) => column_names.extend(enc.column_names()),
            }
        }
        Self {
            terms,
            column_names,
        }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Design column names, e.g. `(Intercept)`, `x`, `groupB`.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn n_columns(&self) -> usize {
        self.column_names.len()
    }

    pub fn has_intercept(&self) -> bool {
        matches!(self.terms.first(), Some(Term::Intercept))
    }

    /// Dataset columns this layout reads.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().filter_map(|term| match term {
            Term::Intercept => None,
            Term::Numeric(name) => Some(name.as_str()),
            Term::Categorical(enc) => Some(enc.variable()),
        })
    }

    /// Encode new rows with the fitted layout.
    ///
    /// Rows with a missing predictor get a `NaN` design row and are flagged in
    /// the returned mask. Unseen categorical levels are an error on every row,
    /// including rows that are missing another predictor.
    pub fn encode(&self, data: &Dataset) -> Result<(Mat<f64>, Vec<bool>), RegressionError> {
        let names: Vec<&str> = self.variables().collect();
        for name in &names {
            lookup(data, name)?;
        }
        self.check_levels(data)?;
        let mask = data.missing_mask(&names)?;
        self.encode_rows(data, &mask)
    }

    fn check_levels(&self, data: &Dataset) -> Result<(), RegressionError> {
        for term in &self.terms {
            if let Term::Categorical(enc) = term {
                let column = lookup(data, enc.variable())?;
                for i in 0..data.n_rows() {
                    if let Some(label) = column.label(i) {
                        enc.column_for(&label)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn encode_rows(
        &self,
        data: &Dataset,
        na_mask: &[bool],
    ) -> Result<(Mat<f64>, Vec<bool>), RegressionError> {
        let n = data.n_rows();
        let mut x = Mat::zeros(n, self.n_columns());

        let mut offset = 0;
        for term in &self.terms {
            match term {
                Term::Intercept => {
                    for i in 0..n {
                        x[(i, offset)] = 1.0;
                    }
                }
                Term::Numeric(name) => match lookup(data, name)? {
                    Column::Numeric(values) => {
                        for i in 0..n {
                            x[(i, offset)] = values[i];
                        }
                    }
                    Column::Categorical(_) => return Err(RegressionError::NotNumeric(name.clone())),
                },
                Term::Categorical(enc) => {
                    let column = lookup(data, enc.variable())?;
                    for i in 0..n {
                        if na_mask[i] {
                            for k in 0..enc.n_columns() {
                                x[(i, offset + k)] = f64::NAN;
                            }
                            continue;
                        }
                        if let Some(label) = column.label(i) {
                            if let Some(k) = enc.column_for(&label)? {
                                x[(i, offset + k)] = 1.0;
                            }
                        }
                    }
                }
            }
            offset += term.width();
        }

        Ok((x, na_mask.to_vec()))
    }
}
