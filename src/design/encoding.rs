//! Treatment (dummy) coding for categorical predictors.

use crate::solvers::RegressionError;
use std::collections::{BTreeSet, HashMap};

/// Lookup table from the levels of one categorical variable to dummy columns.
///
/// Built once at fit time. Levels are sorted; the reference level gets no
/// column and every other level maps to exactly one indicator column, in level
/// order. The table is read-only afterwards, so prediction uses exactly the
/// coding seen during fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalEncoding {
    variable: String,
    levels: Vec<String>,
    reference: usize,
    columns: HashMap<String, Option<usize>>,
}

impl CategoricalEncoding {
    /// Learn the levels of `variable` from the observed labels.
    ///
    /// `reference` overrides the default reference level (the first level in
    /// sorted order); it must be one of the observed levels.
    pub fn fit<'a, I>(variable: &str, labels: I, reference: Option<&str>) -> Result<Self, RegressionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let levels: Vec<String> = labels
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        if levels.is_empty() {
            return Err(RegressionError::InvalidSpecification(format!(
                "categorical predictor '{variable}' has no observed levels"
            )));
        }

        let reference = match reference {
            None => 0,
            Some(level) => levels.iter().position(|l| l == level).ok_or_else(|| {
                RegressionError::UnseenCategory {
                    variable: variable.to_string(),
                    level: level.to_string(),
                }
            })?,
        };

        let mut columns = HashMap::with_capacity(levels.len());
        let mut next = 0;
        for (k, level) in levels.iter().enumerate() {
            if k == reference {
                columns.insert(level.clone(), None);
            } else {
                columns.insert(level.clone(), Some(next));
                next += 1;
            }
        }

        Ok(Self {
            variable: variable.to_string(),
            levels,
            reference,
            columns,
        })
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// All observed levels in sorted order.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn reference_level(&self) -> &str {
        &self.levels[self.reference]
    }

    /// Number of indicator columns (levels minus the reference).
    pub fn n_columns(&self) -> usize {
        self.levels.len() - 1
    }

    /// Column names in the R convention: variable name followed by the level.
    pub fn column_names(&self) -> impl Iterator<Item = String> + '_ {
        self.levels
            .iter()
            .enumerate()
            .filter(move |(k, _)| *k != self.reference)
            .map(move |(_, level)| format!("{}{}", self.variable, level))
    }

    /// Indicator column for `label`: `None` for the reference level.
    ///
    /// Fails with `UnseenCategory` when `label` was not observed during fitting.
    pub fn column_for(&self, label: &str) -> Result<Option<usize>, RegressionError> {
        self.columns
            .get(label)
            .copied()
            .ok_or_else(|| RegressionError::UnseenCategory {
                variable: self.variable.clone(),
                level: label.to_string(),
            })
    }
}
