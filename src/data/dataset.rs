//! Column-oriented dataset with numeric and categorical columns.

use thiserror::Error;

/// Errors raised while building or loading a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{column}' has {got} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is categorical, expected numeric")]
    NotNumeric(String),

    #[error("dataset has no columns")]
    Empty,

    #[error("invalid generator parameter: {0}")]
    InvalidParameter(String),
}

/// A single dataset column.
///
/// Missing numeric cells are `NaN`; missing categorical cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Whether row `i` holds a missing value.
    pub fn is_missing(&self, i: usize) -> bool {
        match self {
            Column::Numeric(values) => !values[i].is_finite(),
            Column::Categorical(values) => values[i].is_none(),
        }
    }

    /// Label of row `i` when the column is read as a factor.
    pub fn label(&self, i: usize) -> Option<String> {
        match self {
            Column::Numeric(values) => values[i].is_finite().then(|| level_label(values[i])),
            Column::Categorical(values) => values[i].clone(),
        }
    }
}

/// Label used for a numeric value treated as a factor level (`1.0` -> `"1"`).
pub fn level_label(value: f64) -> String {
    value.to_string()
}

/// An ordered collection of named, equal-length columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, checking name uniqueness and length.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<(), DataError> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(DataError::DuplicateColumn(name));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(DataError::LengthMismatch {
                    column: name,
                    expected: first.len(),
                    got: column.len(),
                });
            }
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Builder-style numeric column.
    pub fn with_numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self, DataError> {
        self.push_column(name, Column::Numeric(values))?;
        Ok(self)
    }

    /// Builder-style categorical column without missing labels.
    pub fn with_categorical<I, S>(mut self, name: impl Into<String>, values: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels = values.into_iter().map(|v| Some(v.into())).collect();
        self.push_column(name, Column::Categorical(labels))?;
        Ok(self)
    }

    /// Number of rows (0 for a dataset without columns).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|j| &self.columns[j])
    }

    /// Iterate over `(name, column)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Borrow a numeric column.
    pub fn numeric(&self, name: &str) -> Result<&[f64], DataError> {
        match self.column(name) {
            Some(Column::Numeric(values)) => Ok(values),
            Some(Column::Categorical(_)) => Err(DataError::NotNumeric(name.to_string())),
            None => Err(DataError::UnknownColumn(name.to_string())),
        }
    }

    /// Mean of a numeric column, ignoring missing cells.
    pub fn numeric_mean(&self, name: &str) -> Result<f64, DataError> {
        let values = self.numeric(name)?;
        let (sum, count) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));
        Ok(if count == 0 { f64::NAN } else { sum / count as f64 })
    }

    /// Reinterpret a numeric column as categorical (R's `factor()`).
    pub fn to_categorical(&mut self, name: &str) -> Result<(), DataError> {
        let j = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| DataError::UnknownColumn(name.to_string()))?;

        if let Column::Numeric(values) = &self.columns[j] {
            let labels = values
                .iter()
                .map(|&v| v.is_finite().then(|| level_label(v)))
                .collect();
            self.columns[j] = Column::Categorical(labels);
        }
        Ok(())
    }

    /// Per-row flag: true when any of the named columns is missing there.
    pub fn missing_mask(&self, names: &[&str]) -> Result<Vec<bool>, DataError> {
        let columns = names
            .iter()
            .map(|name| {
                self.column(name)
                    .ok_or_else(|| DataError::UnknownColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok((0..self.n_rows())
            .map(|i| columns.iter().any(|c| c.is_missing(i)))
            .collect())
    }
}
