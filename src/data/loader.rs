//! CSV loading with column type inference.

use super::dataset::{Column, DataError, Dataset};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Cells treated as missing.
const MISSING_TOKENS: [&str; 4] = ["", "NA", "NaN", "nan"];

/// Options for reading a CSV file.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: `,`).
    pub delimiter: u8,
    /// Columns to read as categorical even when every cell parses as a number.
    pub categorical: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            categorical: Vec::new(),
        }
    }
}

impl CsvOptions {
    /// Force a column to be categorical.
    pub fn categorical(mut self, name: impl Into<String>) -> Self {
        self.categorical.push(name.into());
        self
    }
}

fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}

impl Dataset {
    /// Load a dataset from a CSV file with a header row.
    pub fn from_csv_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self, DataError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let data = Self::from_csv_reader(file, options)?;
        debug!(
            path = %path.display(),
            rows = data.n_rows(),
            columns = data.n_columns(),
            "loaded dataset"
        );
        Ok(data)
    }

    /// Load a dataset from any CSV source with a header row.
    ///
    /// A column is numeric when every non-missing cell parses as `f64`,
    /// unless it is listed in `options.categorical`.
    pub fn from_csv_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Self, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(DataError::Empty);
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (j, field) in record.iter().enumerate() {
                cells[j].push(field.to_string());
            }
        }

        let mut data = Dataset::new();
        for (name, raw) in headers.iter().zip(cells) {
            let forced = options.categorical.iter().any(|c| c == name);
            data.push_column(name, infer_column(raw, forced))?;
        }

        for name in &options.categorical {
            if data.column(name).is_none() {
                return Err(DataError::UnknownColumn(name.clone()));
            }
        }

        Ok(data)
    }
}

fn infer_column(raw: Vec<String>, forced_categorical: bool) -> Column {
    if !forced_categorical {
        let parsed: Option<Vec<f64>> = raw
            .iter()
            .map(|cell| {
                if is_missing(cell) {
                    Some(f64::NAN)
                } else {
                    cell.parse::<f64>().ok()
                }
            })
            .collect();

        if let Some(values) = parsed {
            return Column::Numeric(values);
        }
    }

    Column::Categorical(
        raw.into_iter()
            .map(|cell| if is_missing(&cell) { None } else { Some(cell) })
            .collect(),
    )
}
