//! Datasets: in-memory columns, CSV loading and synthetic generators.

mod dataset;
mod loader;
pub mod synthetic;

pub use dataset::{level_label, Column, DataError, Dataset};
pub use loader::CsvOptions;
pub use synthetic::{grouped_linear, simple_linear, GroupedDataConfig, LinearDataConfig};
