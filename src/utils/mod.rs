//! Shared numeric helpers.

mod matrix;

pub use matrix::{aliased_columns, center_columns, column_norm, detect_constant_columns};
