//! Model specification and design matrix construction.

mod encoding;
mod layout;
mod spec;

pub use encoding::CategoricalEncoding;
pub use layout::{DesignLayout, ModelFrame, Term};
pub use spec::ModelSpec;
