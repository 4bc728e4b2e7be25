//! Data module - match loading and filtering

#[cfg(test)]
pub mod fixtures;
mod loader;
mod processor;
pub mod schema;
mod source;

pub use loader::{LoadError, MatchLoader, MatchTable};
pub use processor::{DataProcessor, FilterSelection, TransformError};
