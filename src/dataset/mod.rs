//! Dataset loading and normalization.
//!
//! This module reads job posting CSV files of arbitrary shape, maps their
//! columns onto canonical names and drops incomplete rows.

pub mod columns;
pub mod loader;

pub use columns::ColumnAliases;
pub use loader::{Dataset, LoadOptions};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("File {} not found.", .path.display())]
    NotFound { path: PathBuf },

    #[error("CSV file is invalid. Missing required columns: {missing:?}")]
    MissingColumns { missing: Vec<String> },

    #[error("Malformed CSV at line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
