//! Error types for reference data loading and lookups.

use std::path::PathBuf;

use thiserror::Error;

/// The ZIP dataset could not be loaded.
///
/// Variants carry rendered messages instead of source errors so a failed load
/// can be cached and handed to every later caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DataSourceError {
    #[error("ZIP dataset not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read ZIP dataset {dataset}: {message}")]
    Read { dataset: String, message: String },

    #[error("ZIP dataset {dataset} is missing required column `{column}`")]
    MissingColumn {
        dataset: String,
        column: &'static str,
    },

    #[error("duplicate ZIP code {zip} in {dataset} (line {line})")]
    DuplicateZip {
        dataset: String,
        zip: String,
        line: u64,
    },

    #[error("unreadable row in {dataset} (line {line}): {message}")]
    InvalidRow {
        dataset: String,
        line: u64,
        message: String,
    },
}

/// A state string matched no known state or territory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Invalid US state: {value}")]
    Unrecognized { value: String },
}

/// Failure of a state lookup against a data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl LookupError {
    /// True for bad input, false for dataset problems.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::State(_))
    }
}

pub type Result<T> = std::result::Result<T, DataSourceError>;
