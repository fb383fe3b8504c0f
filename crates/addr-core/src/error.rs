use addr_model::{AddressError, ParseFailure};
use addr_parse::BackendError;
use addr_standards::{DataSourceError, LookupError};
use addr_validate::ValidatorError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Failure of a service operation.
///
/// Invalid addresses are not errors here; they come back inside a
/// [`ParseOutcome`](addr_model::ParseOutcome). These variants are dataset,
/// configuration and explicit strict-mode failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error(transparent)]
    Validator(#[from] ValidatorError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Strict mode only.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Raised by [`ErrorMode::Raise`](crate::ErrorMode::Raise) only.
    #[error("parse failed: {0}")]
    Parse(#[from] ParseFailure),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("international backend setup failed: {0}")]
    Backend(#[from] BackendError),

    #[error("invalid value for {key}: {message}")]
    Config { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("{kind} `{key}` is already registered")]
    Duplicate { kind: &'static str, key: String },

    #[error("unknown {kind} `{key}` (available: {})", available.join(", "))]
    Unknown {
        kind: &'static str,
        key: String,
        available: Vec<String>,
    },
}

/// Failure of a table-wide parse.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TableError {
    #[error("column `{column}` not found")]
    MissingColumn { column: String },

    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: ServiceError,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
